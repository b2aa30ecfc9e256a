use tracing::debug;

use crate::protocol::{Candidate, Directive, Response, decode};

use super::format::{self, ColumnLayout};
use super::invoke::{CommandLine, Invocation};
use super::plan::{Completion, Plan};
use super::profile::ShellProfile;

/// Smallest description width worth aligning columns for
pub const DEFAULT_MIN_DESCRIPTION_WIDTH: usize = 8;

/// State of the line being completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    /// Partial token under the cursor
    pub token: &'a str,

    /// Terminal width in characters
    pub columns: usize,
}

/// Turns completion responses into shell plans for one profile
#[derive(Debug, Clone)]
pub struct Interpreter {
    profile: ShellProfile,
    min_description_width: usize,
    include_hints: bool,
    word_breaks: Vec<char>,
}

impl Interpreter {
    pub fn new(profile: ShellProfile) -> Self {
        Self {
            profile,
            min_description_width: DEFAULT_MIN_DESCRIPTION_WIDTH,
            include_hints: true,
            word_breaks: profile.word_breaks.to_vec(),
        }
    }

    /// Restrict word-break stripping to the breaks the shell has active
    ///
    /// # Arguments
    /// * `active` - The shell's current word-break characters (bash `$COMP_WORDBREAKS`)
    pub fn with_word_breaks(mut self, active: &str) -> Self {
        self.word_breaks.retain(|ch| active.contains(*ch));
        self
    }

    pub fn with_min_description_width(mut self, width: usize) -> Self {
        self.min_description_width = width;
        self
    }

    /// Drop info lines from every plan
    pub fn without_hints(mut self) -> Self {
        self.include_hints = false;
        self
    }

    pub fn profile(&self) -> &ShellProfile {
        &self.profile
    }

    /// Complete a command line by asking the program it names
    ///
    /// # Arguments
    /// * `line` - Words up to the cursor
    /// * `include_descriptions` - Request descriptions from the program
    /// * `columns` - Terminal width
    ///
    /// # Returns
    /// * `Plan` - What the shell should do; never fails
    pub fn run(&self, line: &CommandLine, include_descriptions: bool, columns: usize) -> Plan {
        debug!("========= starting completion logic ==========");
        debug!("Words: {:?}", line.words());

        let Some(invocation) = Invocation::new(line, include_descriptions) else {
            debug!("No program to call, falling back to file completion");
            return Plan::FileFallback;
        };

        let output = invocation.run();
        let cursor = Cursor {
            token: line.current(),
            columns,
        };
        self.interpret(output.as_deref(), &cursor)
    }

    /// Build the plan from raw program output
    ///
    /// Missing output means the program could not be run; file completion
    /// is the best remaining option.
    pub fn interpret(&self, output: Option<&str>, cursor: &Cursor<'_>) -> Plan {
        match output {
            Some(text) => self.plan(&decode(text), cursor),
            None => {
                debug!("No completion output, probably due to a failure");
                Plan::FileFallback
            }
        }
    }

    /// Build the plan for a decoded response
    pub fn plan(&self, response: &Response, cursor: &Cursor<'_>) -> Plan {
        let directive = response.directive();
        debug!("The completion directive is: {}", directive.describe());

        if directive.contains(Directive::ERROR) {
            debug!("Received error directive, aborting");
            return Plan::Abort;
        }

        let filter_ext = directive.contains(Directive::FILTER_FILE_EXT);
        let filter_dirs = directive.contains(Directive::FILTER_DIRS);
        if (filter_ext || filter_dirs) && !self.profile.native_file_filter {
            debug!(
                "File filtering not supported by {}, using file completion",
                self.profile.name
            );
            return Plan::FileFallback;
        }

        if filter_ext {
            let extensions: Vec<String> = response
                .candidates()
                .map(|candidate| candidate.text().to_string())
                .collect();
            debug!("File extension filter: {:?}", extensions);
            return Plan::FilterFileExt(extensions);
        }

        if filter_dirs {
            let subdir = response
                .candidates()
                .next()
                .map(|candidate| candidate.text().to_string())
                .filter(|subdir| !subdir.is_empty());
            debug!("Listing directories in {}", subdir.as_deref().unwrap_or("."));
            return Plan::FilterDirs(subdir);
        }

        Plan::Complete(self.complete(response, cursor))
    }

    fn complete(&self, response: &Response, cursor: &Cursor<'_>) -> Completion {
        let directive = response.directive();

        let infos: Vec<String> = response
            .infos()
            .map(|info| info.text().to_string())
            .filter(|text| self.include_hints && !text.is_empty())
            .collect();
        for info in &infos {
            debug!("Info statement found: {}", info);
        }

        let (flag_prefix, prefix) = split_flag_value(cursor.token);
        let matching: Vec<&Candidate> = response
            .candidates()
            .filter(|candidate| candidate.text().starts_with(prefix))
            .collect();

        let layout = ColumnLayout {
            columns: cursor.columns,
            min_description_width: self.min_description_width,
            longest: matching
                .iter()
                .map(|candidate| format::display_width(candidate.text()))
                .max()
                .unwrap_or(0),
        };

        let mut replies: Vec<String> = match matching.as_slice() {
            // A lone match is inserted directly, so its description is dropped
            [only] => {
                let bare = Candidate::new(only.text());
                vec![format::render(&bare, self.profile.description_style, &layout)]
            }
            _ => matching
                .iter()
                .map(|candidate| format::render(candidate, self.profile.description_style, &layout))
                .collect(),
        };

        if self.profile.prefix_flag_values && !flag_prefix.is_empty() {
            for reply in &mut replies {
                reply.insert_str(0, flag_prefix);
            }
        }

        let typed = if self.profile.prefix_flag_values {
            cursor.token
        } else {
            prefix
        };
        strip_word_breaks(&mut replies, typed, &self.word_breaks);

        let no_space = directive.contains(Directive::NO_SPACE);
        if no_space && !self.profile.has_native_nospace && replies.len() == 1 {
            debug!("Adding second completion to perform nospace directive");
            let extended = format!("{}.", replies[0]);
            replies.push(extended);
        }

        let file_fallback = matching.is_empty() && !directive.contains(Directive::NO_FILE_COMP);
        if file_fallback {
            debug!("Requesting file completion");
        }
        debug!("Final replies: {:?}", replies);

        Completion {
            replies,
            infos,
            no_space: no_space && self.profile.has_native_nospace,
            file_fallback,
        }
    }
}

/// Split `--flag=value` into `("--flag=", "value")`; other tokens have no flag part
fn split_flag_value(token: &str) -> (&str, &str) {
    if token.starts_with('-')
        && let Some(index) = token.find('=')
    {
        return token.split_at(index + 1);
    }
    ("", token)
}

/// Remove what the shell already considers a finished word from each reply
///
/// For every break character present in `typed`, the text up to and
/// including its last occurrence is stripped from the replies.
fn strip_word_breaks(replies: &mut [String], typed: &str, breaks: &[char]) {
    for &ch in breaks {
        let Some(index) = typed.rfind(ch) else {
            continue;
        };
        let word = &typed[..index + ch.len_utf8()];
        for reply in replies.iter_mut() {
            if let Some(rest) = reply.strip_prefix(word) {
                *reply = rest.to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{InfoLine, encode};
    use crate::responder::{NO_MORE_ARGS_HINT, Responder, ResponderOptions};
    use clap::{Arg, Command};

    fn cursor(token: &str) -> Cursor<'_> {
        Cursor { token, columns: 80 }
    }

    fn replies(plan: Plan) -> Vec<String> {
        match plan {
            Plan::Complete(completion) => completion.replies,
            other => panic!("expected completion, got {other:?}"),
        }
    }

    fn completion(plan: Plan) -> Completion {
        match plan {
            Plan::Complete(completion) => completion,
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn test_prefix_filter_single_match_drops_description() {
        let interpreter = Interpreter::new(ShellProfile::BASH);
        let plan = interpreter.interpret(Some("foo\tdesc1\nfoobar\tdesc2\n0\n"), &cursor("fooba"));
        assert_eq!(replies(plan), vec!["foobar"]);
    }

    #[test]
    fn test_bash_columns_for_multiple_matches() {
        let interpreter = Interpreter::new(ShellProfile::BASH);
        let plan = interpreter.interpret(Some("foo\tdesc1\nfoobar\tdesc2\n0\n"), &cursor("foo"));
        assert_eq!(
            replies(plan),
            vec!["foo     (desc1)", "foobar  (desc2)"]
        );
    }

    #[test]
    fn test_fish_nospace_emulation() {
        let interpreter = Interpreter::new(ShellProfile::FISH);
        let plan = interpreter.interpret(Some("abc\tsome text\n2\n"), &cursor("a"));
        let completion = completion(plan);
        assert_eq!(completion.replies, vec!["abc", "abc."]);
        assert!(completion.replies[1].starts_with(&completion.replies[0]));
        assert!(completion.replies[1].len() > completion.replies[0].len());
        assert!(!completion.no_space);
    }

    #[test]
    fn test_native_nospace() {
        let interpreter = Interpreter::new(ShellProfile::BASH);
        let completion = completion(interpreter.interpret(Some("abc\n2\n"), &cursor("a")));
        assert_eq!(completion.replies, vec!["abc"]);
        assert!(completion.no_space);
    }

    #[test]
    fn test_info_lines_never_become_replies() {
        let mut response = Response::new().with_directive(Directive::NO_FILE_COMP);
        response.push_candidate(Candidate::new("_info_ literal"));
        response.push_info(InfoLine::new("Choose a release"));
        response.push_candidate(Candidate::new("alpha"));

        let interpreter = Interpreter::new(ShellProfile::ZSH);
        for token in ["", "C", "Choose", "a"] {
            let completion = completion(interpreter.plan(&response, &cursor(token)));
            assert!(!completion.replies.iter().any(|r| r.contains("Choose a release")));
            assert_eq!(completion.infos, vec!["Choose a release"]);
        }
    }

    #[test]
    fn test_hints_disabled() {
        let interpreter = Interpreter::new(ShellProfile::BASH).without_hints();
        let completion = completion(interpreter.interpret(Some("_info_ Pick one\n4\n"), &cursor("")));
        assert!(completion.infos.is_empty());
        assert!(completion.replies.is_empty());
    }

    #[test]
    fn test_error_short_circuits() {
        for profile in [ShellProfile::BASH, ShellProfile::FISH] {
            let interpreter = Interpreter::new(profile);
            let plan = interpreter.interpret(Some("a\nb\n_info_ hi\n1\n"), &cursor(""));
            assert_eq!(plan, Plan::Abort);
        }
    }

    #[test]
    fn test_file_filters() {
        let bash = Interpreter::new(ShellProfile::BASH);
        assert_eq!(
            bash.interpret(Some("yaml\nyml\n8\n"), &cursor("")),
            Plan::FilterFileExt(vec!["yaml".into(), "yml".into()])
        );
        assert_eq!(
            bash.interpret(Some("16\n"), &cursor("")),
            Plan::FilterDirs(None)
        );
        assert_eq!(
            bash.interpret(Some("charts\n16\n"), &cursor("")),
            Plan::FilterDirs(Some("charts".into()))
        );

        let fish = Interpreter::new(ShellProfile::FISH);
        assert_eq!(
            fish.interpret(Some("yaml\n8\n"), &cursor("")),
            Plan::FileFallback
        );
    }

    #[test]
    fn test_missing_output_falls_back_to_files() {
        let interpreter = Interpreter::new(ShellProfile::POWERSHELL);
        assert_eq!(interpreter.interpret(None, &cursor("x")), Plan::FileFallback);
    }

    #[test]
    fn test_file_fallback_only_without_matches() {
        let interpreter = Interpreter::new(ShellProfile::BASH);

        let unmatched = completion(interpreter.interpret(Some("alpha\n0\n"), &cursor("z")));
        assert!(unmatched.replies.is_empty());
        assert!(unmatched.file_fallback);

        let no_files = completion(interpreter.interpret(Some("alpha\n4\n"), &cursor("z")));
        assert!(!no_files.file_fallback);

        let matched = completion(interpreter.interpret(Some("alpha\n0\n"), &cursor("a")));
        assert!(!matched.file_fallback);
    }

    #[test]
    fn test_flag_value_prefix() {
        let output = Some("json\nyaml\ntable\n4\n");

        let zsh = Interpreter::new(ShellProfile::ZSH);
        assert_eq!(
            replies(zsh.interpret(output, &cursor("--output=y"))),
            vec!["--output=yaml"]
        );

        let bash = Interpreter::new(ShellProfile::BASH);
        assert_eq!(
            replies(bash.interpret(output, &cursor("--output=y"))),
            vec!["yaml"]
        );
    }

    #[test]
    fn test_bash_word_break_colon() {
        let interpreter = Interpreter::new(ShellProfile::BASH);
        let plan = interpreter.interpret(
            Some("repo:alpha\nrepo:beta\nother\n4\n"),
            &cursor("repo:"),
        );
        assert_eq!(replies(plan), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_zsh_colon_style() {
        let interpreter = Interpreter::new(ShellProfile::ZSH);
        let plan = interpreter.interpret(
            Some("repo:alpha\tFirst\nrepo:beta\tSecond\n4\n"),
            &cursor("repo"),
        );
        assert_eq!(
            replies(plan),
            vec!["repo\\:alpha:First", "repo\\:beta:Second"]
        );
    }

    #[test]
    fn test_zsh_single_match_escapes_colons() {
        let interpreter = Interpreter::new(ShellProfile::ZSH);
        let plan = interpreter.interpret(Some("repo:alpha\tFirst\nother\n4\n"), &cursor("repo"));
        assert_eq!(replies(plan), vec!["repo\\:alpha"]);
    }

    #[test]
    fn test_bash_word_breaks_follow_shell() {
        let output = Some("repo:alpha\nrepo:beta\n4\n");

        // `:` removed from COMP_WORDBREAKS: the whole token is the current word
        let interpreter = Interpreter::new(ShellProfile::BASH).with_word_breaks(" \t\n\"'><=;|&(");
        assert_eq!(
            replies(interpreter.interpret(output, &cursor("repo:"))),
            vec!["repo:alpha", "repo:beta"]
        );

        let interpreter =
            Interpreter::new(ShellProfile::BASH).with_word_breaks(" \t\n\"'@><=;|&(:");
        assert_eq!(
            replies(interpreter.interpret(output, &cursor("repo:"))),
            vec!["alpha", "beta"]
        );
    }

    #[test]
    fn test_word_breaks_limited_to_profile() {
        let interpreter = Interpreter::new(ShellProfile::ZSH).with_word_breaks(":=");
        assert_eq!(
            replies(interpreter.interpret(Some("repo:alpha\nrepo:beta\n4\n"), &cursor("repo:"))),
            vec!["repo\\:alpha", "repo\\:beta"]
        );
    }

    #[test]
    fn test_end_to_end_no_more_arguments() {
        let responder = Responder::new(
            Command::new("tool").subcommand(
                Command::new("status")
                    .about("Show status")
                    .arg(Arg::new("release").required(true)),
            ),
        );
        let args = vec!["status".to_string(), "rel".to_string(), String::new()];
        let output = encode(&responder.respond(&args, ResponderOptions::default()));

        let interpreter = Interpreter::new(ShellProfile::BASH);
        let completion = completion(interpreter.interpret(Some(&output), &cursor("")));
        assert!(completion.replies.is_empty());
        assert_eq!(completion.infos, vec![NO_MORE_ARGS_HINT]);
        assert!(!completion.file_fallback);
    }

    #[test]
    fn test_split_flag_value() {
        assert_eq!(split_flag_value("--output=ya"), ("--output=", "ya"));
        assert_eq!(split_flag_value("-o=ya"), ("-o=", "ya"));
        assert_eq!(split_flag_value("key=value"), ("", "key=value"));
    }
}
