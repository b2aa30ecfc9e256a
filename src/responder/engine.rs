//! Completion responder - the in-process side of the protocol
//!
//! Ties together context resolution and value completers: given the words of
//! a completion request it produces the ordered entries and the directive.

use clap::{Arg, Command, ValueHint};
use tracing::debug;

use super::context::{CommandContext, CompletionTarget};
use super::provider::{CompleterRegistry, Completions, CompletionRequest};
use crate::error::CompletionError;
use crate::protocol::{Candidate, Directive, Response};

/// Hint shown when the active command accepts no more positional arguments.
pub const NO_MORE_ARGS_HINT: &str =
    "This command does not take any more arguments (but may accept flags).";

/// What the responder includes in its answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponderOptions {
    /// Keep candidate descriptions
    pub include_descriptions: bool,

    /// Keep info lines
    pub include_hints: bool,
}

impl Default for ResponderOptions {
    fn default() -> Self {
        Self {
            include_descriptions: true,
            include_hints: true,
        }
    }
}

/// Produces completion responses for a command tree
#[derive(Debug)]
pub struct Responder {
    /// Built root command
    command: Command,

    /// Dynamic value sources
    registry: CompleterRegistry,
}

impl Responder {
    /// Create a responder for a command tree
    ///
    /// # Arguments
    /// * `command` - Root command; it is built here so globals propagate
    pub fn new(mut command: Command) -> Self {
        command.build();
        Self {
            command,
            registry: CompleterRegistry::new(),
        }
    }

    /// Attach value completers
    pub fn with_registry(mut self, registry: CompleterRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// The built root command
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Answer a completion request
    ///
    /// # Arguments
    /// * `args` - Words after the program name; the last one is the partial
    ///   token under the cursor (`""` when nothing is typed yet)
    /// * `options` - Description and hint switches
    ///
    /// # Returns
    /// * `Response` - Entries in declaration order plus the directive
    pub fn respond(&self, args: &[String], options: ResponderOptions) -> Response {
        let (to_complete, words) = match args.split_last() {
            Some((last, rest)) => (last.as_str(), rest),
            None => ("", args),
        };

        let mut response = match self.resolve(words, to_complete) {
            Ok(completions) => completions.into(),
            Err(err) => {
                debug!("Completion resolution failed: {err}");
                Response::error()
            }
        };

        if !options.include_descriptions {
            response.strip_descriptions();
        }
        if !options.include_hints {
            response.strip_infos();
        }

        debug!(
            "Completion ended with directive: {}",
            response.directive().describe()
        );
        response
    }

    fn resolve(&self, words: &[String], to_complete: &str) -> Result<Completions, CompletionError> {
        let ctx = CommandContext::resolve(&self.command, words, to_complete)?;
        debug!(
            "Resolved command '{}' ({} positionals), target {:?}",
            ctx.command.get_name(),
            ctx.positionals.len(),
            ctx.target.prefix()
        );

        match &ctx.target {
            CompletionTarget::FlagName { prefix } => Ok(flag_names(&ctx, prefix)),
            CompletionTarget::FlagValue { arg, prefix } => self.values(&ctx, arg, prefix),
            CompletionTarget::Word { prefix } => self.words(&ctx, prefix),
        }
    }

    /// Subcommands, then values for the next positional
    fn words(&self, ctx: &CommandContext<'_>, prefix: &str) -> Result<Completions, CompletionError> {
        let mut completions = Completions::new(Directive::DEFAULT);

        let offer_subcommands = ctx.positionals.is_empty() && !ctx.after_separator;
        if offer_subcommands && ctx.command.has_subcommands() {
            for sub in ctx.command.get_subcommands() {
                if sub.is_hide_set() || !sub.get_name().starts_with(prefix) {
                    continue;
                }
                completions = completions.candidate(candidate(sub.get_name(), sub.get_about()));
            }
            completions.directive |= Directive::NO_FILE_COMP;
        }

        match ctx.next_positional() {
            Some(arg) => {
                let values = self.values(ctx, arg, prefix)?;
                if offer_subcommands && ctx.command.has_subcommands() {
                    // The positional decides about file fallback
                    completions.directive = values.directive;
                } else {
                    completions.directive |= values.directive;
                }
                completions.entries.extend(values.entries);
            }
            None if !ctx.command.has_subcommands() || !offer_subcommands => {
                completions.directive |= Directive::NO_FILE_COMP;
                completions = completions.info(NO_MORE_ARGS_HINT);
            }
            None => {}
        }

        Ok(completions)
    }

    /// Values for a flag or positional argument
    fn values(
        &self,
        ctx: &CommandContext<'_>,
        arg: &Arg,
        prefix: &str,
    ) -> Result<Completions, CompletionError> {
        let id = arg.get_id().as_str();

        if let Some(completer) = self.registry.get(&ctx.path, id) {
            let request = CompletionRequest {
                command_path: &ctx.path,
                positionals: &ctx.positionals,
                to_complete: prefix,
            };
            return completer
                .complete(&request)
                .map_err(|err| CompletionError::CompleterFailed {
                    arg: id.to_string(),
                    message: err.to_string(),
                });
        }

        let possible = arg.get_possible_values();
        if !possible.is_empty() {
            let mut completions = Completions::new(Directive::NO_FILE_COMP);
            for value in possible {
                if value.is_hide_set() || !value.get_name().starts_with(prefix) {
                    continue;
                }
                completions = completions.candidate(candidate(value.get_name(), value.get_help()));
            }
            return Ok(completions);
        }

        let directive = match arg.get_value_hint() {
            ValueHint::DirPath => Directive::FILTER_DIRS,
            ValueHint::FilePath | ValueHint::AnyPath | ValueHint::Unknown => Directive::DEFAULT,
            _ => Directive::NO_FILE_COMP,
        };
        Ok(Completions::new(directive))
    }
}

/// Long flags, and short flags when the token is at most `-x`
fn flag_names(ctx: &CommandContext<'_>, prefix: &str) -> Completions {
    let mut completions = Completions::new(Directive::NO_FILE_COMP);
    let include_shorts = prefix.len() <= 2 && !prefix.starts_with("--");

    for arg in ctx.command.get_arguments() {
        if arg.is_positional() || arg.is_hide_set() || ctx.is_exhausted(arg) {
            continue;
        }
        if let Some(long) = arg.get_long() {
            let flag = format!("--{long}");
            if flag.starts_with(prefix) {
                completions = completions.candidate(candidate(&flag, arg.get_help()));
            }
        }
        if include_shorts && let Some(short) = arg.get_short() {
            let flag = format!("-{short}");
            if flag.starts_with(prefix) {
                completions = completions.candidate(candidate(&flag, arg.get_help()));
            }
        }
    }
    completions
}

/// Build a candidate from a name and an optional clap help text (first line only)
fn candidate(text: &str, help: Option<&clap::builder::StyledStr>) -> Candidate {
    let candidate = Candidate::new(text);
    match help.map(|help| help.to_string()) {
        Some(help) => {
            let first_line = help.lines().next().unwrap_or_default().trim().to_string();
            candidate.describe(first_line)
        }
        None => candidate,
    }
}

impl From<Completions> for Response {
    fn from(completions: Completions) -> Self {
        let mut response = Response::new().with_directive(completions.directive);
        for entry in completions.entries {
            response.push(entry);
        }
        response
    }
}
