//! Program invocation for completion requests

use std::process::{Command, Stdio};

use tracing::debug;

use crate::protocol::{REQUEST_TOKEN, REQUEST_TOKEN_NO_DESC};

/// Command line words as seen by the shell, truncated at the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    words: Vec<String>,
}

impl CommandLine {
    /// Build from all words and the index of the word under the cursor
    ///
    /// Words after the cursor are dropped. A cursor past the last word means
    /// the previous token is complete, so an empty token is appended.
    pub fn new(mut words: Vec<String>, cword: usize) -> Self {
        words.truncate(cword.saturating_add(1));
        if cword >= words.len() {
            words.push(String::new());
        }
        Self { words }
    }

    /// Build from words already truncated at the cursor, the last being the current token
    pub fn from_words(words: Vec<String>) -> Self {
        let cword = words.len().saturating_sub(1);
        Self::new(words, cword)
    }

    /// Program name, the first word
    pub fn program(&self) -> Option<&str> {
        self.words.first().map(String::as_str)
    }

    /// The partial token under the cursor
    pub fn current(&self) -> &str {
        match self.words.as_slice() {
            [_, .., last] => last,
            _ => "",
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}

/// Request sent to the program for one completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Build the request for a command line
    ///
    /// # Arguments
    /// * `line` - Words up to the cursor
    /// * `include_descriptions` - Select `__complete` over `__completeNoDesc`
    ///
    /// # Returns
    /// * `Option<Self>` - None when the line has no program word
    pub fn new(line: &CommandLine, include_descriptions: bool) -> Option<Self> {
        let program = line.program().filter(|p| !p.is_empty())?.to_string();
        let token = if include_descriptions {
            REQUEST_TOKEN
        } else {
            REQUEST_TOKEN_NO_DESC
        };

        let mut args = Vec::with_capacity(line.words().len());
        args.push(token.to_string());
        args.extend(line.words().iter().skip(1).cloned());
        // A program word alone still needs the current (empty) token
        if args.len() == 1 {
            args.push(String::new());
        }

        Some(Self { program, args })
    }

    /// Run the program and capture its standard output
    ///
    /// Standard error is discarded. Returns None when the program cannot be
    /// spawned or exits unsuccessfully.
    pub fn run(&self) -> Option<String> {
        debug!("Calling {} {}", self.program, self.args.join(" "));
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();

        match output {
            Ok(output) if output.status.success() => {
                Some(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(output) => {
                debug!("Completion program exited with {}", output.status);
                None
            }
            Err(e) => {
                debug!("Failed to run {}: {}", self.program, e);
                None
            }
        }
    }
}
