//! Value completers
//!
//! The grammar alone cannot know every legal value (release names, files of
//! a given type, ...). A [`ValueCompleter`] registered for a command path and
//! argument id supplies them on demand, the way a framework-level completion
//! callback would.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::protocol::{Candidate, Directive, Entry, InfoLine};

/// Input handed to a value completer
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    /// Subcommand names from the root, root excluded
    pub command_path: &'a [String],

    /// Positional values already given to the active command
    pub positionals: &'a [String],

    /// Partial value under the cursor
    pub to_complete: &'a str,
}

/// Candidates, info lines and directive produced for one argument
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Completions {
    pub entries: Vec<Entry>,
    pub directive: Directive,
}

impl Completions {
    /// Create an empty result with the given directive
    pub fn new(directive: Directive) -> Self {
        Self {
            entries: Vec::new(),
            directive,
        }
    }

    /// Restrict native file completion to the given extensions
    pub fn file_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut completions = Self::new(Directive::FILTER_FILE_EXT);
        for extension in extensions {
            completions = completions.candidate(Candidate::new(extension));
        }
        completions
    }

    /// Restrict native completion to directories, optionally below `subdir`
    pub fn directories(subdir: Option<&str>) -> Self {
        let completions = Self::new(Directive::FILTER_DIRS);
        match subdir {
            Some(subdir) => completions.candidate(Candidate::new(subdir)),
            None => completions,
        }
    }

    /// Append a candidate
    pub fn candidate(mut self, candidate: Candidate) -> Self {
        self.entries.push(Entry::Candidate(candidate));
        self
    }

    /// Append an info line
    pub fn info(mut self, text: impl Into<String>) -> Self {
        self.entries.push(Entry::Info(InfoLine::new(text)));
        self
    }

    /// Add directive flags
    pub fn with(mut self, directive: Directive) -> Self {
        self.directive |= directive;
        self
    }
}

/// Failure reported by a value completer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CompleterError(pub String);

/// Supplies values for one argument
pub trait ValueCompleter: Send + Sync {
    /// Produce completions for the partial value in `request`
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<Completions, CompleterError>;
}

impl<F> ValueCompleter for F
where
    F: Fn(&CompletionRequest<'_>) -> Result<Completions, CompleterError> + Send + Sync,
{
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<Completions, CompleterError> {
        self(request)
    }
}

/// Static completer: files with one of the given extensions
#[derive(Debug, Clone)]
pub struct FileExtensions(pub Vec<String>);

impl ValueCompleter for FileExtensions {
    fn complete(&self, _request: &CompletionRequest<'_>) -> Result<Completions, CompleterError> {
        Ok(Completions::file_extensions(self.0.iter().cloned()))
    }
}

/// Static completer: directories, optionally below a subdirectory
#[derive(Debug, Clone, Default)]
pub struct Directories(pub Option<String>);

impl ValueCompleter for Directories {
    fn complete(&self, _request: &CompletionRequest<'_>) -> Result<Completions, CompleterError> {
        Ok(Completions::directories(self.0.as_deref()))
    }
}

/// Completers keyed by command path and argument id
#[derive(Default)]
pub struct CompleterRegistry {
    completers: HashMap<(String, String), Box<dyn ValueCompleter>>,
}

impl CompleterRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a completer
    ///
    /// # Arguments
    /// * `command_path` - Space-separated subcommand path, `""` for the root
    /// * `arg_id` - Id of the argument inside that command
    /// * `completer` - Value source
    pub fn register<C>(&mut self, command_path: &str, arg_id: &str, completer: C)
    where
        C: ValueCompleter + 'static,
    {
        self.completers.insert(
            (normalize_path(command_path), arg_id.to_string()),
            Box::new(completer),
        );
    }

    /// Builder-style [`register`](Self::register)
    pub fn with<C>(mut self, command_path: &str, arg_id: &str, completer: C) -> Self
    where
        C: ValueCompleter + 'static,
    {
        self.register(command_path, arg_id, completer);
        self
    }

    /// Look up the completer for an argument
    pub fn get(&self, command_path: &[String], arg_id: &str) -> Option<&dyn ValueCompleter> {
        self.completers
            .get(&(command_path.join(" "), arg_id.to_string()))
            .map(|completer| completer.as_ref())
    }

    pub fn len(&self) -> usize {
        self.completers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completers.is_empty()
    }
}

impl fmt::Debug for CompleterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<String> = self
            .completers
            .keys()
            .map(|(path, arg)| format!("{path}:{arg}"))
            .collect();
        keys.sort();
        f.debug_struct("CompleterRegistry")
            .field("completers", &keys)
            .finish()
    }
}

fn normalize_path(path: &str) -> String {
    path.split_whitespace().collect::<Vec<_>>().join(" ")
}
