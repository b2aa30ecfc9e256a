//! Completion directive protocol
//!
//! This module defines the values exchanged between the program (which knows
//! the command grammar) and the shell-side interpreter (which only knows how
//! to invoke the program and render text):
//!
//! - [`Candidate`]: one completable token with an optional description
//! - [`InfoLine`]: advisory text that is shown but never completed
//! - [`Directive`]: bit flags adjusting the shell's behavior
//! - [`Response`]: the ordered entries plus the directive
//!
//! The wire encoding lives in [`codec`].

pub mod codec;

use bitflags::bitflags;
use std::fmt;

pub use codec::{decode, encode};

/// Token that switches the program into completion-request mode.
pub const REQUEST_TOKEN: &str = "__complete";

/// Completion-request token that also asks for descriptions to be omitted.
pub const REQUEST_TOKEN_NO_DESC: &str = "__completeNoDesc";

/// Prefix marking an info line on the wire.
pub const INFO_MARKER: &str = "_info_ ";

/// Separator between a candidate and its description on the wire.
pub const FIELD_SEPARATOR: char = '\t';

bitflags! {
    /// Behavioral directive sent along with the candidates.
    ///
    /// The numeric values are part of the wire format and must not change.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Directive: u32 {
        /// Completion failed; the shell must abort without file fallback.
        const ERROR = 1;
        /// No trailing space after a single accepted completion.
        const NO_SPACE = 1 << 1;
        /// Never fall back to filesystem completion.
        const NO_FILE_COMP = 1 << 2;
        /// Candidates are file extensions to filter native file completion on.
        const FILTER_FILE_EXT = 1 << 3;
        /// First candidate names a subdirectory for native directory completion.
        const FILTER_DIRS = 1 << 4;
    }
}

impl Directive {
    /// Offer candidates verbatim, allow space, file fallback only when empty.
    pub const DEFAULT: Directive = Directive::empty();

    /// Human-readable flag names, used in debug output.
    pub fn describe(&self) -> String {
        if self.is_empty() {
            return "Default".to_string();
        }
        let mut names: Vec<String> = self
            .iter_names()
            .map(|(name, _)| name.to_string())
            .collect();
        let unknown = self.bits() & !Directive::all().bits();
        if unknown != 0 {
            names.push(format!("UNKNOWN({unknown})"));
        }
        names.join(" | ")
    }
}

impl Default for Directive {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// One completable token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    text: String,
    description: Option<String>,
}

impl Candidate {
    /// Create a candidate without a description
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: sanitize(text.into()),
            description: None,
        }
    }

    /// Create a candidate with a description
    pub fn with_description(text: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(text).describe(description)
    }

    /// Attach a description, replacing any previous one.
    ///
    /// An empty description is treated as absent.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        let description = sanitize(description.into());
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    /// The literal completion text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Optional human-readable explanation
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Drop the description
    pub fn without_description(mut self) -> Self {
        self.description = None;
        self
    }
}

/// Advisory text shown to the user, never offered as a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoLine(String);

impl InfoLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self(sanitize(text.into()))
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

/// A single line of a response, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Candidate(Candidate),
    Info(InfoLine),
}

/// Everything the program returns for one completion request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Response {
    entries: Vec<Entry>,
    directive: Directive,
}

impl Response {
    /// Create an empty response with the default directive
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an error response: no entries, [`Directive::ERROR`]
    pub fn error() -> Self {
        Self {
            entries: Vec::new(),
            directive: Directive::ERROR,
        }
    }

    /// Append a candidate
    pub fn push_candidate(&mut self, candidate: Candidate) {
        self.entries.push(Entry::Candidate(candidate));
    }

    /// Append an info line
    pub fn push_info(&mut self, info: InfoLine) {
        self.entries.push(Entry::Info(info));
    }

    /// Append an entry of either kind
    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Builder-style directive setter
    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directive = directive;
        self
    }

    pub fn set_directive(&mut self, directive: Directive) {
        self.directive = directive;
    }

    pub fn directive(&self) -> Directive {
        self.directive
    }

    /// All entries in emission order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Candidates in emission order, info lines skipped
    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Candidate(candidate) => Some(candidate),
            Entry::Info(_) => None,
        })
    }

    /// Info lines in emission order
    pub fn infos(&self) -> impl Iterator<Item = &InfoLine> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Info(info) => Some(info),
            Entry::Candidate(_) => None,
        })
    }

    /// Drop descriptions from every candidate
    pub fn strip_descriptions(&mut self) {
        for entry in &mut self.entries {
            if let Entry::Candidate(candidate) = entry {
                candidate.description = None;
            }
        }
    }

    /// Drop every info line
    pub fn strip_infos(&mut self) {
        self.entries.retain(|entry| matches!(entry, Entry::Candidate(_)));
    }
}

/// Field and line separators cannot appear inside a wire field.
fn sanitize(value: String) -> String {
    if value.contains(['\t', '\n', '\r']) {
        value.replace(['\t', '\n', '\r'], " ")
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_values_are_stable() {
        assert_eq!(Directive::ERROR.bits(), 1);
        assert_eq!(Directive::NO_SPACE.bits(), 2);
        assert_eq!(Directive::NO_FILE_COMP.bits(), 4);
        assert_eq!(Directive::FILTER_FILE_EXT.bits(), 8);
        assert_eq!(Directive::FILTER_DIRS.bits(), 16);
        assert_eq!(Directive::DEFAULT.bits(), 0);
    }

    #[test]
    fn test_directive_describe() {
        assert_eq!(Directive::DEFAULT.describe(), "Default");
        assert_eq!(
            (Directive::NO_SPACE | Directive::NO_FILE_COMP).describe(),
            "NO_SPACE | NO_FILE_COMP"
        );
        assert_eq!(
            Directive::from_bits_retain(64 | 1).describe(),
            "ERROR | UNKNOWN(64)"
        );
    }

    #[test]
    fn test_candidate_never_holds_separator() {
        let candidate = Candidate::with_description("a\tb", "line\nbreak");
        assert_eq!(candidate.text(), "a b");
        assert_eq!(candidate.description(), Some("line break"));
    }

    #[test]
    fn test_empty_description_is_absent() {
        let candidate = Candidate::with_description("install", "");
        assert_eq!(candidate.description(), None);
    }

    #[test]
    fn test_response_keeps_emission_order() {
        let mut response = Response::new();
        response.push_info(InfoLine::new("first"));
        response.push_candidate(Candidate::new("b"));
        response.push_candidate(Candidate::new("a"));
        response.push_info(InfoLine::new("last"));

        let texts: Vec<&str> = response.candidates().map(Candidate::text).collect();
        assert_eq!(texts, vec!["b", "a"]);
        let infos: Vec<&str> = response.infos().map(InfoLine::text).collect();
        assert_eq!(infos, vec!["first", "last"]);
        assert!(matches!(response.entries()[0], Entry::Info(_)));
    }

    #[test]
    fn test_strip_helpers() {
        let mut response = Response::new();
        response.push_candidate(Candidate::with_description("x", "desc"));
        response.push_info(InfoLine::new("hint"));
        response.strip_descriptions();
        response.strip_infos();
        assert_eq!(response.entries(), &[Entry::Candidate(Candidate::new("x"))]);
    }
}
