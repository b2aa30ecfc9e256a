use std::io;

use thiserror::Error;

/// Crate-wide `Result` type using [`ShellcompError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, ShellcompError>;

/// Top-level error type for shellcomp operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug, Error)]
pub enum ShellcompError {
    /// Configuration errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Completion resolution errors.
    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    /// Script generation errors.
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic error with a free-form message.
    #[error("{0}")]
    Generic(String),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    /// Invalid config format.
    #[error("Invalid config format: {0}")]
    InvalidFormat(String),

    /// Invalid field value.
    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidValue { field: String, value: String },

    /// Catch-all configuration problem.
    #[error("{0}")]
    Generic(String),
}

/// Errors raised while resolving completions from the command grammar.
///
/// These never reach the user directly; the responder turns them into the
/// error directive.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// A flag typed before the cursor is not part of the grammar.
    #[error("Unknown flag: {0}")]
    UnknownFlag(String),

    /// A flag that requires a value was given one inline but takes none.
    #[error("Flag '{0}' does not take a value")]
    UnexpectedValue(String),

    /// A registered value completer failed.
    #[error("Completer for '{arg}' failed: {message}")]
    CompleterFailed { arg: String, message: String },
}

/// Script generation errors.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The requested shell has no script template.
    #[error("Unsupported shell: {0}. Supported shells: bash, zsh, fish, powershell")]
    UnsupportedShell(String),

    /// The binary name cannot be used inside a shell function name.
    #[error("Invalid program name: {0}")]
    InvalidProgramName(String),
}

impl From<String> for ShellcompError {
    fn from(msg: String) -> Self {
        ShellcompError::Generic(msg)
    }
}

impl From<&str> for ShellcompError {
    fn from(msg: &str) -> Self {
        ShellcompError::Generic(msg.to_owned())
    }
}

impl From<toml::de::Error> for ShellcompError {
    fn from(err: toml::de::Error) -> Self {
        ShellcompError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}

impl From<toml::ser::Error> for ShellcompError {
    fn from(err: toml::ser::Error) -> Self {
        ShellcompError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}
