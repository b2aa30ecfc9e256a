//! Error handling module for shellcomp.
//!
//! Completion itself never fails loudly: the responder signals problems
//! through the error directive and the interpreter degrades to fewer or no
//! completions. The error types here cover the surrounding application:
//! configuration loading, script generation and plan output.
//!
//! # Example
//!
//! ```rust
//! use shellcomp::error::{ConfigError, Result, ShellcompError};
//!
//! fn check(columns: usize) -> Result<()> {
//!     if columns == 0 {
//!         return Err(ConfigError::InvalidValue {
//!             field: "display.columns".to_string(),
//!             value: columns.to_string(),
//!         }
//!         .into());
//!     }
//!     Ok(())
//! }
//!
//! assert!(matches!(check(0), Err(ShellcompError::Config(_))));
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{CompletionError, ConfigError, Result, ScriptError, ShellcompError};
