//! Shell completion library
//!
//! This library provides the pieces behind the `shellcomp` binary and can be
//! used to give any `clap` program bash, zsh, fish and PowerShell completion.
//!
//! # Modules
//!
//! - `cli`: Command-line interface of the shellcomp binary
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `interpreter`: Shell-side interpretation of completion responses
//! - `protocol`: Completion response model and wire codec
//! - `responder`: Program-side completion over a `clap` command tree
//! - `script`: Completion script generation
//!
//! # Example
//!
//! ```
//! use clap::{Arg, Command};
//! use shellcomp::interpreter::{Cursor, Interpreter, Plan, ShellProfile};
//! use shellcomp::protocol::encode;
//! use shellcomp::responder::{Responder, ResponderOptions};
//!
//! let responder = Responder::new(
//!     Command::new("tool").subcommand(
//!         Command::new("status").arg(Arg::new("release").required(true)),
//!     ),
//! );
//!
//! // Program side: answer `tool __complete status rel ""`
//! let args = vec!["status".to_string(), "rel".to_string(), String::new()];
//! let wire = encode(&responder.respond(&args, ResponderOptions::default()));
//!
//! // Shell side: turn the answer into a plan
//! let interpreter = Interpreter::new(ShellProfile::BASH);
//! let plan = interpreter.interpret(Some(&wire), &Cursor { token: "", columns: 80 });
//! if let Plan::Complete(completion) = plan {
//!     assert!(completion.replies.is_empty());
//!     assert_eq!(completion.infos.len(), 1);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod protocol;
pub mod responder;
pub mod script;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, ShellcompError};
pub use interpreter::{Interpreter, Plan, ShellProfile};
pub use protocol::{Candidate, Directive, Response};
pub use responder::{Responder, ResponderOptions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}
