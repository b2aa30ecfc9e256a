//! Completion responder
//!
//! This module answers completion requests issued by the shell-side
//! interpreter. It resolves the cursor position inside a `clap` command tree
//! and produces the candidates, info lines and directive for it.
//!
//! # Architecture
//!
//! - **Context**: resolves the active command and what the partial token is
//! - **Provider**: value completers registered per command path and argument
//! - **Engine**: the [`Responder`] that orchestrates both
//!
//! # Examples
//!
//! ```
//! use clap::Command;
//! use shellcomp::protocol::Directive;
//! use shellcomp::responder::{Responder, ResponderOptions};
//!
//! let responder = Responder::new(
//!     Command::new("tool")
//!         .subcommand(Command::new("install").about("Install a chart"))
//!         .subcommand(Command::new("list").about("List releases")),
//! );
//!
//! let args = vec!["in".to_string()];
//! let response = responder.respond(&args, ResponderOptions::default());
//! assert_eq!(response.candidates().next().unwrap().text(), "install");
//! assert_eq!(response.directive(), Directive::NO_FILE_COMP);
//! ```

mod context;
mod engine;
mod provider;

pub use context::{CommandContext, CompletionTarget};
pub use engine::{NO_MORE_ARGS_HINT, Responder, ResponderOptions};
pub use provider::{
    CompleterError, CompleterRegistry, Completions, CompletionRequest, Directories,
    FileExtensions, ValueCompleter,
};
