//! Shell-side completion interpreter
//!
//! The generated shell scripts are thin: they hand the words of the command
//! line to `__complete-shell`, which lands here. The interpreter calls the
//! program being completed, decodes its response and turns it into a
//! [`Plan`] using the capabilities of the target shell.
//!
//! # Examples
//!
//! ```
//! use shellcomp::interpreter::{Cursor, Interpreter, Plan, ShellProfile};
//!
//! let interpreter = Interpreter::new(ShellProfile::BASH);
//! let cursor = Cursor { token: "fooba", columns: 80 };
//! let plan = interpreter.interpret(Some("foo\tdesc1\nfoobar\tdesc2\n0\n"), &cursor);
//!
//! match plan {
//!     Plan::Complete(completion) => assert_eq!(completion.replies, vec!["foobar"]),
//!     other => panic!("unexpected plan {other:?}"),
//! }
//! ```

mod engine;
mod format;
mod invoke;
mod plan;
mod profile;

pub use engine::{Cursor, DEFAULT_MIN_DESCRIPTION_WIDTH, Interpreter};
pub use invoke::{CommandLine, Invocation};
pub use plan::{Completion, Plan};
pub use profile::{DescriptionStyle, ShellProfile};
