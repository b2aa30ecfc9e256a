//! What the shell should do with one completion request
//!
//! A [`Plan`] is the interpreter's final answer. Shell scripts receive it as
//! line records and only map it onto their own completion primitives.

use std::io::{self, Write};

/// Outcome of the standard completion case
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Completion {
    /// Replies in display order
    pub replies: Vec<String>,

    /// Informational messages, shown after the list
    pub infos: Vec<String>,

    /// Ask the shell not to append a space
    pub no_space: bool,

    /// Native file completion should run since nothing matched
    pub file_fallback: bool,
}

/// Shell action for one completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// No completion at all
    Abort,

    /// Native file completion, unfiltered
    FileFallback,

    /// Native file completion restricted to these extensions
    FilterFileExt(Vec<String>),

    /// Native directory completion, optionally below a subdirectory
    FilterDirs(Option<String>),

    /// Replies computed by the interpreter
    Complete(Completion),
}

impl Plan {
    /// Keyword of the `action` record
    pub fn action(&self) -> &'static str {
        match self {
            Plan::Abort => "abort",
            Plan::FileFallback => "fallback",
            Plan::FilterFileExt(_) => "ext",
            Plan::FilterDirs(_) => "dirs",
            Plan::Complete(_) => "complete",
        }
    }

    /// Write the plan as line records
    ///
    /// The first record is always `action <keyword>`, followed by `opt`,
    /// `arg`, `reply` and `info` records as applicable.
    pub fn write_lines<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "action {}", self.action())?;
        match self {
            Plan::Abort | Plan::FileFallback => {}
            Plan::FilterFileExt(extensions) => {
                for extension in extensions {
                    writeln!(writer, "arg {extension}")?;
                }
            }
            Plan::FilterDirs(subdir) => {
                if let Some(subdir) = subdir {
                    writeln!(writer, "arg {subdir}")?;
                }
            }
            Plan::Complete(completion) => {
                if completion.no_space {
                    writeln!(writer, "opt nospace")?;
                }
                if completion.file_fallback {
                    writeln!(writer, "opt fallback")?;
                } else {
                    writeln!(writer, "opt nofiles")?;
                }
                for reply in &completion.replies {
                    writeln!(writer, "reply {reply}")?;
                }
                for info in &completion.infos {
                    writeln!(writer, "info {info}")?;
                }
            }
        }
        Ok(())
    }

    /// Plan rendered as a string of line records
    pub fn to_lines(&self) -> String {
        let mut buffer = Vec::new();
        // Writing to a Vec cannot fail
        let _ = self.write_lines(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}
