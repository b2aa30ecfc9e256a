//! Command context resolution
//!
//! Walks a built `clap::Command` tree with the words typed before the cursor
//! and works out where completion is happening: which (sub)command is active,
//! how many positionals are already consumed, and whether the partial token is
//! a flag name, a flag value, or a plain word.

use clap::{Arg, ArgAction, Command};

use crate::error::CompletionError;

/// What the token under the cursor should be completed as
#[derive(Debug, Clone)]
pub enum CompletionTarget<'a> {
    /// A flag name (`-x`, `--long`)
    FlagName { prefix: String },

    /// The value of a flag
    FlagValue { arg: &'a Arg, prefix: String },

    /// A subcommand name or a positional value
    Word { prefix: String },
}

impl CompletionTarget<'_> {
    /// Get the prefix for this target
    pub fn prefix(&self) -> &str {
        match self {
            Self::FlagName { prefix } => prefix,
            Self::FlagValue { prefix, .. } => prefix,
            Self::Word { prefix } => prefix,
        }
    }
}

/// Resolved position of the cursor inside the command grammar
#[derive(Debug, Clone)]
pub struct CommandContext<'a> {
    /// Active (deepest) command
    pub command: &'a Command,

    /// Subcommand names from the root, root excluded
    pub path: Vec<String>,

    /// Positional values already given to the active command
    pub positionals: Vec<String>,

    /// Ids of flags already present on the line
    pub used_flags: Vec<String>,

    /// `--` was seen; everything after it is positional
    pub after_separator: bool,

    /// What the partial token is
    pub target: CompletionTarget<'a>,
}

/// Flag waiting for its value in the next word
struct PendingValue<'a> {
    arg: &'a Arg,
}

impl<'a> CommandContext<'a> {
    /// Resolve the context for `words` (typed before the cursor) and `to_complete`
    ///
    /// # Arguments
    /// * `root` - Built root command
    /// * `words` - Complete words before the partial token, program name excluded
    /// * `to_complete` - Partial token under the cursor, possibly empty
    ///
    /// # Returns
    /// * `Result<Self, CompletionError>` - The context, or why the line cannot be resolved
    pub fn resolve(
        root: &'a Command,
        words: &[String],
        to_complete: &str,
    ) -> Result<Self, CompletionError> {
        let mut command = root;
        let mut path = Vec::new();
        let mut positionals = Vec::new();
        let mut used_flags = Vec::new();
        let mut after_separator = false;
        let mut pending: Option<PendingValue<'a>> = None;

        for word in words {
            if pending.take().is_some() {
                continue;
            }

            if after_separator {
                positionals.push(word.clone());
                continue;
            }

            if word == "--" {
                after_separator = true;
                continue;
            }

            if let Some(long) = word.strip_prefix("--") {
                let (name, inline) = split_inline(long);
                let arg = find_long(command, name)
                    .ok_or_else(|| CompletionError::UnknownFlag(format!("--{name}")))?;
                used_flags.push(arg.get_id().as_str().to_string());
                match (takes_value(arg), inline) {
                    (true, None) => pending = Some(PendingValue { arg }),
                    (false, Some(_)) => {
                        return Err(CompletionError::UnexpectedValue(format!("--{name}")));
                    }
                    _ => {}
                }
                continue;
            }

            if word.len() > 1 && word.starts_with('-') {
                pending = consume_shorts(command, &word[1..], &mut used_flags)?;
                continue;
            }

            if positionals.is_empty()
                && let Some(sub) = find_subcommand(command, word)
            {
                command = sub;
                path.push(sub.get_name().to_string());
                continue;
            }

            positionals.push(word.clone());
        }

        let target = match pending {
            Some(PendingValue { arg }) => CompletionTarget::FlagValue {
                arg,
                prefix: to_complete.to_string(),
            },
            None => classify(command, to_complete, after_separator)?,
        };

        Ok(Self {
            command,
            path,
            positionals,
            used_flags,
            after_separator,
            target,
        })
    }

    /// The positional argument the next plain word would fill, if any
    pub fn next_positional(&self) -> Option<&'a Arg> {
        let mut remaining = self.positionals.len();
        let mut positionals: Vec<&Arg> = self.command.get_positionals().collect();
        positionals.sort_by_key(|arg| arg.get_index().unwrap_or(usize::MAX));

        for arg in positionals {
            let capacity = positional_capacity(arg);
            if remaining < capacity {
                return Some(arg);
            }
            remaining -= capacity;
        }
        None
    }

    /// Whether a flag was already given and cannot be repeated
    pub fn is_exhausted(&self, arg: &Arg) -> bool {
        let repeatable = matches!(arg.get_action(), ArgAction::Append | ArgAction::Count);
        !repeatable && self.used_flags.iter().any(|id| id == arg.get_id().as_str())
    }
}

fn classify<'a>(
    command: &'a Command,
    to_complete: &str,
    after_separator: bool,
) -> Result<CompletionTarget<'a>, CompletionError> {
    if after_separator || !to_complete.starts_with('-') {
        return Ok(CompletionTarget::Word {
            prefix: to_complete.to_string(),
        });
    }

    if let Some(long) = to_complete.strip_prefix("--")
        && let (name, Some(value)) = split_inline(long)
    {
        let arg = find_long(command, name)
            .ok_or_else(|| CompletionError::UnknownFlag(format!("--{name}")))?;
        if !takes_value(arg) {
            return Err(CompletionError::UnexpectedValue(format!("--{name}")));
        }
        return Ok(CompletionTarget::FlagValue {
            arg,
            prefix: value.to_string(),
        });
    }

    // `-n=value` for a short flag taking a value
    let mut chars = to_complete.chars().skip(1);
    if let (Some(short), Some('=')) = (chars.next(), chars.next())
        && let Some(arg) = find_short(command, short)
        && takes_value(arg)
    {
        return Ok(CompletionTarget::FlagValue {
            arg,
            prefix: to_complete[2 + short.len_utf8()..].to_string(),
        });
    }

    Ok(CompletionTarget::FlagName {
        prefix: to_complete.to_string(),
    })
}

/// Walk a cluster of short flags (`-abc`, `-nvalue`).
///
/// Returns the flag still waiting for a value in the next word.
fn consume_shorts<'a>(
    command: &'a Command,
    cluster: &str,
    used_flags: &mut Vec<String>,
) -> Result<Option<PendingValue<'a>>, CompletionError> {
    for (offset, short) in cluster.char_indices() {
        let arg = find_short(command, short)
            .ok_or_else(|| CompletionError::UnknownFlag(format!("-{short}")))?;
        used_flags.push(arg.get_id().as_str().to_string());

        if takes_value(arg) {
            let rest = &cluster[offset + short.len_utf8()..];
            return Ok(rest.is_empty().then_some(PendingValue { arg }));
        }
    }
    Ok(None)
}

fn split_inline(flag: &str) -> (&str, Option<&str>) {
    match flag.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (flag, None),
    }
}

fn takes_value(arg: &Arg) -> bool {
    arg.get_action().takes_values()
        && arg
            .get_num_args()
            .is_none_or(|range| range.max_values() > 0)
}

fn positional_capacity(arg: &Arg) -> usize {
    if matches!(arg.get_action(), ArgAction::Append) {
        return usize::MAX;
    }
    arg.get_num_args()
        .map(|range| range.max_values())
        .unwrap_or(1)
        .max(1)
}

pub(crate) fn find_long<'a>(command: &'a Command, name: &str) -> Option<&'a Arg> {
    command.get_arguments().find(|arg| {
        arg.get_long() == Some(name)
            || arg
                .get_all_aliases()
                .is_some_and(|aliases| aliases.contains(&name))
    })
}

pub(crate) fn find_short(command: &Command, short: char) -> Option<&Arg> {
    command.get_arguments().find(|arg| {
        arg.get_short() == Some(short)
            || arg
                .get_all_short_aliases()
                .is_some_and(|aliases| aliases.contains(&short))
    })
}

fn find_subcommand<'a>(command: &'a Command, name: &str) -> Option<&'a Command> {
    command
        .get_subcommands()
        .find(|sub| sub.get_name() == name || sub.get_all_aliases().any(|alias| alias == name))
}
