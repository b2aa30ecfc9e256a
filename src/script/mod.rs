//! Completion script generation
//!
//! Scripts are thin: they collect the words of the command line, hand them
//! to `<program> __complete-shell <shell>` and map the printed plan onto the
//! shell's own completion primitives. All completion logic lives in the
//! interpreter.
//!
//! # Examples
//!
//! ```
//! use shellcomp::interpreter::ShellProfile;
//! use shellcomp::script::{ScriptGenerator, ScriptOptions};
//!
//! let generator = ScriptGenerator::new("helm", ScriptOptions::default()).unwrap();
//! let script = generator.generate(&ShellProfile::BASH);
//! assert!(script.contains("complete -o default -F __start_helm helm"));
//! ```

mod bash;
mod fish;
mod powershell;
mod zsh;

use std::io::Write;

use tracing::debug;

use crate::error::{Result, ScriptError};
use crate::interpreter::ShellProfile;

/// Name of the hidden subcommand the scripts call
pub const SHELL_REQUEST: &str = "__complete-shell";

/// Options baked into a generated script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptOptions {
    /// Request candidate descriptions
    pub include_descriptions: bool,

    /// Show informational hints
    pub include_hints: bool,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            include_descriptions: true,
            include_hints: true,
        }
    }
}

/// Generates completion scripts for one program
#[derive(Debug, Clone)]
pub struct ScriptGenerator {
    program: String,
    options: ScriptOptions,
}

impl ScriptGenerator {
    /// Create a generator
    ///
    /// # Arguments
    /// * `program` - Command name the script registers completion for
    /// * `options` - Description and hint switches
    ///
    /// # Returns
    /// * `Result<Self>` - Generator, or an error if the name is unusable in a script
    pub fn new(program: impl Into<String>, options: ScriptOptions) -> Result<Self> {
        let program = program.into();
        validate_program_name(&program)?;
        Ok(Self { program, options })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Render the script for a shell
    pub fn generate(&self, profile: &ShellProfile) -> String {
        let template = match profile.name {
            "bash" => bash::TEMPLATE,
            "zsh" => zsh::TEMPLATE,
            "fish" => fish::TEMPLATE,
            _ => powershell::TEMPLATE,
        };
        self.fill(template, None)
    }

    /// Extra registration for a renamed binary
    ///
    /// Only bash and zsh register completions by command name in a way that
    /// can be hooked after the fact. Returns None for other shells, when the
    /// binary is not renamed, or when its name cannot be used in a script.
    pub fn renamed_binary_hook(&self, profile: &ShellProfile, binary: &str) -> Option<String> {
        if binary == self.program {
            return None;
        }
        if validate_program_name(binary).is_err() {
            debug!("Skipping renamed binary hook for {:?}", binary);
            return None;
        }
        let template = match profile.name {
            "bash" => bash::RENAMED_HOOK,
            "zsh" => zsh::RENAMED_HOOK,
            _ => return None,
        };
        Some(self.fill(template, Some(binary)))
    }

    /// Write the script, followed by the renamed binary hook when one applies
    pub fn write_to<W: Write>(
        &self,
        profile: &ShellProfile,
        binary: Option<&str>,
        writer: &mut W,
    ) -> Result<()> {
        writer.write_all(self.generate(profile).as_bytes())?;
        if let Some(hook) = binary.and_then(|binary| self.renamed_binary_hook(profile, binary)) {
            writer.write_all(hook.as_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }

    fn fill(&self, template: &str, binary: Option<&str>) -> String {
        let mut script = template
            .replace("@PROGRAM@", &self.program)
            .replace("@FUNC@", &function_name(&self.program))
            .replace("@FLAGS@", &self.flags());
        if let Some(binary) = binary {
            script = script.replace("@BINARY@", binary);
        }
        script
    }

    /// Switches forwarded to `__complete-shell`, each with a leading space
    fn flags(&self) -> String {
        let mut flags = String::new();
        if !self.options.include_descriptions {
            flags.push_str(" --no-descriptions");
        }
        if !self.options.include_hints {
            flags.push_str(" --no-hints");
        }
        flags
    }
}

/// Shell function suffix for a program name
fn function_name(program: &str) -> String {
    program
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn validate_program_name(program: &str) -> Result<()> {
    let valid = !program.is_empty()
        && program
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(ScriptError::InvalidProgramName(program.to_string()).into())
    }
}
