//! Shell completion for shellcomp itself
//!
//! This module wires the generic pieces to this binary: the script
//! generator for `completion <shell>`, the responder answering `__complete`
//! requests against shellcomp's own command tree, and the interpreter behind
//! `__complete-shell`.

use clap::CommandFactory;
use clap_complete::Shell;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::cli::{CliArgs, ProtocolRequest};
use crate::config::Config;
use crate::error::{Result, ScriptError};
use crate::interpreter::{CommandLine, Interpreter, ShellProfile};
use crate::protocol::Response;
use crate::responder::{CompleterRegistry, Directories, FileExtensions, Responder};
use crate::script::{ScriptGenerator, ScriptOptions};

/// Inputs of one `__complete-shell` call
#[derive(Debug, Clone, Copy)]
pub struct ShellRequest<'a> {
    /// Shell name as given on the command line
    pub shell: &'a str,

    /// Resolved terminal width
    pub columns: usize,

    pub include_descriptions: bool,
    pub include_hints: bool,

    /// Word-break characters reported by the shell, if any
    pub word_breaks: Option<&'a str>,

    /// Words up to the cursor, the last being the current token
    pub words: &'a [String],
}

/// Parse shell name string to Shell enum
///
/// Names are case-insensitive and `pwsh` is accepted for PowerShell.
pub fn parse_shell(shell_name: &str) -> Result<Shell> {
    match shell_name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        "powershell" | "pwsh" => Ok(Shell::PowerShell),
        _ => Err(ScriptError::UnsupportedShell(shell_name.to_string()).into()),
    }
}

/// Interpreter profile for a shell
fn profile_for(shell: Shell) -> Result<ShellProfile> {
    ShellProfile::for_shell(shell)
        .ok_or_else(|| ScriptError::UnsupportedShell(shell.to_string()).into())
}

/// Generate the completion script for shellcomp
///
/// When the running binary was renamed, bash and zsh scripts also register
/// the completion function for the new name.
///
/// # Arguments
/// * `shell` - Target shell
/// * `options` - Description and hint switches
/// * `out` - Destination of the script
///
/// # Returns
/// * `Result<()>` - Success or error
pub fn generate_completion<W: Write>(shell: Shell, options: ScriptOptions, out: &mut W) -> Result<()> {
    let profile = profile_for(shell)?;
    let program = CliArgs::command().get_name().to_string();
    let generator = ScriptGenerator::new(program, options)?;

    let binary = std::env::args()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned());
    debug!("Generating {} completion, invoked as {:?}", profile.name, binary);

    generator.write_to(&profile, binary.as_deref(), out)
}

/// Value completers for shellcomp's own arguments
pub fn completion_registry() -> CompleterRegistry {
    CompleterRegistry::new()
        .with("", "config_file", FileExtensions(vec!["toml".to_string()]))
        .with("config validate", "file", FileExtensions(vec!["toml".to_string()]))
        .with("config init", "dir", Directories(None))
}

/// Responder over shellcomp's own command tree
pub fn responder() -> Responder {
    Responder::new(CliArgs::command()).with_registry(completion_registry())
}

/// Answer a `__complete` / `__completeNoDesc` request
///
/// # Arguments
/// * `request` - Request recognized from the process arguments
/// * `config` - Completion switches from the configuration file
///
/// # Returns
/// * `Response` - Encoded by the caller
pub fn respond(request: &ProtocolRequest, config: &Config) -> Response {
    let mut options = config.responder_options();
    options.include_descriptions &= request.include_descriptions;
    responder().respond(&request.args, options)
}

/// Run the interpreter for `__complete-shell` and print the plan
///
/// Completion problems never fail this call; they degrade the plan. Only
/// an unknown shell name or a write error is reported.
pub fn run_shell_request<W: Write>(request: &ShellRequest<'_>, config: &Config, out: &mut W) -> Result<()> {
    let profile = profile_for(parse_shell(request.shell)?)?;

    let mut interpreter = Interpreter::new(profile)
        .with_min_description_width(config.display.min_description_width);
    if !request.include_hints || !config.completion.hints {
        interpreter = interpreter.without_hints();
    }
    if let Some(breaks) = request.word_breaks {
        interpreter = interpreter.with_word_breaks(breaks);
    }

    let line = CommandLine::from_words(request.words.to_vec());
    let include_descriptions = request.include_descriptions && config.completion.descriptions;
    let plan = interpreter.run(&line, include_descriptions, request.columns);
    debug!("Plan: {:?}", plan);

    plan.write_lines(out)?;
    out.flush()?;
    Ok(())
}
