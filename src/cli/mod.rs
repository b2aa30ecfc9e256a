//! Command-line interface for shellcomp
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and merging with arguments
//! - Dispatch of the user-facing and hidden completion subcommands

pub mod completion;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::{Config, LogLevel};
use crate::error::{ConfigError, Result};
use crate::protocol::{REQUEST_TOKEN, REQUEST_TOKEN_NO_DESC};
use crate::script::ScriptOptions;

/// Environment variable overriding the log level
pub const LOG_ENV: &str = "SHELLCOMP_LOG";

/// Shell completion for command-line programs
#[derive(Parser, Debug)]
#[command(
    name = "shellcomp",
    version,
    about = "Shell completion scripts and completion protocol tooling",
    long_about = "Generates completion scripts for bash, zsh, fish and PowerShell and serves
the completion protocol those scripts speak.",
    arg_required_else_help = true
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Verbose mode (debug logging)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv", global = true)]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands for shellcomp
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate autocompletion scripts for the specified shell
    #[command(subcommand)]
    Completion(ShellCommand),

    /// Inspect or create the configuration file
    #[command(subcommand)]
    Config(ConfigAction),

    /// Show version information
    Version,

    /// Run the completion interpreter for a shell script
    #[command(name = "__complete-shell", hide = true)]
    CompleteShell {
        /// Target shell (bash, zsh, fish, powershell)
        shell: String,

        /// Terminal width
        #[arg(long, value_name = "N")]
        columns: Option<usize>,

        /// Do not request descriptions
        #[arg(long)]
        no_descriptions: bool,

        /// Drop usage hints
        #[arg(long)]
        no_hints: bool,

        /// Word-break characters active in the shell (bash `$COMP_WORDBREAKS`)
        #[arg(long, value_name = "CHARS", allow_hyphen_values = true)]
        word_breaks: Option<String>,

        /// Words of the command line up to the cursor
        #[arg(last = true, num_args = 0..)]
        words: Vec<String>,
    },
}

/// Shells a completion script can be generated for
#[derive(Subcommand, Debug, Clone)]
pub enum ShellCommand {
    /// Generate the autocompletion script for bash
    ///
    /// To load completions in your current shell session:
    /// $ source <(shellcomp completion bash)
    Bash(ScriptFlags),

    /// Generate the autocompletion script for zsh
    ///
    /// To load completions in your current shell session:
    /// $ source <(shellcomp completion zsh)
    Zsh(ScriptFlags),

    /// Generate the autocompletion script for fish
    ///
    /// To load completions in your current shell session:
    /// $ shellcomp completion fish | source
    Fish(ScriptFlags),

    /// Generate the autocompletion script for PowerShell
    ///
    /// To load completions in your current shell session:
    /// PS C:\> shellcomp completion powershell | Out-String | Invoke-Expression
    #[command(alias = "pwsh")]
    Powershell(ScriptFlags),
}

/// Switches shared by all script subcommands
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct ScriptFlags {
    /// Disable completion descriptions
    #[arg(long)]
    pub no_descriptions: bool,

    /// Disable usage hints
    #[arg(long)]
    pub no_hints: bool,
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Validate a configuration file
    Validate {
        /// File to validate (defaults to the active configuration file)
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Write a default configuration file
    Init {
        /// Directory to write config.toml into
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl ShellCommand {
    /// The `clap_complete` shell this subcommand stands for
    pub fn shell(&self) -> Shell {
        match self {
            ShellCommand::Bash(_) => Shell::Bash,
            ShellCommand::Zsh(_) => Shell::Zsh,
            ShellCommand::Fish(_) => Shell::Fish,
            ShellCommand::Powershell(_) => Shell::PowerShell,
        }
    }

    /// Script options selected by the flags
    pub fn options(&self) -> ScriptOptions {
        let flags = match self {
            ShellCommand::Bash(flags)
            | ShellCommand::Zsh(flags)
            | ShellCommand::Fish(flags)
            | ShellCommand::Powershell(flags) => flags,
        };
        ScriptOptions {
            include_descriptions: !flags.no_descriptions,
            include_hints: !flags.no_hints,
        }
    }
}

/// A protocol request (`__complete` / `__completeNoDesc`)
///
/// These are recognized before clap parsing so that the words being
/// completed are never interpreted as shellcomp's own flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolRequest {
    /// `__complete` rather than `__completeNoDesc`
    pub include_descriptions: bool,

    /// Words after the request token; the last one is the partial token
    pub args: Vec<String>,
}

impl ProtocolRequest {
    /// Recognize a protocol request in the process arguments
    ///
    /// # Arguments
    /// * `args` - Arguments after the program name
    ///
    /// # Returns
    /// * `Option<Self>` - The request, or None for ordinary invocations
    pub fn from_args(args: &[String]) -> Option<Self> {
        let (token, rest) = args.split_first()?;
        let include_descriptions = match token.as_str() {
            REQUEST_TOKEN => true,
            REQUEST_TOKEN_NO_DESC => false,
            _ => return None,
        };
        Some(Self {
            include_descriptions,
            args: rest.to_vec(),
        })
    }
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = match Config::load_from_file(args.config_file.as_deref()) {
            Ok(config) => config,
            // Completion inside the user's shell keeps working with a broken config file
            Err(_) if matches!(args.command, Commands::CompleteShell { .. }) => Config::default(),
            Err(e) => return Err(e),
        };

        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {}", e);
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        Self::apply_logging_args(&mut config, args);
        Ok(config)
    }

    /// Apply logging-related CLI arguments to configuration
    fn apply_logging_args(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else {
            config.logging.level
        };
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// A log level was forced on the command line
    pub fn has_verbosity_flag(&self) -> bool {
        self.args.verbose || self.args.very_verbose
    }

    /// Run the selected subcommand
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    pub fn handle_subcommand(&self) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();

        match &self.args.command {
            Commands::Version => self.show_version(&mut out),
            Commands::Completion(shell) => {
                completion::generate_completion(shell.shell(), shell.options(), &mut out)
            }
            Commands::Config(action) => self.handle_config_command(action, &mut out),
            Commands::CompleteShell {
                shell,
                columns,
                no_descriptions,
                no_hints,
                word_breaks,
                words,
            } => {
                let request = completion::ShellRequest {
                    shell,
                    columns: self.config.resolve_columns(*columns),
                    include_descriptions: !no_descriptions,
                    include_hints: !no_hints,
                    word_breaks: word_breaks.as_deref(),
                    words,
                };
                completion::run_shell_request(&request, &self.config, &mut out)
            }
        }
    }

    /// Show version information
    fn show_version<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "shellcomp version {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "Rust version: {}", env!("CARGO_PKG_RUST_VERSION"))?;
        Ok(())
    }

    /// Handle config subcommand
    fn handle_config_command<W: Write>(&self, action: &ConfigAction, out: &mut W) -> Result<()> {
        match action {
            ConfigAction::Show => self.show_config(out),
            ConfigAction::Validate { file } => {
                let path = file.clone().unwrap_or_else(|| self.get_config_path());
                Self::validate_config_file(&path, out)
            }
            ConfigAction::Init { dir, force } => {
                let path = dir
                    .as_ref()
                    .map(|dir| dir.join("config.toml"))
                    .unwrap_or_else(Config::default_path);
                Self::init_config_file(&path, *force, out)
            }
        }
    }

    /// Validate a configuration file
    fn validate_config_file<W: Write>(path: &Path, out: &mut W) -> Result<()> {
        writeln!(out, "Validating configuration file: {}", path.display())?;

        let config = Config::load_from_file(Some(path))?;
        config.validate()?;

        writeln!(out, "✅ Configuration is valid")?;
        Ok(())
    }

    /// Write the default configuration
    fn init_config_file<W: Write>(path: &Path, force: bool, out: &mut W) -> Result<()> {
        if path.exists() && !force {
            return Err(ConfigError::Generic(format!(
                "{} already exists, use --force to overwrite",
                path.display()
            ))
            .into());
        }

        Config::default().save(path)?;
        writeln!(out, "Wrote default configuration to {}", path.display())?;
        Ok(())
    }

    /// Show effective configuration
    fn show_config<W: Write>(&self, out: &mut W) -> Result<()> {
        let path = self.get_config_path();
        writeln!(out, "Configuration file: {}", path.display())?;
        writeln!(out)?;
        writeln!(out, "=== Effective Configuration ===")?;
        writeln!(out)?;
        writeln!(out, "{}", self.config.to_toml()?)?;
        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_path)
    }
}
