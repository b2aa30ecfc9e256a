//! shellcomp - shell completion for command-line programs
//!
//! Generates completion scripts and serves the completion protocol those
//! scripts speak.
//!
//! # Usage
//!
//! ```bash
//! # Load completions into the current bash session
//! source <(shellcomp completion bash)
//!
//! # Ask for completions directly
//! shellcomp __complete completion ""
//! ```

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::EnvFilter;

use shellcomp::cli::{CliInterface, Commands, LOG_ENV, ProtocolRequest, completion};
use shellcomp::config::Config;
use shellcomp::error::Result;

/// Environment variable naming the completion trace file
const DEBUG_FILE_ENV: &str = "BASH_COMP_DEBUG_FILE";

/// Application entry point
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// Protocol requests are answered before any argument parsing; everything
/// else goes through clap, configuration and logging setup.
///
/// # Returns
/// * `Result<()>` - Success or error
fn run() -> Result<()> {
    let raw: Vec<String> = std::env::args().skip(1).collect();
    if let Some(request) = ProtocolRequest::from_args(&raw) {
        return respond(&request);
    }

    let cli = CliInterface::new()?;
    initialize_logging(&cli);
    cli.handle_subcommand()
}

/// Answer a `__complete` request on stdout
fn respond(request: &ProtocolRequest) -> Result<()> {
    // A broken config file must not break completion
    let config = Config::load_from_file(None).unwrap_or_default();

    let filter = log_filter(false, config.logging.level.to_tracing_level());
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);
    if config.logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }

    let response = completion::respond(request, &config);
    let stdout = io::stdout();
    response.write_to(&mut stdout.lock())?;
    Ok(())
}

/// Initialize logging based on verbosity
///
/// Logs go to stderr. The interpreter mode runs inside the user's shell, so
/// it only traces into `BASH_COMP_DEBUG_FILE` and stays silent otherwise.
fn initialize_logging(cli: &CliInterface) {
    let level = cli.config().logging.level.to_tracing_level();

    if matches!(cli.args().command, Commands::CompleteShell { .. }) {
        let level = if cli.args().very_verbose {
            Level::TRACE
        } else {
            Level::DEBUG
        };
        initialize_debug_file_logging(level);
        return;
    }

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.has_verbosity_flag(), level))
        .with_target(false)
        .with_writer(io::stderr);

    // Configure timestamps
    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}

/// Level filter: command-line flags, then `SHELLCOMP_LOG`, then configuration
fn log_filter(forced: bool, level: Level) -> EnvFilter {
    if !forced && let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return filter;
    }
    EnvFilter::new(level.as_str())
}

fn initialize_debug_file_logging(level: Level) {
    let Some(path) = std::env::var_os(DEBUG_FILE_ENV).filter(|path| !path.is_empty()) else {
        return;
    };
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .with_writer(Mutex::new(file))
        .init();
}
