//! Configuration management for shellcomp
//!
//! This module handles loading, parsing, and managing configuration from various sources:
//! - Configuration files (TOML format)
//! - Environment variables
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::responder::ResponderOptions;

/// Environment variable holding the terminal width, set by most shells.
pub const COLUMNS_ENV: &str = "COLUMNS";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Completion behavior
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Display configuration
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// What the responder includes in its answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Include candidate descriptions
    #[serde(default = "default_true")]
    pub descriptions: bool,

    /// Include usage hints (info lines)
    #[serde(default = "default_true")]
    pub hints: bool,
}

/// Layout settings for the shell-side interpreter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Terminal width used when neither the shell nor the terminal reports one
    #[serde(default = "default_columns")]
    pub columns: usize,

    /// Narrowest description column worth aligning
    #[serde(default = "default_min_description_width")]
    pub min_description_width: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default)]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_columns() -> usize {
    80
}

fn default_min_description_width() -> usize {
    8
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            descriptions: true,
            hints: true,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            min_description_width: default_min_description_width(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: false,
        }
    }
}

impl Config {
    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - `<config dir>/shellcomp/config.toml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shellcomp")
            .join("config.toml")
    }

    /// Load configuration from a file
    ///
    /// With `None` the default path is used and a missing file yields the
    /// default configuration. An explicitly given path must exist.
    ///
    /// # Arguments
    /// * `path` - Optional path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::default_path(), false),
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigError::FileNotFound(path.display().to_string()).into());
            }
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config = Self::from_toml(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize configuration as TOML text
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to a file, creating parent directories
    ///
    /// # Arguments
    /// * `path` - Path where to save the configuration
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        if self.display.columns == 0 {
            return Err(ConfigError::InvalidValue {
                field: "display.columns".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        if self.display.min_description_width >= self.display.columns {
            return Err(ConfigError::InvalidValue {
                field: "display.min_description_width".to_string(),
                value: self.display.min_description_width.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Responder options derived from the completion section
    pub fn responder_options(&self) -> ResponderOptions {
        ResponderOptions {
            include_descriptions: self.completion.descriptions,
            include_hints: self.completion.hints,
        }
    }

    /// Resolve the terminal width
    ///
    /// Order: explicit value, `COLUMNS`, the attached terminal, configured default.
    pub fn resolve_columns(&self, explicit: Option<usize>) -> usize {
        explicit
            .filter(|&columns| columns > 0)
            .or_else(|| {
                std::env::var(COLUMNS_ENV)
                    .ok()
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .filter(|&columns| columns > 0)
            })
            .or_else(|| {
                crossterm::terminal::size()
                    .ok()
                    .map(|(columns, _)| usize::from(columns))
                    .filter(|&columns| columns > 0)
            })
            .unwrap_or(self.display.columns)
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
