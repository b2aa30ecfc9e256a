//! Shared integration-test harness for running the `shellcomp` binary.

#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

/// Path of the binary under test.
pub fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_shellcomp")
}

/// A `shellcomp` invocation isolated from the user's configuration.
pub struct Shellcomp {
    config_home: TempDir,
    envs: Vec<(String, String)>,
}

impl Shellcomp {
    pub fn new() -> Self {
        Self {
            config_home: TempDir::new().expect("failed to create config home"),
            envs: Vec::new(),
        }
    }

    /// Directory used as the configuration root.
    pub fn config_home(&self) -> &Path {
        self.config_home.path()
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    /// Runs the binary with `args` and waits for it to exit.
    pub fn run(&self, args: &[&str]) -> Output {
        let mut command = Command::new(bin());
        command
            .args(args)
            .env("XDG_CONFIG_HOME", self.config_home.path())
            .env("HOME", self.config_home.path())
            .env_remove("SHELLCOMP_LOG")
            .env_remove("BASH_COMP_DEBUG_FILE")
            .env_remove("COLUMNS")
            .stdin(Stdio::null());
        for (key, value) in &self.envs {
            command.env(key, value);
        }
        command.output().expect("failed to run shellcomp")
    }

    /// Runs the binary, asserts success and returns stdout.
    pub fn stdout(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "shellcomp {args:?} should exit 0: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }
}
