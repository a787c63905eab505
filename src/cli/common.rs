//! Shared types and helpers for CLI commands.

use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::config::Config;
use crate::services::Workspace;

/// Process exit codes of the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed
    Success = 0,
    /// Invalid input, failed check, or unknown name
    ValidationError = 1,
    /// File system, process or serialization failure
    IoError = 2,
}

impl ExitCode {
    /// Numeric code handed to `std::process::exit`.
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Error returned by CLI commands.
#[derive(Debug, Clone)]
pub struct CliError {
    /// Exit code the process ends with
    pub kind: ExitCode,
    /// Message printed to stderr
    pub message: String,
}

impl CliError {
    /// Error caused by invalid input.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::ValidationError,
            message: message.into(),
        }
    }

    /// Error caused by the file system or an external process.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::IoError,
            message: message.into(),
        }
    }

    /// Exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.kind.code()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type of CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Prints loader warnings to stderr.
pub fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("Warning: {warning}");
    }
}

/// Prints a value as pretty JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON output: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Loads the configuration, replacing the data root when one is given.
pub fn load_config(data_root: Option<&Path>) -> CliResult<Config> {
    let mut config = Config::load()
        .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))?;

    if let Some(root) = data_root {
        if !root.is_dir() {
            return Err(CliError::validation(format!(
                "Data root is not a directory: {}",
                root.display()
            )));
        }
        config.paths.data_root = root.to_path_buf();
    }

    Ok(config)
}

/// Builds the workspace of the loaded configuration.
pub fn load_workspace(data_root: Option<&Path>) -> CliResult<Workspace> {
    Ok(Workspace::new(load_config(data_root)?))
}
