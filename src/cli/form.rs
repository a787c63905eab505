//! Session inputs shared by `completion` and `generate`.

use clap::Args;
use std::fs;
use std::path::PathBuf;

use crate::cli::common::{CliError, CliResult};
use crate::models::KeyCatalog;
use crate::parser::parse_dataset;
use crate::services::{FormSession, Workspace};

/// Preset and values to build a form session from.
#[derive(Args, Debug, Clone)]
pub struct FormInputArgs {
    /// Preset (country/region) to render
    #[arg(short, long, value_name = "NAME")]
    pub preset: String,

    /// Start from the values of an existing dataset CSV
    #[arg(long, value_name = "FILE")]
    pub values: Option<PathBuf>,

    /// Set a single value (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub assignments: Vec<String>,
}

impl FormInputArgs {
    /// Loads the catalog and fills a session from `--values` and `--set`.
    ///
    /// Keys in the values file that are not in the catalog are skipped with
    /// a warning; unknown keys in `--set` are an error.
    pub fn build_session(
        &self,
        workspace: &Workspace,
        warnings: &mut Vec<String>,
    ) -> CliResult<(KeyCatalog, FormSession)> {
        let catalog = workspace
            .catalog()
            .map_err(|e| CliError::io(format!("{e:#}")))?;
        let mut session = FormSession::from_catalog(&catalog);

        if let Some(path) = &self.values {
            let file = fs::File::open(path).map_err(|e| {
                CliError::io(format!("Failed to open values file {}: {e}", path.display()))
            })?;
            let pairs = parse_dataset(file).map_err(|e| {
                CliError::validation(format!(
                    "Failed to parse values file {}: {e:#}",
                    path.display()
                ))
            })?;

            for (key, value) in pairs {
                if session.set_value(&key, value).is_err() {
                    warnings.push(format!(
                        "Skipping key '{key}' from {}: not in the key list",
                        path.display()
                    ));
                }
            }
        }

        for assignment in &self.assignments {
            let (key, value) = parse_assignment(assignment)?;
            session
                .set_value(key, value)
                .map_err(|e| CliError::validation(e.to_string()))?;
        }

        Ok((catalog, session))
    }
}

/// Splits `KEY=VALUE`. The value may be empty and may contain `=`.
pub fn parse_assignment(assignment: &str) -> CliResult<(&str, &str)> {
    match assignment.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(CliError::validation(format!(
            "Invalid assignment '{assignment}'. Expected KEY=VALUE"
        ))),
    }
}
