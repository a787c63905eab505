//! Generates `output/data.csv` headlessly.

use clap::{Args, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::common::{load_workspace, print_json, print_warnings, CliError, CliResult};
use crate::cli::form::FormInputArgs;
use crate::models::Level;
use crate::services::{Completion, FormFilter, PopulateAction};

/// Populate action applied before writing.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    /// Set every empty preset value to 0
    Zeros,
    /// Copy defaults into empty basic values
    BasicDefaults,
    /// Copy defaults into empty advanced values
    AdvancedDefaults,
}

impl From<FillMode> for PopulateAction {
    fn from(mode: FillMode) -> Self {
        match mode {
            FillMode::Zeros => Self::Zeros,
            FillMode::BasicDefaults => Self::Defaults(Level::Basic),
            FillMode::AdvancedDefaults => Self::Defaults(Level::Advanced),
        }
    }
}

/// Write the dataset of a preset to output/data.csv
#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    input: FormInputArgs,

    /// Populate empty values before writing (repeatable, applied in order)
    #[arg(long, value_enum, value_name = "MODE")]
    fill: Vec<FillMode>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug)]
struct GenerateOutput {
    path: PathBuf,
    columns: usize,
    sha256: String,
    generated_at: String,
    completion: Completion,
}

impl GenerateArgs {
    /// Execute generate command
    pub fn execute(&self, data_root: Option<&Path>) -> CliResult<()> {
        let workspace = load_workspace(data_root)?;
        let preset = &self.input.preset;

        let mut warnings = Vec::new();
        let (catalog, mut session) = self.input.build_session(&workspace, &mut warnings)?;

        for mode in &self.fill {
            let changed = workspace
                .populate(&catalog, &mut session, preset, (*mode).into())
                .map_err(|e| CliError::validation(format!("{e:#}")))?
                .value;
            tracing::debug!("{mode:?} changed {changed} values");
        }

        // The form pass forces keys outside the preset to "0" and yields the
        // completion reported below.
        let form = workspace
            .form(&catalog, &mut session, preset, FormFilter::default(), false)
            .map_err(|e| CliError::validation(format!("{e:#}")))?
            .collect_into(&mut warnings);

        let generated = workspace
            .generate(&catalog, &mut session, preset)
            .map_err(|e| CliError::io(format!("{e:#}")))?
            .value;

        print_warnings(&warnings);

        if self.json {
            return print_json(&GenerateOutput {
                path: generated.path,
                columns: generated.columns,
                sha256: generated.sha256,
                generated_at: generated.generated_at.to_rfc3339(),
                completion: form.overall,
            });
        }

        println!("{}", session.status().label());
        println!(
            "Wrote {} columns to {}",
            generated.columns,
            generated.path.display()
        );
        println!("SHA-256: {}", generated.sha256);
        println!(
            "Completion: {}% ({}/{})",
            form.overall.percent, form.overall.completed, form.overall.total
        );

        Ok(())
    }
}
