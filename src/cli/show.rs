//! Prints the generated dataset transposed.

use clap::Args;
use std::path::Path;

use crate::cli::common::{load_workspace, print_json, CliError, CliResult};

/// Show output/data.csv as key/value pairs
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl ShowArgs {
    /// Execute show command
    pub fn execute(&self, data_root: Option<&Path>) -> CliResult<()> {
        let workspace = load_workspace(data_root)?;
        let output = workspace.output();

        let Some(contents) = output
            .read()
            .map_err(|e| CliError::io(format!("{e:#}")))?
        else {
            return Err(CliError::validation(format!(
                "No dataset generated yet: {} does not exist",
                output.dataset_path().display()
            )));
        };

        if self.json {
            return print_json(&contents);
        }

        if contents.is_empty() {
            println!("{} is empty", contents.path.display());
            return Ok(());
        }

        let width = contents
            .rows
            .iter()
            .map(|(key, _)| key.len())
            .max()
            .unwrap_or(0);
        for (key, value) in &contents.rows {
            println!("{key:<width$}  {value}");
        }

        Ok(())
    }
}
