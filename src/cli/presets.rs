//! Lists the presets of the data root.

use clap::Args;
use std::path::Path;

use crate::cli::common::{load_workspace, print_json, print_warnings, CliError, CliResult};

/// List available presets
#[derive(Args, Debug)]
pub struct PresetsArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl PresetsArgs {
    /// Execute presets command
    pub fn execute(&self, data_root: Option<&Path>) -> CliResult<()> {
        let workspace = load_workspace(data_root)?;
        let loaded = workspace
            .store()
            .preset_summaries()
            .map_err(|e| CliError::io(format!("{e:#}")))?;
        print_warnings(&loaded.warnings);

        if self.json {
            return print_json(&loaded.value);
        }

        if loaded.value.is_empty() {
            println!("No presets found in {}", workspace.data_root().display());
            return Ok(());
        }

        for summary in &loaded.value {
            let categories = if summary.has_categories {
                "categories"
            } else {
                "no categories"
            };
            match &summary.default_file {
                Some(file) => println!(
                    "{:<20} {:>5} keys  {categories}, defaults: {file}",
                    summary.name, summary.key_count
                ),
                None => println!(
                    "{:<20} {:>5} keys  {categories}, no defaults",
                    summary.name, summary.key_count
                ),
            }
        }

        Ok(())
    }
}
