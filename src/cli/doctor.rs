//! Doctor command for environment checking.

use clap::Args;
use std::path::Path;

use crate::cli::common::{load_config, CliError, CliResult};
use crate::doctor::{DependencyChecker, DoctorFormatter, OutputFormat, ToolStatus};

/// Check the working environment
#[derive(Debug, Clone, Args)]
pub struct DoctorArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl DoctorArgs {
    /// Execute the doctor command
    pub fn execute(&self, data_root: Option<&Path>) -> CliResult<()> {
        let config = load_config(data_root)?;

        let checker = DependencyChecker::new();
        let statuses = checker.check_all(&config);

        let format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Terminal
        };

        let formatter = DoctorFormatter::with_format(format);
        println!("{}", formatter.format_results(&statuses));

        let has_missing = statuses.iter().any(|s| s.status == ToolStatus::Missing);

        if has_missing {
            Err(CliError::validation("Some requirements are missing"))
        } else {
            Ok(())
        }
    }
}
