//! ETLocal migration commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::Path;

use crate::cli::common::{load_workspace, print_json, CliError, CliResult};

/// Export the dataset into an ETLocal migration
#[derive(Args, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    command: MigrateCommand,
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Print the most recently created migration
    Latest(MigrateLatestArgs),
    /// Copy data.csv and commits.yml into a migration and patch its script
    Update(MigrateUpdateArgs),
}

/// Print the most recently created migration
#[derive(Args, Debug)]
pub struct MigrateLatestArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Copy the dataset into a migration
#[derive(Args, Debug)]
pub struct MigrateUpdateArgs {
    /// Migration name (defaults to the most recent migration)
    name: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug)]
struct LatestOutput {
    migrate_dir: String,
    latest: Option<String>,
}

impl MigrateArgs {
    /// Execute migrate subcommand
    pub fn execute(&self, data_root: Option<&Path>) -> CliResult<()> {
        match &self.command {
            MigrateCommand::Latest(args) => args.execute(data_root),
            MigrateCommand::Update(args) => args.execute(data_root),
        }
    }
}

impl MigrateLatestArgs {
    /// Execute latest command
    pub fn execute(&self, data_root: Option<&Path>) -> CliResult<()> {
        let workspace = load_workspace(data_root)?;
        let migrations = workspace.migrations();
        let latest = migrations
            .most_recent()
            .map_err(|e| CliError::io(format!("{e:#}")))?;

        if self.json {
            return print_json(&LatestOutput {
                migrate_dir: migrations.migrate_dir().display().to_string(),
                latest,
            });
        }

        match latest {
            Some(name) => println!("{name}"),
            None => println!(
                "No migrations found in {}",
                migrations.migrate_dir().display()
            ),
        }
        Ok(())
    }
}

impl MigrateUpdateArgs {
    /// Execute update command
    pub fn execute(&self, data_root: Option<&Path>) -> CliResult<()> {
        let workspace = load_workspace(data_root)?;
        let migrations = workspace.migrations();

        let name = match &self.name {
            Some(name) => name.clone(),
            None => migrations
                .most_recent()
                .map_err(|e| CliError::io(format!("{e:#}")))?
                .ok_or_else(|| {
                    CliError::validation(format!(
                        "No migration name given and none found in {}",
                        migrations.migrate_dir().display()
                    ))
                })?,
        };
        if name.trim().is_empty() {
            return Err(CliError::validation("Migration name cannot be empty"));
        }

        let report = migrations
            .update(&name)
            .map_err(|e| CliError::io(format!("{e:#}")))?;

        if self.json {
            return print_json(&report);
        }

        println!("Updated migration '{}'", report.name);
        for file in &report.copied {
            println!("  copied {file} -> {}", report.destination.display());
        }
        println!(
            "  patched {} line(s) in {}",
            report.patched_lines,
            report.script.display()
        );
        println!("  data.csv SHA-256: {}", report.dataset_sha256);
        Ok(())
    }
}
