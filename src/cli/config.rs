//! Configuration management CLI commands.

use crate::cli::common::{print_json, CliError, CliResult};
use crate::config::Config;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Configuration management commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Set configuration values
    Set(ConfigSetArgs),
}

/// Display current configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set configuration values
///
/// The data root is stored from the global `--data-root` option.
#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Directory holding the etlocal, etengine and etmodel checkouts
    #[arg(long, value_name = "DIR")]
    workspace_root: Option<PathBuf>,

    /// URL of the local ETEngine
    #[arg(long, value_name = "URL")]
    engine_url: Option<String>,

    /// URL of the local ETModel
    #[arg(long, value_name = "URL")]
    model_url: Option<String>,

    /// Port of the web server
    #[arg(long, value_name = "PORT")]
    port: Option<u16>,
}

/// JSON-serializable configuration for output
#[derive(Serialize, Debug)]
struct ConfigOutput<'a> {
    config_file: Option<String>,
    #[serde(flatten)]
    config: &'a Config,
    resolved: ResolvedOutput,
}

/// Paths derived from the configuration
#[derive(Serialize, Debug)]
struct ResolvedOutput {
    workspace_root: String,
    migrate_dir: String,
    output_dir: String,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self, data_root: Option<&Path>) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Set(args) => args.execute(data_root),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load()
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))?;

        if self.json {
            output_json(&config)
        } else {
            output_human_readable(&config);
            Ok(())
        }
    }
}

impl ConfigSetArgs {
    /// Execute set command
    pub fn execute(&self, data_root: Option<&Path>) -> CliResult<()> {
        if data_root.is_none()
            && self.workspace_root.is_none()
            && self.engine_url.is_none()
            && self.model_url.is_none()
            && self.port.is_none()
        {
            return Err(CliError::validation(
                "At least one configuration option must be specified: --data-root, --workspace-root, --engine-url, --model-url, or --port",
            ));
        }

        let mut config = Config::load().unwrap_or_default();

        if let Some(path) = data_root {
            config.paths.data_root = path.to_path_buf();
        }
        if let Some(path) = &self.workspace_root {
            config.paths.workspace_root = Some(path.clone());
        }
        if let Some(url) = &self.engine_url {
            config.services.engine_url.clone_from(url);
        }
        if let Some(url) = &self.model_url {
            config.services.model_url.clone_from(url);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        config
            .validate()
            .map_err(|e| CliError::validation(format!("{e:#}")))?;

        config
            .save()
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

        println!("Configuration updated successfully.");

        Ok(())
    }
}

fn resolved(config: &Config) -> ResolvedOutput {
    ResolvedOutput {
        workspace_root: config.workspace_root().display().to_string(),
        migrate_dir: config.migrate_dir().display().to_string(),
        output_dir: config.output_dir().display().to_string(),
    }
}

/// Output configuration in JSON format
fn output_json(config: &Config) -> CliResult<()> {
    print_json(&ConfigOutput {
        config_file: Config::config_file_path()
            .ok()
            .map(|p| p.display().to_string()),
        config,
        resolved: resolved(config),
    })
}

/// Output configuration in human-readable format
fn output_human_readable(config: &Config) {
    let resolved = resolved(config);

    println!("ETHelper Configuration");
    println!("======================");
    println!();
    if let Ok(path) = Config::config_file_path() {
        let state = if path.exists() { "" } else { " (not created)" };
        println!("Config file:    {}{state}", path.display());
        println!();
    }

    println!("Paths:");
    println!("  Data root:      {}", config.paths.data_root.display());
    println!("  Workspace root: {}", resolved.workspace_root);
    println!("  Migrations:     {}", resolved.migrate_dir);
    println!("  Output:         {}", resolved.output_dir);
    println!();

    println!("Services:");
    println!("  ETEngine:       {}", config.services.engine_url);
    println!("  ETModel:        {}", config.services.model_url);
    println!(
        "  Wait:           {}s (every {}s)",
        config.services.wait_timeout_secs, config.services.poll_interval_secs
    );
    println!();

    println!("Server:");
    println!("  Address:        {}:{}", config.server.host, config.server.port);
}
