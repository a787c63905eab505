//! Local environment commands (ETEngine / ETModel bring-up).

use clap::{Args, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::cli::common::{load_config, print_json, CliError, CliResult};
use crate::constants::SETTINGS_LOCAL_FILE;
use crate::environment::{
    extract_identity_info, update_settings_file, JobStatus, Service, SetupJobManager,
    SETUP_COMMANDS,
};

/// Set up ETEngine and ETModel locally
#[derive(Args, Debug)]
pub struct EnvArgs {
    #[command(subcommand)]
    command: EnvCommand,
}

#[derive(Subcommand, Debug)]
enum EnvCommand {
    /// Show the service checkouts and their URLs
    Status(EnvStatusArgs),
    /// Run the docker-compose bring-up of a service
    Setup(EnvSetupArgs),
    /// Copy client_id / client_secret into ETModel's settings.local.yml
    Identity(EnvIdentityArgs),
}

/// Show the service checkouts
#[derive(Args, Debug)]
pub struct EnvStatusArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Run the bring-up of one service
#[derive(Args, Debug)]
pub struct EnvSetupArgs {
    /// Service to set up (etengine or etmodel)
    service: String,

    /// Output the finished job as JSON
    #[arg(long)]
    json: bool,
}

/// Link ETModel to ETEngine
#[derive(Args, Debug)]
pub struct EnvIdentityArgs {
    /// File holding the ETEngine identity output (client_id: / client_secret: lines)
    #[arg(long, value_name = "FILE")]
    from: PathBuf,

    /// Settings file to update (defaults to etmodel/config/settings.local.yml)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,
}

#[derive(Serialize, Debug)]
struct StatusOutput {
    service: Service,
    directory: String,
    directory_exists: bool,
    url: String,
}

impl EnvArgs {
    /// Execute env subcommand
    pub fn execute(&self, data_root: Option<&Path>) -> CliResult<()> {
        match &self.command {
            EnvCommand::Status(args) => args.execute(data_root),
            EnvCommand::Setup(args) => args.execute(data_root),
            EnvCommand::Identity(args) => args.execute(data_root),
        }
    }
}

impl EnvStatusArgs {
    /// Execute status command
    pub fn execute(&self, data_root: Option<&Path>) -> CliResult<()> {
        let config = load_config(data_root)?;
        let statuses: Vec<StatusOutput> = Service::ALL
            .into_iter()
            .map(|service| {
                let directory = config.repository_dir(service.name());
                StatusOutput {
                    service,
                    directory_exists: directory.is_dir(),
                    directory: directory.display().to_string(),
                    url: service.url(&config.services),
                }
            })
            .collect();

        if self.json {
            return print_json(&statuses);
        }

        for status in &statuses {
            let state = if status.directory_exists {
                "found"
            } else {
                "missing"
            };
            println!(
                "{:<10} {:<8} {}  ({})",
                status.service, state, status.directory, status.url
            );
        }
        Ok(())
    }
}

impl EnvSetupArgs {
    /// Execute setup command
    ///
    /// Runs the job on the manager's worker and blocks until it finishes.
    pub fn execute(&self, data_root: Option<&Path>) -> CliResult<()> {
        let service = Service::parse(&self.service).ok_or_else(|| {
            CliError::validation(format!(
                "Unknown service '{}'. Must be 'etengine' or 'etmodel'",
                self.service
            ))
        })?;

        let config = load_config(data_root)?;
        let manager = SetupJobManager::new(config.workspace_root(), config.services.clone());
        let job = manager
            .start_setup(service)
            .map_err(|e| CliError::validation(e.to_string()))?;

        if !self.json {
            println!(
                "Setting up {service} in {} ({} steps)",
                manager.service_dir(service).display(),
                SETUP_COMMANDS.len()
            );
        }

        let mut last_step = None;
        let job = loop {
            let Some(current) = manager.get_job(&job.id) else {
                return Err(CliError::io(format!("Setup job {} disappeared", job.id)));
            };
            if !self.json && current.current_step != last_step {
                if let Some(step) = &current.current_step {
                    println!("  [{:>3}%] {step}", current.progress);
                }
                last_step.clone_from(&current.current_step);
            }
            if current.status.is_finished() {
                break current;
            }
            thread::sleep(Duration::from_millis(200));
        };

        if self.json {
            print_json(&job)?;
        } else if job.status == JobStatus::Completed {
            println!("{service} set up at {}", service.url(&config.services));
            if let Some(password) = &job.admin_password {
                println!("Admin password: {password}");
            }
            if job.server_ready == Some(false) {
                println!("Warning: {service} did not answer yet");
            }
        }

        match job.status {
            JobStatus::Completed => Ok(()),
            _ => Err(CliError::io(
                job.error
                    .unwrap_or_else(|| format!("Setup of {service} failed")),
            )),
        }
    }
}

impl EnvIdentityArgs {
    /// Execute identity command
    pub fn execute(&self, data_root: Option<&Path>) -> CliResult<()> {
        let text = fs::read_to_string(&self.from).map_err(|e| {
            CliError::io(format!("Failed to read {}: {e}", self.from.display()))
        })?;

        let identity = extract_identity_info(&text);
        if identity.client_id.is_none() && identity.client_secret.is_none() {
            return Err(CliError::validation(format!(
                "No client_id or client_secret found in {}",
                self.from.display()
            )));
        }

        let settings = match &self.settings {
            Some(path) => path.clone(),
            None => load_config(data_root)?
                .repository_dir(Service::Etmodel.name())
                .join(SETTINGS_LOCAL_FILE),
        };

        let changed = update_settings_file(&settings, &identity)
            .map_err(|e| CliError::io(format!("{e:#}")))?;
        println!("Updated {changed} line(s) in {}", settings.display());
        if !identity.is_complete() {
            eprintln!("Warning: only one of client_id / client_secret was found");
        }
        Ok(())
    }
}
