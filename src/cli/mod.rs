//! CLI command handlers for ETHelper.
//!
//! This module provides headless, scriptable access to the form, the dataset
//! export and the local environment for automation and testing.

pub mod common;
pub mod completion;
pub mod config;
pub mod doctor;
pub mod env;
pub mod form;
pub mod generate;
pub mod migrate;
pub mod presets;
pub mod show;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode};
pub use completion::CompletionArgs;
pub use config::ConfigArgs;
pub use doctor::DoctorArgs;
pub use env::EnvArgs;
pub use generate::GenerateArgs;
pub use migrate::MigrateArgs;
pub use presets::PresetsArgs;
pub use show::ShowArgs;
