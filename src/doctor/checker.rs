//! Environment checks for ETHelper.
//!
//! Verifies the external tool used to bring up local services
//! (`docker-compose`), the data root tables, and the sibling repositories
//! (`etlocal`, `etengine`, `etmodel`) that the export and setup panels act on.
//!
//! # Example
//!
//! ```rust
//! use ethelper::config::Config;
//! use ethelper::doctor::{DependencyChecker, ToolStatus};
//!
//! let checker = DependencyChecker::new();
//! let statuses = checker.check_all(&Config::new());
//!
//! for status in &statuses {
//!     if status.status != ToolStatus::Available {
//!         println!("{}: {}", status.name, status.message);
//!     }
//! }
//! ```
//!
//! All checks are non-panicking and return structured results.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use std::process::Command;

use crate::config::Config;
use crate::constants::{KEYS_FILE, MIGRATE_SUBDIR, TRANSLATIONS_FILE};

/// Status of a single dependency check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    /// Dependency is present and working
    Available,
    /// Dependency is not found or not working
    Missing,
    /// Could not determine status, or present with a problem
    Unknown,
}

/// Result of checking a single dependency.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyStatus {
    /// Name of the dependency (e.g., "docker-compose", "ETLocal")
    pub name: String,
    /// Status of the dependency
    pub status: ToolStatus,
    /// Version string if detected (e.g., "2.24.6")
    pub version: Option<String>,
    /// Human-readable message about the status
    pub message: String,
}

impl DependencyStatus {
    /// Creates a new dependency status.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        status: ToolStatus,
        version: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            version,
            message: message.into(),
        }
    }

    /// Creates a status for an available tool with a version.
    #[must_use]
    pub fn available(name: impl Into<String>, version: impl Into<String>) -> Self {
        let version_str = version.into();
        Self::new(
            name,
            ToolStatus::Available,
            Some(version_str.clone()),
            format!("Found version {version_str}"),
        )
    }

    /// Creates a status for a present directory or file.
    #[must_use]
    pub fn found(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, ToolStatus::Available, None, message)
    }

    /// Creates a status for a missing dependency.
    #[must_use]
    pub fn missing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, ToolStatus::Missing, None, message)
    }

    /// Creates a status for an unknown dependency state.
    #[must_use]
    pub fn unknown(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, ToolStatus::Unknown, None, message)
    }
}

/// Checker for the ETHelper working environment.
#[derive(Debug, Default)]
pub struct DependencyChecker;

impl DependencyChecker {
    /// Creates a new checker.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Checks everything the configured environment needs.
    pub fn check_all(&self, config: &Config) -> Vec<DependencyStatus> {
        vec![
            self.check_docker_compose(),
            self.check_data_root(&config.paths.data_root),
            self.check_etlocal(&config.repository_dir("etlocal")),
            self.check_service_repo("ETEngine", &config.repository_dir("etengine")),
            self.check_service_repo("ETModel", &config.repository_dir("etmodel")),
        ]
    }

    /// Checks if `docker-compose` is on PATH.
    pub fn check_docker_compose(&self) -> DependencyStatus {
        const NAME: &str = "docker-compose";
        match Self::run_version_command("docker-compose", &["--version"]) {
            Ok(output) => match Self::parse_version(&output) {
                Some(version) => DependencyStatus::available(NAME, version),
                None => DependencyStatus::unknown(
                    NAME,
                    format!("Found but could not parse version: {}", output.trim()),
                ),
            },
            Err(e) if Self::is_command_not_found(&e) => DependencyStatus::missing(
                NAME,
                "Not found in PATH. Required to set up ETEngine and ETModel locally",
            ),
            Err(e) => DependencyStatus::unknown(NAME, format!("Error checking: {e}")),
        }
    }

    /// Checks that the data root holds the key and translation tables.
    pub fn check_data_root(&self, data_root: &Path) -> DependencyStatus {
        const NAME: &str = "Data root";
        if !data_root.is_dir() {
            return DependencyStatus::missing(
                NAME,
                format!("Directory does not exist: {}", data_root.display()),
            );
        }

        let missing: Vec<&str> = [KEYS_FILE, TRANSLATIONS_FILE]
            .into_iter()
            .filter(|file| !data_root.join(file).is_file())
            .collect();

        if missing.is_empty() {
            DependencyStatus::found(NAME, format!("Valid data root at {}", data_root.display()))
        } else {
            DependencyStatus::missing(
                NAME,
                format!(
                    "Invalid data root (missing: {}): {}",
                    missing.join(", "),
                    data_root.display()
                ),
            )
        }
    }

    /// Checks the ETLocal checkout and its migration directory.
    pub fn check_etlocal(&self, dir: &Path) -> DependencyStatus {
        const NAME: &str = "ETLocal";
        if !dir.is_dir() {
            return DependencyStatus::missing(
                NAME,
                format!("Directory does not exist: {}", dir.display()),
            );
        }
        if !dir.join(MIGRATE_SUBDIR).is_dir() {
            return DependencyStatus::unknown(
                NAME,
                format!("No {MIGRATE_SUBDIR} directory in {}", dir.display()),
            );
        }
        DependencyStatus::found(NAME, format!("Found at {}", dir.display()))
    }

    /// Checks a service checkout that is brought up with `docker-compose`.
    pub fn check_service_repo(&self, name: &str, dir: &Path) -> DependencyStatus {
        if !dir.is_dir() {
            return DependencyStatus::missing(
                name,
                format!("Directory does not exist: {}", dir.display()),
            );
        }
        let has_compose_file = ["docker-compose.yml", "docker-compose.yaml", "compose.yml"]
            .iter()
            .any(|file| dir.join(file).is_file());
        if has_compose_file {
            DependencyStatus::found(name, format!("Found at {}", dir.display()))
        } else {
            DependencyStatus::unknown(
                name,
                format!("No docker-compose file in {}", dir.display()),
            )
        }
    }

    /// Runs a command to get version information.
    ///
    /// Returns stdout, or stderr when stdout is empty.
    fn run_version_command(command: &str, args: &[&str]) -> Result<String> {
        let output = Command::new(command)
            .args(args)
            .output()
            .with_context(|| format!("Failed to execute '{command}'"))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        Ok(if stdout.trim().is_empty() {
            stderr.to_string()
        } else {
            stdout.to_string()
        })
    }

    /// Finds the first `X.Y[.Z]` version in command output.
    ///
    /// Examples:
    /// - "Docker Compose version v2.24.6" -> Some("2.24.6")
    /// - "docker-compose version 1.29.2, build 5becea4c" -> Some("1.29.2")
    fn parse_version(output: &str) -> Option<String> {
        output
            .split_whitespace()
            .map(|word| word.trim_matches(|c: char| !c.is_ascii_digit()))
            .find(|word| {
                let parts: Vec<&str> = word.split('.').collect();
                parts.len() >= 2
                    && parts
                        .iter()
                        .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
            })
            .map(String::from)
    }

    /// Checks if an error indicates a command was not found.
    fn is_command_not_found(error: &anyhow::Error) -> bool {
        let error_msg = format!("{error:#}").to_lowercase();
        error_msg.contains("not found")
            || error_msg.contains("no such file")
            || error_msg.contains("cannot find")
            || error_msg.contains("os error 2") // ENOENT on Unix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_version() {
        assert_eq!(
            DependencyChecker::parse_version("Docker Compose version v2.24.6"),
            Some("2.24.6".to_string())
        );
        assert_eq!(
            DependencyChecker::parse_version("docker-compose version 1.29.2, build 5becea4c"),
            Some("1.29.2".to_string())
        );
        assert_eq!(DependencyChecker::parse_version("no version here"), None);
    }

    #[test]
    fn test_dependency_status_constructors() {
        let available = DependencyStatus::available("Tool", "1.0.0");
        assert_eq!(available.status, ToolStatus::Available);
        assert_eq!(available.version, Some("1.0.0".to_string()));

        let missing = DependencyStatus::missing("Tool", "Not found");
        assert_eq!(missing.status, ToolStatus::Missing);
        assert_eq!(missing.version, None);
    }

    #[test]
    fn test_check_data_root() {
        let temp_dir = TempDir::new().unwrap();
        let checker = DependencyChecker::new();

        let status = checker.check_data_root(temp_dir.path());
        assert_eq!(status.status, ToolStatus::Missing);
        assert!(status.message.contains("variables/keys.csv"));

        fs::create_dir_all(temp_dir.path().join("variables")).unwrap();
        fs::write(temp_dir.path().join(KEYS_FILE), "a\n").unwrap();
        fs::write(temp_dir.path().join(TRANSLATIONS_FILE), "a\nA\n").unwrap();
        let status = checker.check_data_root(temp_dir.path());
        assert_eq!(status.status, ToolStatus::Available);
    }

    #[test]
    fn test_check_etlocal() {
        let temp_dir = TempDir::new().unwrap();
        let checker = DependencyChecker::new();
        let etlocal = temp_dir.path().join("etlocal");

        assert_eq!(checker.check_etlocal(&etlocal).status, ToolStatus::Missing);

        fs::create_dir(&etlocal).unwrap();
        assert_eq!(checker.check_etlocal(&etlocal).status, ToolStatus::Unknown);

        fs::create_dir_all(etlocal.join(MIGRATE_SUBDIR)).unwrap();
        assert_eq!(checker.check_etlocal(&etlocal).status, ToolStatus::Available);
    }

    #[test]
    fn test_check_service_repo() {
        let temp_dir = TempDir::new().unwrap();
        let checker = DependencyChecker::new();

        let status = checker.check_service_repo("ETEngine", temp_dir.path());
        assert_eq!(status.status, ToolStatus::Unknown);

        fs::write(temp_dir.path().join("docker-compose.yml"), "services: {}\n").unwrap();
        let status = checker.check_service_repo("ETEngine", temp_dir.path());
        assert_eq!(status.status, ToolStatus::Available);
    }

    #[test]
    fn test_check_all_returns_all_statuses() {
        let checker = DependencyChecker::new();
        let statuses = checker.check_all(&Config::new());

        let names: Vec<_> = statuses.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["docker-compose", "Data root", "ETLocal", "ETEngine", "ETModel"]
        );
    }
}
