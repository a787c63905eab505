//! Export of the generated dataset into an ETLocal migration folder.
//!
//! A migration `<name>` consists of a directory `db/migrate/<name>/` that
//! receives `data.csv` and `commits.yml`, and a Ruby script
//! `db/migrate/<name>.rb` whose importer call is patched so missing datasets
//! are created on import.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};

use crate::constants::{
    COMMITS_FILE_NAME, DATASET_FILE_NAME, IMPORTER_CALL, IMPORTER_CALL_PATCHED, IMPORTER_MARKER,
};

use super::dataset::{file_sha256, OutputDir};

/// Outcome of a migration update.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    /// Migration name
    pub name: String,
    /// Directory the files were copied into
    pub destination: PathBuf,
    /// File names copied into the destination
    pub copied: Vec<String>,
    /// SHA-256 of the copied dataset
    pub dataset_sha256: String,
    /// Patched script
    pub script: PathBuf,
    /// Number of lines changed in the script
    pub patched_lines: usize,
}

/// Replaces the importer call on every line mentioning the importer.
///
/// Returns the patched text and the number of changed lines. Line endings
/// are preserved, and patching already patched text changes nothing.
#[must_use]
pub fn patch_script(text: &str) -> (String, usize) {
    let mut patched = String::with_capacity(text.len() + IMPORTER_CALL_PATCHED.len());
    let mut changed = 0;

    for line in text.split_inclusive('\n') {
        if line.contains(IMPORTER_MARKER) && line.contains(IMPORTER_CALL) {
            patched.push_str(&line.replace(IMPORTER_CALL, IMPORTER_CALL_PATCHED));
            changed += 1;
        } else {
            patched.push_str(line);
        }
    }

    (patched, changed)
}

/// Trims a migration name and rejects empty names and path components.
pub fn validate_migration_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Migration name cannot be empty");
    }
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        anyhow::bail!("Invalid migration name '{name}': path separators are not allowed");
    }
    Ok(name)
}

/// Parses `commits.yml` to make sure ETLocal can read it.
pub fn check_commits_file(path: &Path) -> Result<()> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_yml::from_str::<serde_yml::Value>(&text)
        .with_context(|| format!("{} is not valid YAML", path.display()))?;
    Ok(())
}

fn created_or_modified(path: &Path) -> Option<SystemTime> {
    let metadata = fs::metadata(path).ok()?;
    metadata.created().or_else(|_| metadata.modified()).ok()
}

/// Migration folders of an ETLocal checkout.
#[derive(Debug, Clone)]
pub struct MigrationService {
    migrate_dir: PathBuf,
    output: OutputDir,
}

impl MigrationService {
    /// Creates a service over `<etlocal>/db/migrate`, copying from `output`.
    pub fn new(migrate_dir: impl Into<PathBuf>, output: OutputDir) -> Self {
        Self {
            migrate_dir: migrate_dir.into(),
            output,
        }
    }

    /// The `db/migrate` directory.
    #[must_use]
    pub fn migrate_dir(&self) -> &Path {
        &self.migrate_dir
    }

    /// Name of the most recently created migration folder, if any.
    pub fn most_recent(&self) -> Result<Option<String>> {
        let entries = match fs::read_dir(&self.migrate_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(
                    "Migration directory not found: {}",
                    self.migrate_dir.display()
                );
                return Ok(None);
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read {}", self.migrate_dir.display())
                });
            }
        };

        let mut newest: Option<(SystemTime, String)> = None;
        for entry in entries {
            let entry = entry.context("Failed to read migration entry")?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(time) = created_or_modified(&path) else {
                continue;
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            if newest.as_ref().is_none_or(|(t, _)| time > *t) {
                newest = Some((time, name));
            }
        }

        Ok(newest.map(|(_, name)| name))
    }

    /// Copies the dataset and commits file into migration `name` and patches
    /// its script.
    ///
    /// Failures are reported as they happen; files copied before a failure
    /// stay in place.
    pub fn update(&self, name: &str) -> Result<MigrationReport> {
        let name = validate_migration_name(name)?;

        let destination = self.migrate_dir.join(name);
        fs::create_dir_all(&destination)
            .with_context(|| format!("Failed to create {}", destination.display()))?;

        let dataset = self.output.dataset_path();
        let dataset_target = destination.join(DATASET_FILE_NAME);
        fs::copy(&dataset, &dataset_target).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                dataset.display(),
                dataset_target.display()
            )
        })?;
        debug!("Copied {}", dataset_target.display());

        let commits = self.output.commits_path();
        check_commits_file(&commits)?;
        let commits_target = destination.join(COMMITS_FILE_NAME);
        fs::copy(&commits, &commits_target).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                commits.display(),
                commits_target.display()
            )
        })?;
        debug!("Copied {}", commits_target.display());

        let script = self.migrate_dir.join(format!("{name}.rb"));
        let text = fs::read_to_string(&script)
            .with_context(|| format!("Failed to read migration script {}", script.display()))?;
        let (patched, patched_lines) = patch_script(&text);
        if patched_lines > 0 {
            fs::write(&script, patched)
                .with_context(|| format!("Failed to write {}", script.display()))?;
        }

        let dataset_sha256 = file_sha256(&dataset_target)?;
        info!(
            "Updated migration '{}' ({} script line(s) patched)",
            name, patched_lines
        );

        Ok(MigrationReport {
            name: name.to_string(),
            destination,
            copied: vec![DATASET_FILE_NAME.to_string(), COMMITS_FILE_NAME.to_string()],
            dataset_sha256,
            script,
            patched_lines,
        })
    }
}
