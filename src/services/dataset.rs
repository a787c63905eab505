//! Writing and reading back the generated dataset.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::{COMMITS_FILE_NAME, DATASET_FILE_NAME};
use crate::parser::{parse_dataset, write_dataset};

/// Result of a dataset generation.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedDataset {
    /// Where the dataset was written
    pub path: PathBuf,
    /// Number of key columns
    pub columns: usize,
    /// SHA-256 of the written file, hex encoded
    pub sha256: String,
    /// When the file was written
    pub generated_at: DateTime<Utc>,
    /// The written CSV text, offered for download
    #[serde(skip)]
    pub csv: String,
}

/// Contents of an existing dataset file.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetContents {
    /// Path of the file read
    pub path: PathBuf,
    /// `(key, value)` pairs in column order
    pub rows: Vec<(String, String)>,
}

impl DatasetContents {
    /// Whether the file held no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Renders `(key, value)` columns to CSV text.
pub fn render_dataset(columns: &[(&str, &str)]) -> Result<String> {
    let mut buf = Vec::new();
    write_dataset(&mut buf, columns)?;
    String::from_utf8(buf).context("Dataset is not valid UTF-8")
}

/// Hex-encoded SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Hex-encoded SHA-256 of a file.
pub fn file_sha256(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(sha256_hex(&bytes))
}

/// The output directory of a data root.
#[derive(Debug, Clone)]
pub struct OutputDir {
    dir: PathBuf,
}

impl OutputDir {
    /// Wraps an output directory (created on first write).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of `data.csv`.
    #[must_use]
    pub fn dataset_path(&self) -> PathBuf {
        self.dir.join(DATASET_FILE_NAME)
    }

    /// Path of `commits.yml`.
    #[must_use]
    pub fn commits_path(&self) -> PathBuf {
        self.dir.join(COMMITS_FILE_NAME)
    }

    /// Writes `columns` to `data.csv`, replacing any previous dataset.
    pub fn generate(&self, columns: &[(&str, &str)]) -> Result<GeneratedDataset> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let csv = render_dataset(columns)?;
        let path = self.dataset_path();
        fs::write(&path, &csv).with_context(|| format!("Failed to write {}", path.display()))?;

        let sha256 = sha256_hex(csv.as_bytes());
        info!(
            "Generated dataset with {} columns at {} (sha256 {})",
            columns.len(),
            path.display(),
            sha256
        );

        Ok(GeneratedDataset {
            path,
            columns: columns.len(),
            sha256,
            generated_at: Utc::now(),
            csv,
        })
    }

    /// Reads `data.csv` back, or `None` when it has not been generated.
    pub fn read(&self) -> Result<Option<DatasetContents>> {
        let path = self.dataset_path();
        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to open {}", path.display()));
            }
        };

        let rows =
            parse_dataset(file).with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(DatasetContents { path, rows }))
    }

    /// Raw CSV text of `data.csv`, or `None` when it has not been generated.
    pub fn read_text(&self) -> Result<Option<String>> {
        let path = self.dataset_path();
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }
}
