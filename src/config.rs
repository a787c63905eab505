//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_DIR_ENV, CONFIG_DIR_NAME, MIGRATE_SUBDIR, OUTPUT_DIR};

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathConfig {
    /// Directory containing `variables/`, `presets/`, `config/` and `output/`.
    pub data_root: PathBuf,
    /// Directory containing the `etlocal`, `etengine` and `etmodel` checkouts.
    ///
    /// When unset, the parent of the data root is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("."),
            workspace_root: None,
        }
    }
}

/// Locally started ETM services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// URL where ETEngine answers once started
    pub engine_url: String,
    /// URL where ETModel answers once started
    pub model_url: String,
    /// How long to wait for ETModel to become reachable, in seconds
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,
    /// Delay between reachability probes, in seconds
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_wait_timeout_secs() -> u64 {
    60
}

fn default_poll_interval_secs() -> u64 {
    5
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            engine_url: "http://localhost:3000".to_string(),
            model_url: "http://localhost:3001".to_string(),
            wait_timeout_secs: default_wait_timeout_secs(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

/// Web server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/ETHelper/config.toml`
/// - macOS: `~/Library/Application Support/ETHelper/config.toml`
/// - Windows: `%APPDATA%\ETHelper\config.toml`
/// - Anywhere: `$ETHELPER_CONFIG_DIR/config.toml` when the variable is set
///
/// # Validation
///
/// - `data_root` must exist and be a directory
/// - `workspace_root`, when set, must exist
/// - service URLs must be `http://` or `https://`
/// - the poll interval must be non-zero and not exceed the wait timeout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// File system paths
    pub paths: PathConfig,
    /// Local service settings
    #[serde(default)]
    pub services: ServicesConfig,
    /// Web server settings
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config rooted at the given data directory.
    #[must_use]
    pub fn with_data_root(data_root: impl Into<PathBuf>) -> Self {
        Self {
            paths: PathConfig {
                data_root: data_root.into(),
                workspace_root: None,
            },
            ..Self::default()
        }
    }

    /// Checks if the config file exists on disk.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_file_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Gets the platform-specific config directory path.
    ///
    /// `ETHELPER_CONFIG_DIR` overrides the platform location.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(CONFIG_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if !config_path.exists() {
            return Ok(Self::new());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from an explicit file.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the config file using atomic write.
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).context(format!(
            "Failed to create config directory: {}",
            config_dir.display()
        ))?;

        self.save_to(&Self::config_file_path()?)
    }

    /// Writes the configuration to `config_path` (temp file + rename).
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        let data_root = &self.paths.data_root;
        if !data_root.is_dir() {
            anyhow::bail!("Data root is not a directory: {}", data_root.display());
        }

        if let Some(workspace) = &self.paths.workspace_root {
            if !workspace.is_dir() {
                anyhow::bail!(
                    "Workspace root is not a directory: {}",
                    workspace.display()
                );
            }
        }

        for (name, url) in [
            ("engine_url", &self.services.engine_url),
            ("model_url", &self.services.model_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                anyhow::bail!("services.{name} must start with http:// or https://, got '{url}'");
            }
        }

        if self.services.poll_interval_secs == 0 {
            anyhow::bail!("services.poll_interval_secs must be greater than zero");
        }
        if self.services.poll_interval_secs > self.services.wait_timeout_secs {
            anyhow::bail!(
                "services.poll_interval_secs ({}) exceeds services.wait_timeout_secs ({})",
                self.services.poll_interval_secs,
                self.services.wait_timeout_secs
            );
        }

        Ok(())
    }

    /// Directory containing the sibling ETM repositories.
    #[must_use]
    pub fn workspace_root(&self) -> PathBuf {
        if let Some(path) = &self.paths.workspace_root {
            return path.clone();
        }

        let root = self
            .paths
            .data_root
            .canonicalize()
            .unwrap_or_else(|_| self.paths.data_root.clone());
        root.parent().map_or(root.clone(), Path::to_path_buf)
    }

    /// Directory of a sibling repository (e.g. `etengine`).
    #[must_use]
    pub fn repository_dir(&self, name: &str) -> PathBuf {
        self.workspace_root().join(name)
    }

    /// ETLocal's `db/migrate` directory.
    #[must_use]
    pub fn migrate_dir(&self) -> PathBuf {
        self.repository_dir("etlocal").join(MIGRATE_SUBDIR)
    }

    /// Directory where the generated dataset is written.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.paths.data_root.join(OUTPUT_DIR)
    }
}
