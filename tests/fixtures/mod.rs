//! Shared test fixtures for integration tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Ruby migration script as generated by ETLocal.
pub const MIGRATION_SCRIPT: &str = "class UpdateFiji < ActiveRecord::Migration[7.0]\n  def up\n    CSVImporter.run(data_path, commits_path)\n  end\nend\n";

/// Name of the migration created by [`TestWorkspace::with_migration`].
pub const MIGRATION_NAME: &str = "20240101000000_update_fiji";

/// A temporary ETM workspace holding an `ethelper` data root.
///
/// Layout:
///
/// ```text
/// <temp>/
///   ethelper/           data root
///   etlocal/db/migrate  (optional)
///   etengine/, etmodel/ (optional)
/// ```
///
/// The data root holds four keys `a,b,c,d`, a preset `fiji` with members
/// `a,b,c` where `a` is basic/supply and `b` advanced/heat, and defaults
/// `a=1.5`, `b=42`.
pub struct TestWorkspace {
    temp_dir: TempDir,
    config_dir: PathBuf,
}

impl TestWorkspace {
    /// Creates the standard data root.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let workspace = Self {
            config_dir: temp_dir.path().join("config_home"),
            temp_dir,
        };
        fs::create_dir_all(&workspace.config_dir).expect("Failed to create config dir");

        workspace.write("variables/keys.csv", "a,b,c,d\n");
        workspace.write(
            "variables/translations.csv",
            "a,b,c,d\nAlpha,Beta,Gamma,Delta\n",
        );
        workspace.write("presets/fiji.csv", "a,b,c\n");
        workspace.write("presets/tonga.csv", "c,d\n");
        workspace.write(
            "presets/categories/fiji/categories.csv",
            "a,b\nbasic,advanced\nsupply,heat\n",
        );
        workspace.write("config/defaultlist.csv", "fiji\nfiji_defaults\n");
        workspace.write("presets/defaults/fiji_defaults.csv", "a,b\n1.5,42\n");
        workspace.write("output/commits.yml", "- message: Initial dataset\n");

        workspace
    }

    /// Creates a data root without the key tables.
    pub fn without_catalog() -> Self {
        let workspace = Self::new();
        fs::remove_dir_all(workspace.data_root().join("variables"))
            .expect("Failed to remove variables");
        workspace
    }

    /// Adds an ETLocal checkout with one migration and its script.
    pub fn with_migration(self) -> Self {
        let migrate_dir = self.migrate_dir();
        fs::create_dir_all(migrate_dir.join(MIGRATION_NAME)).expect("Failed to create migration");
        fs::write(
            migrate_dir.join(format!("{MIGRATION_NAME}.rb")),
            MIGRATION_SCRIPT,
        )
        .expect("Failed to write migration script");
        self
    }

    /// Adds empty ETEngine and ETModel checkouts with an ETModel settings file.
    pub fn with_services(self) -> Self {
        fs::create_dir_all(self.root().join("etengine")).expect("Failed to create etengine");
        let settings = self.settings_file();
        fs::create_dir_all(settings.parent().unwrap()).expect("Failed to create etmodel");
        fs::write(
            &settings,
            "ete_url: http://localhost:3000\nclient_id: CHANGEME\nclient_secret: CHANGEME\n",
        )
        .expect("Failed to write settings");
        self
    }

    /// Writes `content` to `relative` inside the data root.
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.data_root().join(relative);
        fs::create_dir_all(path.parent().unwrap()).expect("Failed to create parent");
        fs::write(path, content).expect("Failed to write fixture");
    }

    /// Directory holding the data root and sibling checkouts.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The data root.
    pub fn data_root(&self) -> PathBuf {
        self.root().join("ethelper")
    }

    /// Isolated directory for `config.toml`.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// ETLocal's `db/migrate`.
    pub fn migrate_dir(&self) -> PathBuf {
        self.root().join("etlocal/db/migrate")
    }

    /// Generated dataset path.
    pub fn dataset_path(&self) -> PathBuf {
        self.data_root().join("output/data.csv")
    }

    /// ETModel's local settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.root().join("etmodel/config/settings.local.yml")
    }

    /// `ethelper <args> --data-root <data root>` with an isolated config dir.
    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = isolated_command(args, self.config_dir());
        cmd.arg("--data-root").arg(self.data_root());
        cmd
    }

    /// Runs [`Self::command`] to completion.
    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .output()
            .expect("Failed to execute ethelper")
    }
}

/// `ethelper <args>` reading and writing `config.toml` in `config_dir` only.
pub fn isolated_command(args: &[&str], config_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ethelper"));
    cmd.env("ETHELPER_CONFIG_DIR", config_dir);
    cmd.env_remove("RUST_LOG");
    cmd.args(args);
    cmd
}

/// Stdout of a finished command.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Stderr of a finished command.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Parses stdout as JSON, failing the test with stderr on error.
pub fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}). stdout: {} stderr: {}",
            stdout(output),
            stderr(output)
        )
    })
}
