//! Application-wide constants.
//!
//! This module defines constants used throughout the application, including
//! the application name and the fixed file layout of a data root.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "ETHelper";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "ethelper";

/// Directory name used below the platform config directory.
pub const CONFIG_DIR_NAME: &str = "ETHelper";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "ETHELPER_CONFIG_DIR";

/// Key list, relative to the data root (row 0 = key identifiers).
pub const KEYS_FILE: &str = "variables/keys.csv";

/// Translation table, relative to the data root (row 1 = translations).
pub const TRANSLATIONS_FILE: &str = "variables/translations.csv";

/// Directory holding one `<preset>.csv` per preset.
pub const PRESETS_DIR: &str = "presets";

/// Directory holding `<preset>/categories.csv`, relative to the data root.
pub const CATEGORIES_DIR: &str = "presets/categories";

/// Directory holding `<file>.csv` default tables, relative to the data root.
pub const DEFAULTS_DIR: &str = "presets/defaults";

/// Preset name -> default-file name table, relative to the data root.
pub const DEFAULT_LIST_FILE: &str = "config/defaultlist.csv";

/// Output directory, relative to the data root.
pub const OUTPUT_DIR: &str = "output";

/// File name of the generated dataset.
pub const DATASET_FILE_NAME: &str = "data.csv";

/// File name of the commits file copied next to the dataset.
pub const COMMITS_FILE_NAME: &str = "commits.yml";

/// Migration directory inside the ETLocal repository.
pub const MIGRATE_SUBDIR: &str = "db/migrate";

/// Line marker of the importer call inside a migration script.
pub const IMPORTER_MARKER: &str = "CSVImporter.run";

/// Importer call as generated by ETLocal.
pub const IMPORTER_CALL: &str = "CSVImporter.run(data_path, commits_path)";

/// Importer call that also creates missing datasets.
pub const IMPORTER_CALL_PATCHED: &str =
    "CSVImporter.run(data_path, commits_path, create_missing_datasets: true)";

/// Marker preceding the ETEngine admin password in setup output.
pub const ADMIN_PASSWORD_MARKER: &str = "Created admin user admin@example.org with password:";

/// Login of the ETEngine admin account created by `bin/setup`.
pub const ADMIN_USER: &str = "admin@example.org";

/// ETModel settings file receiving identity credentials, relative to its checkout.
pub const SETTINGS_LOCAL_FILE: &str = "config/settings.local.yml";
