//! Loading of the key catalog, presets, categories and defaults.
//!
//! All tables live below a single data root. Missing optional files are not
//! errors: the loader returns an empty table together with a warning the
//! caller can surface, and logs the same warning through `tracing`.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::{
    CATEGORIES_DIR, DEFAULTS_DIR, DEFAULT_LIST_FILE, KEYS_FILE, PRESETS_DIR, TRANSLATIONS_FILE,
};
use crate::models::{
    Category, CategoryTable, DefaultValues, KeyCatalog, Level, Preset, PresetSummary, Typology,
};
use crate::parser::{read_table, Table};

/// A loaded value plus the warnings produced while loading it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded<T> {
    /// The loaded (possibly empty) value
    pub value: T,
    /// Human-readable warnings for the caller to display
    pub warnings: Vec<String>,
}

impl<T> Loaded<T> {
    /// A value loaded without warnings.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// A fallback value with a warning explaining why it is used.
    pub fn with_warning(value: T, warning: impl Into<String>) -> Self {
        let warning = warning.into();
        warn!("{warning}");
        Self {
            value,
            warnings: vec![warning],
        }
    }

    /// Moves this value's warnings into `sink` and returns the value.
    pub fn collect_into(self, sink: &mut Vec<String>) -> T {
        sink.extend(self.warnings);
        self.value
    }
}

/// Validates a preset or default-file name to prevent path traversal.
pub fn validate_table_name(name: &str) -> Result<()> {
    if name.is_empty() {
        anyhow::bail!("Name cannot be empty");
    }
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        anyhow::bail!("Invalid name '{name}': path separators are not allowed");
    }
    if name.starts_with('.') {
        anyhow::bail!("Invalid name '{name}': hidden files are not allowed");
    }
    Ok(())
}

/// Read access to the CSV tables of a data root.
#[derive(Debug, Clone)]
pub struct DataStore {
    root: PathBuf,
}

impl DataStore {
    /// Creates a store over `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads the key catalog from `keys.csv` (row 0) and `translations.csv` (row 1).
    ///
    /// Unlike preset tables, both files are required: the form cannot be
    /// rendered without them.
    pub fn load_catalog(&self) -> Result<KeyCatalog> {
        let keys = self.required_table(KEYS_FILE)?;
        let translations = self.required_table(TRANSLATIONS_FILE)?;

        let catalog = KeyCatalog::from_columns(keys.row(0), translations.row(1));
        if catalog.is_empty() {
            anyhow::bail!(
                "{KEYS_FILE} is empty or improperly formatted. Please ensure the file has the correct format."
            );
        }

        debug!("Loaded {} keys from {}", catalog.len(), KEYS_FILE);
        Ok(catalog)
    }

    fn required_table(&self, relative: &str) -> Result<Table> {
        let table = read_table(&self.root.join(relative))?.with_context(|| {
            format!("{relative} not found. Please ensure the file is in the correct directory.")
        })?;

        if table.is_empty() {
            anyhow::bail!(
                "{relative} is empty or improperly formatted. Please ensure the file has the correct format."
            );
        }

        Ok(table)
    }

    /// Lists preset names (file stems of `presets/*.csv`), sorted.
    pub fn list_presets(&self) -> Result<Loaded<Vec<String>>> {
        let dir = self.root.join(PRESETS_DIR);
        if !dir.is_dir() {
            return Ok(Loaded::with_warning(
                Vec::new(),
                format!("The '{PRESETS_DIR}' directory was not found."),
            ));
        }

        let entries = fs::read_dir(&dir)
            .with_context(|| format!("Failed to read presets directory: {}", dir.display()))?;

        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "csv"))
            .filter_map(|path| {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().to_string())
            })
            .collect();
        names.sort();

        Ok(Loaded::ok(names))
    }

    /// Loads the member keys of a preset (row 0 of `presets/<name>.csv`).
    pub fn load_preset_keys(&self, name: &str) -> Result<Loaded<Vec<String>>> {
        validate_table_name(name)?;
        let path = self.root.join(PRESETS_DIR).join(format!("{name}.csv"));

        Ok(match read_table(&path)? {
            Some(table) => Loaded::ok(table.row_values(0)),
            None => Loaded::with_warning(
                Vec::new(),
                format!("Preset file '{name}.csv' not found in the '{PRESETS_DIR}' directory."),
            ),
        })
    }

    /// Loads the category table of a preset.
    ///
    /// Rows are keys, levels and typologies. Entries whose level or typology
    /// is not recognised are skipped with a warning, which leaves those keys
    /// uncategorized.
    pub fn load_categories(&self, name: &str) -> Result<Loaded<CategoryTable>> {
        validate_table_name(name)?;
        let path = self
            .root
            .join(CATEGORIES_DIR)
            .join(name)
            .join("categories.csv");

        let Some(table) = read_table(&path)? else {
            return Ok(Loaded::with_warning(
                CategoryTable::new(),
                format!("Category file for '{name}' not found in the '{CATEGORIES_DIR}' directory."),
            ));
        };

        let keys = table.row(0);
        let levels = table.row(1);
        let typologies = table.row(2);

        let mut categories = CategoryTable::new();
        let mut warnings = Vec::new();

        for (idx, key) in keys.into_iter().enumerate() {
            if key.is_empty() {
                continue;
            }
            let level_cell = levels.get(idx).map_or("", String::as_str);
            let typology_cell = typologies.get(idx).map_or("", String::as_str);

            match (Level::parse(level_cell), Typology::parse(typology_cell)) {
                (Some(level), Some(typology)) => {
                    categories.insert(key, Category { level, typology });
                }
                _ => {
                    let warning = format!(
                        "Key '{key}' in categories of '{name}' has unknown level '{level_cell}' or typology '{typology_cell}'"
                    );
                    warn!("{warning}");
                    warnings.push(warning);
                }
            }
        }

        Ok(Loaded {
            value: categories,
            warnings,
        })
    }

    /// Looks up the default-file name of a preset in `config/defaultlist.csv`.
    ///
    /// When a preset is listed twice, the later entry wins.
    pub fn default_file_for(&self, name: &str) -> Result<Loaded<Option<String>>> {
        let path = self.root.join(DEFAULT_LIST_FILE);

        Ok(match read_table(&path)? {
            Some(table) => Loaded::ok(
                table
                    .pairs(0, 1)
                    .into_iter()
                    .rev()
                    .find(|(preset, _)| preset == name)
                    .map(|(_, file)| file)
                    .filter(|file| !file.is_empty()),
            ),
            None => Loaded::with_warning(
                None,
                format!("defaultlist.csv not found at '{DEFAULT_LIST_FILE}'."),
            ),
        })
    }

    /// Loads a defaults table (`presets/defaults/<file>.csv`, rows: keys, values).
    ///
    /// When a key appears twice, the later value wins.
    pub fn load_defaults(&self, file: &str) -> Result<Loaded<DefaultValues>> {
        validate_table_name(file)?;
        let path = self.root.join(DEFAULTS_DIR).join(format!("{file}.csv"));

        Ok(match read_table(&path)? {
            Some(table) => Loaded::ok(table.pairs(0, 1).into_iter().collect()),
            None => Loaded::with_warning(
                DefaultValues::new(),
                format!("Default file '{file}.csv' not found in the '{DEFAULTS_DIR}' directory."),
            ),
        })
    }

    /// Resolves preset name → default-file name → default values.
    pub fn resolve_defaults(&self, name: &str) -> Result<Loaded<DefaultValues>> {
        let mut warnings = Vec::new();
        let file = self.default_file_for(name)?.collect_into(&mut warnings);

        let defaults = match file {
            Some(file) => self.load_defaults(&file)?.collect_into(&mut warnings),
            None => DefaultValues::new(),
        };

        Ok(Loaded {
            value: defaults,
            warnings,
        })
    }

    /// Loads a preset with its categories and defaults.
    pub fn load_preset(&self, name: &str) -> Result<Loaded<Preset>> {
        let mut warnings = Vec::new();

        let keys = self.load_preset_keys(name)?.collect_into(&mut warnings);
        let categories = self.load_categories(name)?.collect_into(&mut warnings);
        let defaults = self.resolve_defaults(name)?.collect_into(&mut warnings);

        Ok(Loaded {
            value: Preset::new(name, keys)
                .with_categories(categories)
                .with_defaults(defaults),
            warnings,
        })
    }

    /// Summarizes every preset for listings.
    pub fn preset_summaries(&self) -> Result<Loaded<Vec<PresetSummary>>> {
        let mut warnings = Vec::new();
        let names = self.list_presets()?.collect_into(&mut warnings);

        let mut summaries = Vec::with_capacity(names.len());
        for name in names {
            let key_count = self.load_preset_keys(&name)?.value.len();
            let has_categories = self
                .root
                .join(CATEGORIES_DIR)
                .join(&name)
                .join("categories.csv")
                .is_file();
            let default_file = self.default_file_for(&name)?.value;

            summaries.push(PresetSummary {
                name,
                key_count,
                has_categories,
                default_file,
            });
        }

        Ok(Loaded {
            value: summaries,
            warnings,
        })
    }
}
