//! Per-session value table behind the data-entry form.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::{KeyCatalog, Level, Preset};

/// Build status shown on the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetStatus {
    /// No dataset generated yet in this session
    InBuild,
    /// A dataset was written to the output directory
    Generated,
}

impl DatasetStatus {
    /// Banner text for the status.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::InBuild => "DATASET IN BUILD",
            Self::Generated => "DATASET GENERATED",
        }
    }
}

/// Which preset keys a populate action fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulateAction {
    /// Empty preset keys become "0"
    Zeros,
    /// Empty preset keys of a level receive their default value
    Defaults(Level),
}

/// Key → value mapping accumulated through form input.
///
/// Every key of the catalog has an entry (possibly empty). Values are held
/// in memory until a dataset is generated.
#[derive(Debug, Clone, Default)]
pub struct FormSession {
    order: Vec<String>,
    values: HashMap<String, String>,
    status: Option<DatasetStatus>,
}

impl FormSession {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session with an empty value for every catalog key.
    #[must_use]
    pub fn from_catalog(catalog: &KeyCatalog) -> Self {
        let mut session = Self::new();
        session.init(catalog);
        session
    }

    /// Gives every catalog key an empty value unless it already has one.
    ///
    /// Column order follows the catalog.
    pub fn init(&mut self, catalog: &KeyCatalog) {
        let mut order = Vec::with_capacity(catalog.len());
        for key in catalog.keys() {
            self.values.entry(key.to_string()).or_default();
            order.push(key.to_string());
        }
        self.order = order;
    }

    /// Forces empty values of keys outside `preset` to "0".
    ///
    /// Returns the number of values changed.
    pub fn apply_preset(&mut self, preset: &Preset) -> usize {
        let mut changed = 0;
        for key in &self.order {
            if preset.contains(key) {
                continue;
            }
            if let Some(value) = self.values.get_mut(key) {
                if value.is_empty() {
                    *value = "0".to_string();
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Fills empty preset values according to `action`.
    ///
    /// Returns the number of values changed.
    pub fn populate(&mut self, preset: &Preset, action: PopulateAction) -> usize {
        match action {
            PopulateAction::Zeros => self.populate_zeros(preset),
            PopulateAction::Defaults(level) => self.populate_defaults(preset, level),
        }
    }

    /// Sets every empty preset value to "0".
    pub fn populate_zeros(&mut self, preset: &Preset) -> usize {
        let mut changed = 0;
        for key in &preset.keys {
            if let Some(value) = self.values.get_mut(key) {
                if value.is_empty() {
                    *value = "0".to_string();
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Copies defaults into empty values of preset keys categorized at `level`.
    ///
    /// Keys without a default stay empty.
    pub fn populate_defaults(&mut self, preset: &Preset, level: Level) -> usize {
        let mut changed = 0;
        for key in &preset.keys {
            if preset.categories.level_of(key) != Some(level) {
                continue;
            }
            let Some(value) = self.values.get_mut(key) else {
                continue;
            };
            if !value.is_empty() {
                continue;
            }
            if let Some(default) = preset.default_for(key).filter(|d| !d.is_empty()) {
                *value = default.to_string();
                changed += 1;
            }
        }
        changed
    }

    /// Stores a value for a catalog key.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        match self.values.get_mut(key) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => anyhow::bail!("Unknown key '{key}'"),
        }
    }

    /// Current value of a key ("" for unknown keys).
    #[must_use]
    pub fn value(&self, key: &str) -> &str {
        self.values.get(key).map_or("", String::as_str)
    }

    /// Snapshot of all values.
    #[must_use]
    pub fn values(&self) -> &HashMap<String, String> {
        &self.values
    }

    /// `(key, value)` columns in catalog order.
    #[must_use]
    pub fn columns(&self) -> Vec<(&str, &str)> {
        self.order
            .iter()
            .map(|key| (key.as_str(), self.value(key)))
            .collect()
    }

    /// Number of keys held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the session holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Records that a dataset was generated.
    pub fn mark_generated(&mut self) {
        self.status = Some(DatasetStatus::Generated);
    }

    /// Current build status.
    #[must_use]
    pub fn status(&self) -> DatasetStatus {
        self.status.unwrap_or(DatasetStatus::InBuild)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CategoryTable, DefaultValues, Typology};

    fn catalog() -> KeyCatalog {
        let keys: Vec<String> = ["a", "b", "c", "d"].iter().map(|k| (*k).to_string()).collect();
        KeyCatalog::from_columns(keys.clone(), keys)
    }

    fn preset() -> Preset {
        let mut categories = CategoryTable::new();
        categories.insert(
            "a",
            Category {
                level: Level::Basic,
                typology: Typology::General,
            },
        );
        categories.insert(
            "b",
            Category {
                level: Level::Advanced,
                typology: Typology::Heat,
            },
        );
        let mut defaults = DefaultValues::new();
        defaults.insert("a".to_string(), "1.5".to_string());
        defaults.insert("b".to_string(), "7".to_string());

        Preset::new("fiji", vec!["a".to_string(), "b".to_string(), "c".to_string()])
            .with_categories(categories)
            .with_defaults(defaults)
    }

    #[test]
    fn test_init_keeps_existing_values() {
        let mut session = FormSession::from_catalog(&catalog());
        session.set_value("a", "5").unwrap();
        session.init(&catalog());

        assert_eq!(session.value("a"), "5");
        assert_eq!(session.value("b"), "");
        assert_eq!(session.len(), 4);
    }

    #[test]
    fn test_apply_preset_zeroes_non_members() {
        let mut session = FormSession::from_catalog(&catalog());
        assert_eq!(session.apply_preset(&preset()), 1);
        assert_eq!(session.value("d"), "0");
        assert_eq!(session.value("c"), "");

        // Applying again is a no-op
        assert_eq!(session.apply_preset(&preset()), 0);
    }

    #[test]
    fn test_apply_preset_keeps_user_values() {
        let mut session = FormSession::from_catalog(&catalog());
        session.set_value("d", "12").unwrap();
        session.apply_preset(&preset());
        assert_eq!(session.value("d"), "12");
    }

    #[test]
    fn test_populate_zeros_only_fills_empty() {
        let mut session = FormSession::from_catalog(&catalog());
        session.set_value("a", "3").unwrap();

        assert_eq!(session.populate(&preset(), PopulateAction::Zeros), 2);
        assert_eq!(session.value("a"), "3");
        assert_eq!(session.value("b"), "0");
        assert_eq!(session.value("c"), "0");
        assert_eq!(session.value("d"), "");
    }

    #[test]
    fn test_populate_defaults_by_level() {
        let mut session = FormSession::from_catalog(&catalog());

        assert_eq!(session.populate_defaults(&preset(), Level::Basic), 1);
        assert_eq!(session.value("a"), "1.5");
        assert_eq!(session.value("b"), "");

        assert_eq!(session.populate_defaults(&preset(), Level::Advanced), 1);
        assert_eq!(session.value("b"), "7");
        // Uncategorized keys are never defaulted
        assert_eq!(session.value("c"), "");
    }

    #[test]
    fn test_set_value_rejects_unknown_key() {
        let mut session = FormSession::from_catalog(&catalog());
        let err = session.set_value("zzz", "1").unwrap_err();
        assert!(err.to_string().contains("Unknown key 'zzz'"));
    }

    #[test]
    fn test_columns_follow_catalog_order() {
        let mut session = FormSession::from_catalog(&catalog());
        session.set_value("c", "x").unwrap();
        assert_eq!(
            session.columns(),
            vec![("a", ""), ("b", ""), ("c", "x"), ("d", "")]
        );
    }

    #[test]
    fn test_status() {
        let mut session = FormSession::new();
        assert_eq!(session.status(), DatasetStatus::InBuild);
        assert_eq!(session.status().label(), "DATASET IN BUILD");
        session.mark_generated();
        assert_eq!(session.status().label(), "DATASET GENERATED");
    }
}
