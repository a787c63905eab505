//! Presets: named, file-backed groups of dataset keys.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::category::CategoryTable;

/// Default values of a preset, keyed by dataset key.
pub type DefaultValues = HashMap<String, String>;

/// A preset group of keys (one per country or region).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preset {
    /// Preset name (file stem of `presets/<name>.csv`)
    pub name: String,
    /// Member keys in file order
    pub keys: Vec<String>,
    /// Level × typology classification of member keys
    pub categories: CategoryTable,
    /// Default values reached through the default list
    pub defaults: DefaultValues,
    members: HashSet<String>,
}

impl Preset {
    /// Creates a preset from its member keys.
    #[must_use]
    pub fn new(name: impl Into<String>, keys: Vec<String>) -> Self {
        let members = keys.iter().cloned().collect();
        Self {
            name: name.into(),
            keys,
            categories: CategoryTable::new(),
            defaults: DefaultValues::new(),
            members,
        }
    }

    /// Attaches a category table.
    #[must_use]
    pub fn with_categories(mut self, categories: CategoryTable) -> Self {
        self.categories = categories;
        self
    }

    /// Attaches default values.
    #[must_use]
    pub fn with_defaults(mut self, defaults: DefaultValues) -> Self {
        self.defaults = defaults;
        self
    }

    /// Whether `key` is a member of this preset.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.members.contains(key)
    }

    /// Default value for `key`, if the preset defines one.
    #[must_use]
    pub fn default_for(&self, key: &str) -> Option<&str> {
        self.defaults.get(key).map(String::as_str)
    }
}

/// Short description of a preset for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetSummary {
    /// Preset name
    pub name: String,
    /// Number of member keys
    pub key_count: usize,
    /// Whether a categories file exists
    pub has_categories: bool,
    /// Default file name from the default list, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_membership_and_defaults() {
        let mut defaults = DefaultValues::new();
        defaults.insert("a".to_string(), "1.5".to_string());

        let preset = Preset::new("fiji", vec!["a".to_string(), "b".to_string()])
            .with_defaults(defaults);

        assert!(preset.contains("a"));
        assert!(!preset.contains("c"));
        assert_eq!(preset.default_for("a"), Some("1.5"));
        assert_eq!(preset.default_for("b"), None);
    }
}
