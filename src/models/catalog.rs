//! The ordered list of dataset keys and their translations.

use serde::Serialize;
use std::collections::HashSet;

/// One dataset key with its human-readable label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyEntry {
    /// Key identifier as written to the dataset header
    pub key: String,
    /// Translation shown next to the input field
    pub translation: String,
}

/// All dataset keys in `keys.csv` order.
///
/// The order of this catalog is the column order of every exported dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyCatalog {
    entries: Vec<KeyEntry>,
}

impl KeyCatalog {
    /// Joins keys and translations by position.
    ///
    /// Keys without a translation at the same position get an empty one.
    /// Surplus translations are dropped. Duplicate and empty keys are
    /// skipped so every key has a single column.
    #[must_use]
    pub fn from_columns(keys: Vec<String>, translations: Vec<String>) -> Self {
        let mut seen = HashSet::new();
        let mut translations = translations.into_iter();
        let mut entries = Vec::with_capacity(keys.len());

        for key in keys {
            let translation = translations.next().unwrap_or_default();
            if key.is_empty() || !seen.insert(key.clone()) {
                continue;
            }
            entries.push(KeyEntry { key, translation });
        }

        Self { entries }
    }

    /// Keys and translations in catalog order.
    #[must_use]
    pub fn entries(&self) -> &[KeyEntry] {
        &self.entries
    }

    /// Key identifiers in catalog order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Whether the catalog contains `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Translation of `key`, if the key is known.
    #[must_use]
    pub fn translation(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.translation.as_str())
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
