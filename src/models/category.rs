//! Level and typology classification of dataset keys.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Depth of a key within a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Shown in the typology sections of the form
    Basic,
    /// Shown inside the "Advanced" section of the form
    Advanced,
}

impl Level {
    /// Both levels in display order.
    pub const ALL: [Self; 2] = [Self::Basic, Self::Advanced];

    /// Human-readable name (e.g. "Basic").
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Advanced => "Advanced",
        }
    }

    /// Parses a cell from a categories table.
    ///
    /// The cell is capitalized first, so "basic", "BASIC" and "Basic" all match.
    #[must_use]
    pub fn parse(cell: &str) -> Option<Self> {
        match capitalize(cell).as_str() {
            "Basic" => Some(Self::Basic),
            "Advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Thematic section a key is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Typology {
    /// General settings
    General,
    /// Energy supply
    Supply,
    /// Energy demand
    Demand,
    /// Emissions
    Emissions,
    /// Conversion
    Conversion,
    /// Networks
    Network,
    /// Heat
    Heat,
}

impl Typology {
    /// All typologies in the order the form renders them.
    pub const ALL: [Self; 7] = [
        Self::General,
        Self::Supply,
        Self::Demand,
        Self::Emissions,
        Self::Conversion,
        Self::Network,
        Self::Heat,
    ];

    /// Human-readable name (e.g. "Emissions").
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Supply => "Supply",
            Self::Demand => "Demand",
            Self::Emissions => "Emissions",
            Self::Conversion => "Conversion",
            Self::Network => "Network",
            Self::Heat => "Heat",
        }
    }

    /// Parses a cell from a categories table, ignoring case.
    #[must_use]
    pub fn parse(cell: &str) -> Option<Self> {
        let cell = capitalize(cell);
        Self::ALL
            .into_iter()
            .find(|typology| typology.display_name() == cell)
    }
}

impl fmt::Display for Typology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Upper-cases the first character and lower-cases the rest.
#[must_use]
pub fn capitalize(value: &str) -> String {
    let value = value.trim();
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Classification of one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Basic or advanced
    pub level: Level,
    /// Section the key belongs to
    pub typology: Typology,
}

/// Per-preset classification of keys into level × typology.
///
/// Lookups return the first entry recorded for a key; later duplicates are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTable {
    entries: HashMap<String, Category>,
}

impl CategoryTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a classification unless the key already has one.
    ///
    /// Returns `false` when the key was already classified.
    pub fn insert(&mut self, key: impl Into<String>, category: Category) -> bool {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, category);
        true
    }

    /// Returns the classification of a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Category> {
        self.entries.get(key).copied()
    }

    /// Returns the level of a key, if classified.
    #[must_use]
    pub fn level_of(&self, key: &str) -> Option<Level> {
        self.get(key).map(|c| c.level)
    }

    /// Number of classified keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key is classified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
