//! Key visibility and completion resolution.
//!
//! Every catalog key is classified exactly once against the active preset:
//! visible as basic, visible as advanced, visible without a category, or not
//! in the preset. Completion counters are folded in the same pass. The
//! resolution is a pure function of the catalog, the preset and a snapshot
//! of the session values.

use serde::Serialize;
use std::collections::HashMap;

use crate::models::{KeyCatalog, Level, Preset, Typology};

/// How a key is presented for the active preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Member with a basic category entry
    Basic,
    /// Member with an advanced category entry
    Advanced,
    /// Member without a category entry
    Uncategorized,
    /// Not a member of the preset
    NotInPreset,
}

/// Resolved state of one catalog key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyState {
    /// Key identifier
    pub key: String,
    /// Human-readable label
    pub translation: String,
    /// Classification for the active preset
    pub visibility: Visibility,
    /// Section of a categorized key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typology: Option<Typology>,
    /// Current session value
    pub value: String,
}

impl KeyState {
    /// A key is completed when its value is non-empty.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        !self.value.is_empty()
    }

    /// Level of a categorized key.
    #[must_use]
    pub fn level(&self) -> Option<Level> {
        match self.visibility {
            Visibility::Basic => Some(Level::Basic),
            Visibility::Advanced => Some(Level::Advanced),
            Visibility::Uncategorized | Visibility::NotInPreset => None,
        }
    }
}

/// Completed / total counter with an integer percentage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Completion {
    /// Keys with a non-empty value
    pub completed: usize,
    /// Keys counted
    pub total: usize,
    /// `completed / total`, rounded down; 0 when `total` is 0
    pub percent: u8,
}

impl Completion {
    /// Builds a counter, guarding the division.
    #[must_use]
    pub fn new(completed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            0
        } else {
            u8::try_from(completed.min(total) * 100 / total).unwrap_or(100)
        };
        Self {
            completed,
            total,
            percent,
        }
    }
}

/// The classification of every catalog key plus completion counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Key states in catalog order
    pub keys: Vec<KeyState>,
    /// All preset members present in the catalog
    pub overall: Completion,
    /// Basic members only
    pub basic: Completion,
    /// Advanced members only
    pub advanced: Completion,
}

impl Resolution {
    /// Keys of the catalog that are not in the preset.
    pub fn keys_not_in_preset(&self) -> impl Iterator<Item = &KeyState> {
        self.keys
            .iter()
            .filter(|k| k.visibility == Visibility::NotInPreset)
    }
}

/// Classifies every catalog key against `preset` and counts completion.
///
/// Keys missing from `values` are treated as empty.
#[must_use]
pub fn resolve(
    catalog: &KeyCatalog,
    preset: &Preset,
    values: &HashMap<String, String>,
) -> Resolution {
    let mut keys = Vec::with_capacity(catalog.len());
    let (mut total, mut completed) = (0, 0);
    let (mut basic_total, mut basic_completed) = (0, 0);
    let (mut advanced_total, mut advanced_completed) = (0, 0);

    for entry in catalog.entries() {
        let value = values.get(&entry.key).cloned().unwrap_or_default();
        let is_completed = !value.is_empty();

        let (visibility, typology) = if preset.contains(&entry.key) {
            total += 1;
            completed += usize::from(is_completed);

            match preset.categories.get(&entry.key) {
                Some(category) if category.level == Level::Basic => {
                    basic_total += 1;
                    basic_completed += usize::from(is_completed);
                    (Visibility::Basic, Some(category.typology))
                }
                Some(category) => {
                    advanced_total += 1;
                    advanced_completed += usize::from(is_completed);
                    (Visibility::Advanced, Some(category.typology))
                }
                None => (Visibility::Uncategorized, None),
            }
        } else {
            (Visibility::NotInPreset, None)
        };

        keys.push(KeyState {
            key: entry.key.clone(),
            translation: entry.translation.clone(),
            visibility,
            typology,
            value,
        });
    }

    Resolution {
        keys,
        overall: Completion::new(completed, total),
        basic: Completion::new(basic_completed, basic_total),
        advanced: Completion::new(advanced_completed, advanced_total),
    }
}

/// Display-side narrowing of the form. Never affects the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormFilter {
    /// Only show sections of this level
    pub level: Option<Level>,
    /// Only show sections of this typology
    pub typology: Option<Typology>,
}

impl FormFilter {
    fn admits(self, level: Level, typology: Typology) -> bool {
        self.level.is_none_or(|l| l == level) && self.typology.is_none_or(|t| t == typology)
    }
}

/// One input field of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    /// Key identifier
    pub key: String,
    /// Label, rendered as "Enter value for <translation> (<key>)"
    pub translation: String,
    /// Current value
    pub value: String,
    /// Whether the value is non-empty
    pub completed: bool,
}

impl From<&KeyState> for FormField {
    fn from(state: &KeyState) -> Self {
        Self {
            key: state.key.clone(),
            translation: state.translation.clone(),
            value: state.value.clone(),
            completed: state.is_completed(),
        }
    }
}

/// A titled group of fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSection {
    /// Section title (typology name, or "Uncategorized")
    pub title: String,
    /// Level of the section; `None` for uncategorized keys
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    /// Typology of the section; `None` for uncategorized keys
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typology: Option<Typology>,
    /// Fields in catalog order
    pub fields: Vec<FormField>,
}

/// Per-key diagnostics shown in debug mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    /// 1-based catalog position
    pub index: usize,
    /// 1-based position among shown fields, if shown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_index: Option<usize>,
    /// Key identifier
    pub key: String,
    /// Level, if categorized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    /// Typology, if categorized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typology: Option<Typology>,
    /// Whether the field is rendered
    pub shown: bool,
    /// Whether a value is present
    pub value_present: bool,
    /// Stored value
    pub value: String,
}

/// Everything the data-entry form renders for one preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    /// Active preset
    pub preset: String,
    /// Basic typology sections, then advanced typology sections, then
    /// uncategorized keys. Empty sections are omitted.
    pub sections: Vec<FormSection>,
    /// Completion over all preset members
    pub overall: Completion,
    /// Completion over basic members
    pub basic: Completion,
    /// Completion over advanced members
    pub advanced: Completion,
    /// Catalog keys outside the preset
    pub keys_not_in_preset: Vec<String>,
    /// Preset keys hidden by the active filter
    pub filtered_out: Vec<String>,
    /// Per-key diagnostics (debug mode only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<TraceEntry>,
}

impl FormView {
    /// Groups a resolution into form sections.
    #[must_use]
    pub fn build(preset: &str, resolution: &Resolution, filter: FormFilter, debug: bool) -> Self {
        let mut sections = Vec::new();

        for level in Level::ALL {
            for typology in Typology::ALL {
                if !filter.admits(level, typology) {
                    continue;
                }
                let fields: Vec<FormField> = resolution
                    .keys
                    .iter()
                    .filter(|k| k.level() == Some(level) && k.typology == Some(typology))
                    .map(FormField::from)
                    .collect();
                if !fields.is_empty() {
                    sections.push(FormSection {
                        title: typology.display_name().to_string(),
                        level: Some(level),
                        typology: Some(typology),
                        fields,
                    });
                }
            }
        }

        let uncategorized: Vec<FormField> = resolution
            .keys
            .iter()
            .filter(|k| k.visibility == Visibility::Uncategorized)
            .map(FormField::from)
            .collect();
        if !uncategorized.is_empty() {
            sections.push(FormSection {
                title: "Uncategorized".to_string(),
                level: None,
                typology: None,
                fields: uncategorized,
            });
        }

        let filtered_out = resolution
            .keys
            .iter()
            .filter(|k| match (k.level(), k.typology) {
                (Some(level), Some(typology)) => !filter.admits(level, typology),
                _ => false,
            })
            .map(|k| k.key.clone())
            .collect::<Vec<_>>();

        let trace = if debug {
            let mut visible_index = 0;
            resolution
                .keys
                .iter()
                .enumerate()
                .map(|(idx, k)| {
                    let shown = match (k.visibility, k.level(), k.typology) {
                        (Visibility::Uncategorized, _, _) => true,
                        (_, Some(level), Some(typology)) => filter.admits(level, typology),
                        _ => false,
                    };
                    let visible = shown.then(|| {
                        visible_index += 1;
                        visible_index
                    });
                    TraceEntry {
                        index: idx + 1,
                        visible_index: visible,
                        key: k.key.clone(),
                        level: k.level(),
                        typology: k.typology,
                        shown,
                        value_present: k.is_completed(),
                        value: k.value.clone(),
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            preset: preset.to_string(),
            sections,
            overall: resolution.overall,
            basic: resolution.basic,
            advanced: resolution.advanced,
            keys_not_in_preset: resolution
                .keys_not_in_preset()
                .map(|k| k.key.clone())
                .collect(),
            filtered_out,
            trace,
        }
    }
}
