//! Data models for dataset keys, presets and their classification.
//!
//! This module contains the core data structures used throughout the application.
//! Models are independent of file formats, the web API and the CLI.

pub mod catalog;
pub mod category;
pub mod preset;

// Re-export all model types
pub use catalog::{KeyCatalog, KeyEntry};
pub use category::{Category, CategoryTable, Level, Typology};
pub use preset::{DefaultValues, Preset, PresetSummary};
