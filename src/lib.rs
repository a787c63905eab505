//! ETHelper Library
//!
//! This library provides the core functionality of ETHelper: loading the
//! CSV tables of a data root, resolving key visibility and completion for a
//! preset, writing the single-row dataset and exporting it into an ETLocal
//! migration, and bringing up local ETEngine/ETModel services.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod doctor;
pub mod environment;
pub mod models;
pub mod parser;
pub mod services;
#[cfg(feature = "web")]
pub mod web;
