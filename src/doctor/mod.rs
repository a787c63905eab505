//! Environment validation.
//!
//! Checks that the tools and sibling repositories ETHelper drives are in
//! place before exporting migrations or setting up local services.

pub mod checker;
pub mod formatter;

// Re-export checker types
pub use checker::{DependencyChecker, DependencyStatus, ToolStatus};
pub use formatter::{DoctorFormatter, OutputFormat};
