//! Service layer for business logic.
//!
//! Loading of the data root, key resolution, the form session and the
//! dataset/migration outputs, bundled per data root by [`Workspace`].

pub mod data_store;
pub mod dataset;
pub mod migration;
pub mod resolver;
pub mod session;
pub mod workspace;

// Re-export commonly used types and functions
pub use data_store::{validate_table_name, DataStore, Loaded};
pub use dataset::{DatasetContents, GeneratedDataset, OutputDir};
pub use migration::{patch_script, validate_migration_name, MigrationReport, MigrationService};
pub use resolver::{resolve, Completion, FormFilter, FormView, Resolution, Visibility};
pub use session::{DatasetStatus, FormSession, PopulateAction};
pub use workspace::Workspace;
