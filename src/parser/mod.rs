//! Parsing and serialization of the CSV files a data root is made of.
//!
//! Input tables are headerless and position-indexed; the generated dataset
//! is a regular CSV with a header row of keys and a single value row.

pub mod csv_table;
pub mod dataset;

// Re-export commonly used functions
pub use csv_table::{parse_table, read_table, Table};
pub use dataset::{parse_dataset, write_dataset};
