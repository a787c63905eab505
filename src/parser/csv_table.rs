//! Headerless, position-indexed CSV tables.
//!
//! Every input table of a data root is a small CSV file without a header
//! row. Rows are addressed by index (row 0 = keys, row 1 = translations,
//! levels or values) and cells are joined across files by column position.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// A headerless CSV table held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates a table from rows.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Returns a copy of row `index`, or an empty row if it doesn't exist.
    ///
    /// Empty cells are kept so positions stay aligned with other tables.
    #[must_use]
    pub fn row(&self, index: usize) -> Vec<String> {
        self.rows.get(index).cloned().unwrap_or_default()
    }

    /// Returns the non-empty cells of row `index`.
    #[must_use]
    pub fn row_values(&self, index: usize) -> Vec<String> {
        self.rows
            .get(index)
            .map(|row| row.iter().filter(|c| !c.is_empty()).cloned().collect())
            .unwrap_or_default()
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Whether the table has no cells at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width() == 0
    }

    /// Zips row `keys` with row `values` into pairs, skipping empty keys.
    ///
    /// Missing value cells become empty strings.
    #[must_use]
    pub fn pairs(&self, keys: usize, values: usize) -> Vec<(String, String)> {
        let values = self.row(values);
        self.row(keys)
            .into_iter()
            .enumerate()
            .filter(|(_, key)| !key.is_empty())
            .map(|(idx, key)| (key, values.get(idx).cloned().unwrap_or_default()))
            .collect()
    }
}

/// Parses a headerless CSV table from any reader.
///
/// Rows may have different lengths; surrounding whitespace is trimmed from
/// every cell.
pub fn parse_table<R: Read>(reader: R) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (idx, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("Malformed CSV record at row {idx}"))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table { rows })
}

/// Reads a headerless CSV table from disk.
///
/// Returns `Ok(None)` when the file does not exist, so callers can fall back
/// to an empty table and report a warning.
pub fn read_table(path: &Path) -> Result<Option<Table>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to open {}", path.display()));
        }
    };

    parse_table(file)
        .with_context(|| format!("Failed to parse {}", path.display()))
        .map(Some)
}
