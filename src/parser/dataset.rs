//! Reading and writing the generated single-row dataset.

use anyhow::{Context, Result};
use std::io::{Read, Write};

/// Writes `columns` as a header row of keys followed by one row of values.
///
/// Column order is taken verbatim from `columns`.
pub fn write_dataset<W, K, V>(writer: W, columns: &[(K, V)]) -> Result<()>
where
    W: Write,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(columns.iter().map(|(key, _)| key.as_ref()))
        .context("Failed to write dataset header")?;
    wtr.write_record(columns.iter().map(|(_, value)| value.as_ref()))
        .context("Failed to write dataset values")?;

    wtr.flush().context("Failed to flush dataset")?;
    Ok(())
}

/// Parses a dataset back into `(key, value)` pairs in column order.
///
/// An empty input yields no pairs. A header without a value row yields
/// empty values; rows after the first value row are ignored.
pub fn parse_dataset<R: Read>(reader: R) -> Result<Vec<(String, String)>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .context("Failed to read dataset header")?
        .clone();

    let values = match rdr.records().next() {
        Some(record) => record.context("Failed to read dataset values")?,
        None => csv::StringRecord::new(),
    };

    Ok(headers
        .iter()
        .enumerate()
        .map(|(idx, key)| (key.to_string(), values.get(idx).unwrap_or("").to_string()))
        .collect())
}
