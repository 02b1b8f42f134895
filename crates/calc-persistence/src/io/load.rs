//! History loading operations.

use std::path::Path;

use calc_core::CalculationRecord;

use crate::error::{PersistenceError, Result};

/// Load records from a CSV file written by [`save_records`].
///
/// Columns are matched by header name, so column order in the file does not
/// matter. Surrounding whitespace in fields is ignored.
///
/// [`save_records`]: crate::save_records
pub fn load_records(path: &Path) -> Result<Vec<CalculationRecord>> {
    if !path.exists() {
        return Err(PersistenceError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let csv_error = |source: csv::Error| PersistenceError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;

    let mut records = Vec::new();
    for row in reader.deserialize::<CalculationRecord>() {
        records.push(row.map_err(csv_error)?);
    }

    tracing::info!(path = %path.display(), records = records.len(), "history loaded");
    Ok(records)
}
