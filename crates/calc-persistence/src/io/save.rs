//! History saving operations.

use std::fs::{self, File};
use std::path::Path;

use calc_core::CalculationRecord;

use crate::error::{PersistenceError, Result};

/// CSV header written before any record.
pub const HISTORY_COLUMNS: [&str; 5] = ["operand_a", "operand_b", "operator", "result", "timestamp"];

/// Save records to a CSV file and return how many were written.
///
/// Uses atomic write (temp file + rename) so an interrupted save never
/// leaves a truncated history behind. An empty input produces a
/// header-only file.
pub fn save_records<'a, I>(records: I, path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = &'a CalculationRecord>,
{
    let temp_path = path.with_extension("csv.tmp");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PersistenceError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let written = write_and_replace(records, &temp_path, path).inspect_err(|_| {
        // Cleanup failure is not reported.
        let _ = fs::remove_file(&temp_path);
    })?;

    tracing::info!(path = %path.display(), records = written, "history saved");
    Ok(written)
}

/// Writes `records` to `temp_path`, syncs it, and renames it over `path`.
fn write_and_replace<'a, I>(records: I, temp_path: &Path, path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = &'a CalculationRecord>,
{
    let file = File::create(temp_path).map_err(|e| PersistenceError::Io {
        operation: "create",
        path: temp_path.to_path_buf(),
        source: e,
    })?;

    let csv_error = |source: csv::Error| PersistenceError::Csv {
        path: temp_path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(HISTORY_COLUMNS).map_err(csv_error)?;
    let mut written = 0;
    for record in records {
        writer.serialize(record).map_err(csv_error)?;
        written += 1;
    }

    let file = writer.into_inner().map_err(|e| PersistenceError::Io {
        operation: "write",
        path: temp_path.to_path_buf(),
        source: e.into_error(),
    })?;

    file.sync_all().map_err(|e| PersistenceError::Io {
        operation: "sync",
        path: temp_path.to_path_buf(),
        source: e,
    })?;

    fs::rename(temp_path, path).map_err(|e| PersistenceError::AtomicWriteFailed {
        temp_path: temp_path.to_path_buf(),
        target_path: path.to_path_buf(),
        source: e,
    })?;
    Ok(written)
}
