//! Auto-save observer.

use std::cell::Cell;
use std::path::{Path, PathBuf};

use calc_core::{CalculationObserver, CalculationRecord, HistoryLog, ObserverError};

use crate::io::save_records;

/// Writes the full history to a CSV file after every calculation.
///
/// Failures are reported as [`ObserverError`]s, which the notification bus
/// downgrades to warnings; the in-memory history is never affected.
#[derive(Debug)]
pub struct AutoSaveObserver {
    path: PathBuf,
    saves: Cell<u64>,
}

impl AutoSaveObserver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            saves: Cell::new(0),
        }
    }

    /// Target file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> u64 {
        self.saves.get()
    }
}

impl CalculationObserver for AutoSaveObserver {
    fn name(&self) -> &str {
        "auto-save"
    }

    fn on_calculation(
        &self,
        _record: &CalculationRecord,
        history: &HistoryLog,
    ) -> Result<(), ObserverError> {
        match save_records(history, &self.path) {
            Ok(written) => {
                self.saves.set(self.saves.get() + 1);
                tracing::debug!(path = %self.path.display(), records = written, "history auto-saved");
                Ok(())
            }
            Err(error) => Err(ObserverError::with_source(
                format!("auto-save failed: {}", error.user_message()),
                error,
            )),
        }
    }
}
