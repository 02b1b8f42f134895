//! Persistence error types.
//!
//! All persistence operations return structured errors that provide
//! user-friendly messages and optional remediation hints.

use std::path::PathBuf;
use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File I/O error.
    #[error("failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// History file does not exist.
    #[error("history file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read or write CSV content.
    #[error("invalid history CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PersistenceError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the file at {}", operation, path.display()),
            Self::FileNotFound { path } => {
                format!("No history file was found at {}", path.display())
            }
            Self::Csv { path, source } => {
                let location = source
                    .position()
                    .map(|pos| format!(" (line {})", pos.line()))
                    .unwrap_or_default();
                format!(
                    "The history file at {}{} is not a valid calculator history",
                    path.display(),
                    location
                )
            }
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not save history to {}. Please check disk space and permissions.",
                target_path.display()
            ),
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::FileNotFound { .. } => {
                Some("Run 'save' first or pass the path of an existing history file.".into())
            }
            Self::Csv { .. } => Some(
                "Expected the columns operand_a, operand_b, operator, result, timestamp.".into(),
            ),
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or try saving to a different location.".into())
            }
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
