//! Calculator engine with bounded history and undo/redo.
//!
//! This crate holds everything between the command line and persistence:
//!
//! - **Operations**: [`Operation`] trait, the [`BuiltinOperation`] set and an
//!   open [`OperationRegistry`] keyed by operator token
//! - **History**: [`HistoryLog`], a FIFO-bounded log of [`CalculationRecord`]s
//! - **Undo/redo**: [`SnapshotManager`], two stacks of full-history snapshots
//! - **Observers**: [`NotificationBus`] delivering committed records to
//!   [`CalculationObserver`]s with per-observer failure isolation
//! - **Engine**: [`Calculator`], which ties the above together
//!
//! # Example
//!
//! ```
//! use calc_core::{Calculator, CalculatorConfig};
//!
//! let mut calc = Calculator::new(CalculatorConfig::default()).unwrap();
//! let record = calc.compute("add", 5.0, 3.0).unwrap();
//! assert_eq!(record.result, 8.0);
//!
//! assert!(calc.undo());
//! assert!(calc.history().is_empty());
//! assert!(calc.redo());
//! assert_eq!(calc.history().len(), 1);
//! ```

mod calculator;
mod config;
mod error;
mod history;
mod observer;
mod operation;
mod record;
mod registry;
mod snapshot;

// === Engine ===
pub use calculator::{Calculator, round_to_precision};

// === Configuration ===
pub use config::{
    AUTO_SAVE_ENV_VAR, CalculatorConfig, ConfigError, HISTORY_DIR_ENV_VAR, LOG_DIR_ENV_VAR,
    MAX_HISTORY_SIZE_ENV_VAR, MAX_INPUT_VALUE_ENV_VAR, PRECISION_ENV_VAR,
};

// === Error Types ===
pub use error::{CalcError, CalcErrorKind, Result};

// === History and Snapshots ===
pub use history::HistoryLog;
pub use record::CalculationRecord;
pub use snapshot::{Snapshot, SnapshotManager};

// === Operations ===
pub use operation::{BuiltinOperation, FnOperation, Operation};
pub use registry::OperationRegistry;

// === Observers ===
pub use observer::{CalculationObserver, LoggingObserver, NotificationBus, ObserverError};
