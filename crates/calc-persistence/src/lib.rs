//! Persistent storage for calculator history.
//!
//! # Features
//!
//! - **CSV format** readable by spreadsheets and scripts
//! - **Atomic writes** to prevent data corruption
//! - **Auto-save** observer that persists history after every calculation
//!
//! # File Format
//!
//! ```text
//! operand_a,operand_b,operator,result,timestamp
//! 5.0,3.0,add,8.0,2024-05-01T12:30:00Z
//! ```
//!
//! # Example
//!
//! ```ignore
//! use calc_persistence::{load_records, save_records};
//!
//! save_records(calc.history(), Path::new("history.csv"))?;
//! let records = load_records(Path::new("history.csv"))?;
//! calc.load_history(records);
//! ```

mod autosave;
mod error;
mod io;

pub use autosave::AutoSaveObserver;
pub use error::{PersistenceError, Result};
pub use io::{HISTORY_COLUMNS, load_records, save_records};
