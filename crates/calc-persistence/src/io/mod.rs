//! File I/O operations.

mod load;
mod save;

pub use load::load_records;
pub use save::{HISTORY_COLUMNS, save_records};
