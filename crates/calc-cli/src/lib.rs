//! CLI library components for the calculator.

pub mod logging;
pub mod repl;
pub mod summary;
