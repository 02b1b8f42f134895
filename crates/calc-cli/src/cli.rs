//! CLI argument definitions for the calculator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "calculator",
    version,
    about = "Interactive calculator with history, undo/redo and auto-save",
    long_about = "Interactive arithmetic calculator.\n\n\
                  Keeps a bounded calculation history with undo/redo and can\n\
                  persist it to CSV. Settings are read from CALCULATOR_* environment\n\
                  variables (or a .env file) and may be overridden by flags."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr (default: <LOG_DIR>/calculator.log).
    #[arg(long = "log-file", value_name = "PATH", num_args = 0..=1, global = true)]
    pub log_file: Option<Option<PathBuf>>,

    /// Prefix log events with timestamps.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Include the emitting module path in log events.
    #[arg(long = "log-target", global = true)]
    pub log_target: bool,

    /// History CSV used by auto-save and by `save`/`load` without a path.
    #[arg(long = "history-file", value_name = "PATH", global = true)]
    pub history_file: Option<PathBuf>,

    /// Maximum number of calculations kept in history.
    #[arg(long = "max-history", value_name = "N", global = true)]
    pub max_history: Option<usize>,

    /// Decimal places results are rounded to.
    #[arg(long = "precision", value_name = "DIGITS", global = true)]
    pub precision: Option<u32>,

    /// Disable saving history after every calculation.
    #[arg(long = "no-auto-save", global = true)]
    pub no_auto_save: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the interactive calculator (default).
    Repl,

    /// Compute a single operation and print the result.
    Eval(EvalArgs),

    /// List all available operations.
    Operations,
}

#[derive(Parser)]
pub struct EvalArgs {
    /// Operator token (e.g. add, int_divide).
    #[arg(value_name = "OPERATOR")]
    pub operator: String,

    /// First operand.
    #[arg(value_name = "A", allow_negative_numbers = true)]
    pub a: f64,

    /// Second operand.
    #[arg(value_name = "B", allow_negative_numbers = true)]
    pub b: f64,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
