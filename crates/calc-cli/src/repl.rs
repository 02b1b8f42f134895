//! Interactive read-eval-print loop.
//!
//! The loop is generic over its input and output so it can run against a
//! terminal or an in-memory buffer. Each input line maps onto exactly one
//! [`Calculator`] call.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, warn};

use calc_core::{
    CalcError, CalcErrorKind, Calculator, CalculatorConfig, ConfigError, LoggingObserver,
    OperationRegistry,
};
use calc_persistence::{AutoSaveObserver, PersistenceError, load_records, save_records};

use crate::summary::history_table;

/// A parsed REPL line.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Calculate { token: String, a: f64, b: f64 },
    History { count: Option<i64> },
    Clear,
    Undo,
    Redo,
    Save { path: Option<PathBuf> },
    Load { path: Option<PathBuf> },
    Help,
    Exit,
}

/// Errors for lines that do not form a valid command.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unknown command '{0}'. Type 'help' for available commands.")]
    UnknownCommand(String),

    #[error("'{command}' requires exactly 2 operands. Usage: {command} <number1> <number2>")]
    OperandCount { command: String },

    #[error("invalid number '{value}'")]
    InvalidNumber { value: String },

    #[error("'{command}' takes at most one argument")]
    TooManyArguments { command: String },
}

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(
    line: &str,
    registry: &OperationRegistry,
) -> Result<Option<ReplCommand>, ParseError> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(None);
    };
    let command = head.to_lowercase();
    let args: Vec<&str> = parts.collect();

    if registry.contains(&command) {
        let [a, b] = args.as_slice() else {
            return Err(ParseError::OperandCount { command });
        };
        return Ok(Some(ReplCommand::Calculate {
            token: command,
            a: parse_number(a)?,
            b: parse_number(b)?,
        }));
    }

    let parsed = match command.as_str() {
        "history" => ReplCommand::History {
            count: optional_arg(&command, &args)?
                .map(|value| {
                    value.parse::<i64>().map_err(|_| ParseError::InvalidNumber {
                        value: value.to_string(),
                    })
                })
                .transpose()?,
        },
        "clear" => ReplCommand::Clear,
        "undo" => ReplCommand::Undo,
        "redo" => ReplCommand::Redo,
        "save" => ReplCommand::Save {
            path: optional_arg(&command, &args)?.map(PathBuf::from),
        },
        "load" => ReplCommand::Load {
            path: optional_arg(&command, &args)?.map(PathBuf::from),
        },
        "help" => ReplCommand::Help,
        "exit" | "quit" => ReplCommand::Exit,
        _ => return Err(ParseError::UnknownCommand(command)),
    };
    Ok(Some(parsed))
}

fn parse_number(value: &str) -> Result<f64, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        value: value.to_string(),
    })
}

fn optional_arg<'a>(command: &str, args: &[&'a str]) -> Result<Option<&'a str>, ParseError> {
    match args {
        [] => Ok(None),
        [value] => Ok(Some(*value)),
        _ => Err(ParseError::TooManyArguments {
            command: command.to_string(),
        }),
    }
}

/// Builds a calculator with the standard observers attached.
///
/// The logging observer is always registered; the auto-save observer only
/// when `config.auto_save` is set, targeting `history_file`.
pub fn build_calculator(
    config: CalculatorConfig,
    history_file: &Path,
) -> Result<Calculator, ConfigError> {
    let auto_save = config.auto_save;
    let mut calculator = Calculator::new(config)?;
    calculator.register_observer(Rc::new(LoggingObserver));
    if auto_save {
        calculator.register_observer(Rc::new(AutoSaveObserver::new(history_file)));
    }
    Ok(calculator)
}

/// The interactive calculator session.
pub struct Repl<R, W> {
    calculator: Calculator,
    input: R,
    output: W,
    history_file: PathBuf,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    /// Creates a session; `history_file` is the default target of `save`/`load`.
    pub fn new(calculator: Calculator, input: R, output: W, history_file: PathBuf) -> Self {
        Self {
            calculator,
            input,
            output,
            history_file,
        }
    }

    /// Reads and executes lines until `exit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "Welcome to the calculator!")?;
        writeln!(
            self.output,
            "Type 'help' for available commands or 'exit' to quit."
        )?;
        let mut line = String::new();
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                break;
            }
            if self.execute(&line)? == Flow::Exit {
                break;
            }
        }
        writeln!(self.output, "Goodbye!")?;
        Ok(())
    }

    /// Executes a single line.
    pub fn execute(&mut self, line: &str) -> io::Result<Flow> {
        let command = match parse_command(line, self.calculator.registry()) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(error) => {
                writeln!(self.output, "Error: {error}")?;
                return Ok(Flow::Continue);
            }
        };
        debug!(?command, "executing command");

        match command {
            ReplCommand::Calculate { token, a, b } => self.calculate(&token, a, b)?,
            ReplCommand::History { count } => self.show_history(count)?,
            ReplCommand::Clear => {
                self.calculator.clear_history();
                writeln!(self.output, "History cleared.")?;
            }
            ReplCommand::Undo => {
                let message = if self.calculator.undo() {
                    "Undo successful."
                } else {
                    "Nothing to undo."
                };
                writeln!(self.output, "{message}")?;
            }
            ReplCommand::Redo => {
                let message = if self.calculator.redo() {
                    "Redo successful."
                } else {
                    "Nothing to redo."
                };
                writeln!(self.output, "{message}")?;
            }
            ReplCommand::Save { path } => {
                let path = path.unwrap_or_else(|| self.history_file.clone());
                self.save(&path)?;
            }
            ReplCommand::Load { path } => {
                let path = path.unwrap_or_else(|| self.history_file.clone());
                self.load(&path)?;
            }
            ReplCommand::Help => self.show_help()?,
            ReplCommand::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Consumes the session, returning the calculator and output sink.
    pub fn into_parts(self) -> (Calculator, W) {
        (self.calculator, self.output)
    }

    fn calculate(&mut self, token: &str, a: f64, b: f64) -> io::Result<()> {
        match self.calculator.compute(token, a, b) {
            Ok(record) => writeln!(self.output, "Result: {}", record.result),
            Err(error) => {
                warn!(operator = token, error = %error, "calculation failed");
                writeln!(self.output, "{}: {error}", error_label(&error))
            }
        }
    }

    fn show_history(&mut self, count: Option<i64>) -> io::Result<()> {
        let total = self.calculator.history().len();
        let records = match count {
            Some(count) => match self.calculator.recent(count) {
                Ok(records) => records,
                Err(error) => return writeln!(self.output, "Error: {error}"),
            },
            None => self.calculator.history().records(),
        };
        if records.is_empty() {
            return writeln!(self.output, "History is empty.");
        }
        let offset = total - records.len() + 1;
        let table = history_table(&records, offset, self.calculator.registry());
        writeln!(self.output, "{table}")
    }

    fn save(&mut self, path: &Path) -> io::Result<()> {
        match save_records(self.calculator.history(), path) {
            Ok(count) => writeln!(
                self.output,
                "History saved to {} ({count} records).",
                path.display()
            ),
            Err(error) => self.report_persistence_error(&error),
        }
    }

    fn load(&mut self, path: &Path) -> io::Result<()> {
        match load_records(path) {
            Ok(records) => {
                self.calculator.load_history(records);
                writeln!(
                    self.output,
                    "History loaded from {} ({} records).",
                    path.display(),
                    self.calculator.history().len()
                )
            }
            Err(error) => self.report_persistence_error(&error),
        }
    }

    fn report_persistence_error(&mut self, error: &PersistenceError) -> io::Result<()> {
        warn!(error = %error, "history file operation failed");
        writeln!(self.output, "Error: {}", error.user_message())?;
        if let Some(hint) = error.suggestion() {
            writeln!(self.output, "Hint: {hint}")?;
        }
        Ok(())
    }

    fn show_help(&mut self) -> io::Result<()> {
        writeln!(self.output, "Arithmetic operations:")?;
        for (token, operation) in self.calculator.registry().iter() {
            let usage = format!("{token} <a> <b>");
            writeln!(self.output, "  {usage:<22}{}", operation.description())?;
        }
        writeln!(self.output)?;
        writeln!(self.output, "History commands:")?;
        for (usage, description) in [
            ("history [n]", "Show all (or the last n) calculations"),
            ("clear", "Clear calculation history"),
            ("undo", "Undo the last change to history"),
            ("redo", "Redo the last undone change"),
            ("save [file]", "Save history to CSV"),
            ("load [file]", "Load history from CSV"),
            ("help", "Show this message"),
            ("exit", "Exit the calculator"),
        ] {
            writeln!(self.output, "  {usage:<22}{description}")?;
        }
        writeln!(
            self.output,
            "Default history file: {}",
            self.history_file.display()
        )
    }
}

fn error_label(error: &CalcError) -> &'static str {
    match error.kind() {
        CalcErrorKind::Validation => "Validation error",
        CalcErrorKind::UnknownOperator => "Error",
        CalcErrorKind::Domain => "Operation error",
        CalcErrorKind::InvalidArgument => "Invalid argument",
    }
}
