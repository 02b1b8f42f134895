use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use calc_cli::repl::{Repl, build_calculator};
use calc_cli::summary::operations_table;
use calc_core::{Calculator, CalculatorConfig, LoggingObserver, OperationRegistry};

use crate::cli::{Cli, EvalArgs};

/// Settings resolved from the environment and command-line overrides.
pub struct Settings {
    pub config: CalculatorConfig,
    pub history_file: PathBuf,
}

/// Reads `CALCULATOR_*` variables and applies flag overrides.
pub fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let mut config = CalculatorConfig::from_env().context("load configuration")?;
    if let Some(size) = cli.max_history {
        config.max_history_size = size;
    }
    if let Some(precision) = cli.precision {
        config.precision = precision;
    }
    if cli.no_auto_save {
        config.auto_save = false;
    }
    config.validate().context("validate configuration")?;
    let history_file = cli
        .history_file
        .clone()
        .unwrap_or_else(|| config.history_file());
    Ok(Settings {
        config,
        history_file,
    })
}

pub fn run_repl(settings: Settings) -> Result<()> {
    let Settings {
        config,
        history_file,
    } = settings;
    let span = info_span!(
        "session",
        history_file = %history_file.display(),
        auto_save = config.auto_save
    );
    let _guard = span.enter();
    info!(
        max_history = config.max_history_size,
        precision = config.precision,
        "starting interactive session"
    );

    let calculator = build_calculator(config, &history_file).context("build calculator")?;
    let stdin = io::stdin();
    let mut repl = Repl::new(calculator, stdin.lock(), io::stdout(), history_file);
    repl.run().context("interactive session")?;
    Ok(())
}

pub fn run_eval(settings: Settings, args: &EvalArgs) -> Result<()> {
    let mut calculator = Calculator::new(settings.config).context("build calculator")?;
    calculator.register_observer(Rc::new(LoggingObserver));
    let record = calculator
        .compute(&args.operator, args.a, args.b)
        .with_context(|| format!("{} {} {}", args.operator, args.a, args.b))?;
    println!("{}", record.result);
    Ok(())
}

pub fn run_operations() -> Result<()> {
    let registry = OperationRegistry::with_builtins();
    println!("{}", operations_table(&registry));
    Ok(())
}
