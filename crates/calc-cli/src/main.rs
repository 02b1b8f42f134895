//! Interactive calculator CLI.

use calc_cli::logging::{LogConfig, LogFormat, init_logging};
use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{Settings, resolve_settings, run_eval, run_operations, run_repl};

fn main() {
    // A missing .env file is not an error.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    cli.color.write_global();
    let settings = match resolve_settings(&cli) {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(2);
        }
    };
    let log_config = log_config_from_cli(&cli, &settings);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let outcome = match &cli.command {
        None | Some(Command::Repl) => run_repl(settings),
        Some(Command::Eval(args)) => run_eval(settings, args),
        Some(Command::Operations) => run_operations(),
    };
    if let Err(error) = outcome {
        tracing::error!(error = %format!("{error:#}"), "command failed");
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli, settings: &Settings) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.with_timestamps = cli.log_timestamps;
    config.with_target = cli.log_target;
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli
        .log_file
        .clone()
        .map(|path| path.unwrap_or_else(|| settings.config.log_file()));
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => config.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_core::CalculatorConfig;
    use std::path::PathBuf;

    fn settings() -> Settings {
        let config = CalculatorConfig::default().with_log_dir("var/logs");
        Settings {
            history_file: config.history_file(),
            config,
        }
    }

    fn log_config(args: &[&str]) -> LogConfig {
        let cli = Cli::try_parse_from(std::iter::once("calculator").chain(args.iter().copied()))
            .unwrap();
        log_config_from_cli(&cli, &settings())
    }

    #[test]
    fn test_defaults_leave_optional_fields_off() {
        let config = log_config(&["--color", "never"]);
        assert_eq!(config.level_filter, LevelFilter::WARN);
        assert!(config.use_env_filter);
        assert!(!config.with_timestamps);
        assert!(!config.with_target);
        assert!(!config.with_ansi);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_log_flags_reach_config() {
        let config = log_config(&[
            "--log-timestamps",
            "--log-target",
            "--log-format",
            "json",
            "--log-level",
            "debug",
            "eval",
            "add",
            "1",
            "-2",
        ]);
        assert!(config.with_timestamps);
        assert!(config.with_target);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level_filter, LevelFilter::DEBUG);
        assert!(!config.use_env_filter);
    }

    #[test]
    fn test_bare_log_file_uses_configured_directory() {
        let config = log_config(&["--log-file"]);
        assert_eq!(config.log_file, Some(PathBuf::from("var/logs/calculator.log")));

        let config = log_config(&["--log-file", "custom.log", "-v"]);
        assert_eq!(config.log_file, Some(PathBuf::from("custom.log")));
        assert_eq!(config.level_filter, LevelFilter::INFO);
    }
}
