//! Calculator configuration.
//!
//! Configuration is an explicit value handed to [`Calculator::new`]; nothing
//! in this crate reads the process environment on its own. Use
//! [`CalculatorConfig::from_env`] at the application edge, or
//! [`CalculatorConfig::from_lookup`] to inject values in tests.
//!
//! [`Calculator::new`]: crate::Calculator::new

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable for the history bound.
pub const MAX_HISTORY_SIZE_ENV_VAR: &str = "CALCULATOR_MAX_HISTORY_SIZE";
/// Environment variable for the operand magnitude bound.
pub const MAX_INPUT_VALUE_ENV_VAR: &str = "CALCULATOR_MAX_INPUT_VALUE";
/// Environment variable for result rounding.
pub const PRECISION_ENV_VAR: &str = "CALCULATOR_PRECISION";
/// Environment variable toggling auto-save.
pub const AUTO_SAVE_ENV_VAR: &str = "CALCULATOR_AUTO_SAVE";
/// Environment variable for the log directory.
pub const LOG_DIR_ENV_VAR: &str = "CALCULATOR_LOG_DIR";
/// Environment variable for the history directory.
pub const HISTORY_DIR_ENV_VAR: &str = "CALCULATOR_HISTORY_DIR";

const LOG_FILE_NAME: &str = "calculator.log";
const HISTORY_FILE_NAME: &str = "history.csv";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value could not be parsed into the expected type.
    #[error("{key} must be {expected}, got '{value}'")]
    Parse {
        key: &'static str,
        value: String,
        expected: &'static str,
    },

    /// A parsed value violates its constraint.
    #[error("{key} {reason}")]
    OutOfRange { key: &'static str, reason: String },

    /// A configured directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Settings consumed by the calculator engine and its collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorConfig {
    /// Maximum number of records kept in history (and undo snapshots).
    pub max_history_size: usize,
    /// Largest accepted operand magnitude.
    pub max_input_value: f64,
    /// Decimal places results are rounded to.
    pub precision: u32,
    /// Whether history is persisted after every calculation.
    pub auto_save: bool,
    /// Directory holding the log file.
    pub log_dir: PathBuf,
    /// Directory holding the history CSV.
    pub history_dir: PathBuf,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            max_history_size: 100,
            max_input_value: 1e10,
            precision: 10,
            auto_save: true,
            log_dir: PathBuf::from("logs"),
            history_dir: PathBuf::from("history"),
        }
    }
}

impl CalculatorConfig {
    /// Loads configuration from `CALCULATOR_*` environment variables.
    ///
    /// Unset variables fall back to [`CalculatorConfig::default`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(MAX_HISTORY_SIZE_ENV_VAR) {
            config.max_history_size = parse_value(MAX_HISTORY_SIZE_ENV_VAR, &value, "an integer")?;
        }
        if let Some(value) = lookup(MAX_INPUT_VALUE_ENV_VAR) {
            config.max_input_value = parse_value(MAX_INPUT_VALUE_ENV_VAR, &value, "a number")?;
        }
        if let Some(value) = lookup(PRECISION_ENV_VAR) {
            config.precision =
                parse_value(PRECISION_ENV_VAR, &value, "a non-negative integer")?;
        }
        if let Some(value) = lookup(AUTO_SAVE_ENV_VAR) {
            config.auto_save = parse_flag(AUTO_SAVE_ENV_VAR, &value)?;
        }
        if let Some(value) = lookup(LOG_DIR_ENV_VAR) {
            config.log_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup(HISTORY_DIR_ENV_VAR) {
            config.history_dir = PathBuf::from(value);
        }
        config.validate()?;
        Ok(config)
    }

    /// Sets the history bound.
    #[must_use]
    pub fn with_max_history_size(mut self, size: usize) -> Self {
        self.max_history_size = size;
        self
    }

    /// Sets the operand magnitude bound.
    #[must_use]
    pub fn with_max_input_value(mut self, value: f64) -> Self {
        self.max_input_value = value;
        self
    }

    /// Sets result precision.
    #[must_use]
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Enables or disables auto-save.
    #[must_use]
    pub fn with_auto_save(mut self, enable: bool) -> Self {
        self.auto_save = enable;
        self
    }

    /// Sets the history directory.
    #[must_use]
    pub fn with_history_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.history_dir = dir.into();
        self
    }

    /// Sets the log directory.
    #[must_use]
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    /// Checks value constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_history_size < 1 {
            return Err(ConfigError::OutOfRange {
                key: MAX_HISTORY_SIZE_ENV_VAR,
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.max_input_value.is_finite() || self.max_input_value <= 0.0 {
            return Err(ConfigError::OutOfRange {
                key: MAX_INPUT_VALUE_ENV_VAR,
                reason: format!("must be a positive number, got {}", self.max_input_value),
            });
        }
        Ok(())
    }

    /// Path of the log file inside `log_dir`.
    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(LOG_FILE_NAME)
    }

    /// Path of the default history CSV inside `history_dir`.
    pub fn history_file(&self) -> PathBuf {
        self.history_dir.join(HISTORY_FILE_NAME)
    }

    /// Creates `log_dir` and `history_dir` if they are missing.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        create_dir(&self.log_dir)?;
        create_dir(&self.history_dir)
    }
}

fn create_dir(path: &Path) -> Result<(), ConfigError> {
    std::fs::create_dir_all(path).map_err(|source| ConfigError::CreateDirectory {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_value<T: std::str::FromStr>(
    key: &'static str,
    value: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Parse {
        key,
        value: value.to_string(),
        expected,
    })
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Parse {
            key,
            value: value.to_string(),
            expected: "true or false",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = CalculatorConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, CalculatorConfig::default());
        assert_eq!(config.history_file(), PathBuf::from("history/history.csv"));
        assert_eq!(config.log_file(), PathBuf::from("logs/calculator.log"));
    }

    #[test]
    fn test_reads_all_keys() {
        let config = CalculatorConfig::from_lookup(lookup_from(&[
            (MAX_HISTORY_SIZE_ENV_VAR, "5"),
            (MAX_INPUT_VALUE_ENV_VAR, "1000"),
            (PRECISION_ENV_VAR, "2"),
            (AUTO_SAVE_ENV_VAR, "FALSE"),
            (LOG_DIR_ENV_VAR, "/tmp/calc-logs"),
            (HISTORY_DIR_ENV_VAR, "/tmp/calc-history"),
        ]))
        .unwrap();
        assert_eq!(config.max_history_size, 5);
        assert_eq!(config.max_input_value, 1000.0);
        assert_eq!(config.precision, 2);
        assert!(!config.auto_save);
        assert_eq!(config.log_dir, PathBuf::from("/tmp/calc-logs"));
        assert_eq!(config.history_dir, PathBuf::from("/tmp/calc-history"));
    }

    #[test]
    fn test_rejects_zero_history_size() {
        let err = CalculatorConfig::from_lookup(lookup_from(&[(MAX_HISTORY_SIZE_ENV_VAR, "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { key, .. } if key == MAX_HISTORY_SIZE_ENV_VAR));
    }

    #[test]
    fn test_rejects_negative_precision() {
        let err = CalculatorConfig::from_lookup(lookup_from(&[(PRECISION_ENV_VAR, "-1")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { key, .. } if key == PRECISION_ENV_VAR));
    }

    #[test]
    fn test_rejects_non_positive_max_input() {
        for value in ["0", "-5", "inf"] {
            let result =
                CalculatorConfig::from_lookup(lookup_from(&[(MAX_INPUT_VALUE_ENV_VAR, value)]));
            assert!(result.is_err(), "{value} should be rejected");
        }
    }

    #[test]
    fn test_rejects_garbage_flag() {
        let err = CalculatorConfig::from_lookup(lookup_from(&[(AUTO_SAVE_ENV_VAR, "maybe")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "CALCULATOR_AUTO_SAVE must be true or false, got 'maybe'"
        );
    }

    #[test]
    fn test_ensure_directories_creates_both() {
        let root = std::env::temp_dir().join(format!("calc-config-{}", std::process::id()));
        let config = CalculatorConfig::default()
            .with_log_dir(root.join("logs"))
            .with_history_dir(root.join("history"));
        config.ensure_directories().unwrap();
        assert!(root.join("logs").is_dir());
        assert!(root.join("history").is_dir());
        std::fs::remove_dir_all(&root).unwrap();
    }
}
