//! Calculator engine.
//!
//! [`Calculator`] owns the history log, the snapshot stacks and the observer
//! bus. A successful [`Calculator::compute`] runs
//! validate → resolve → execute → capture → append → publish; any failure
//! before capture returns early without touching state.

use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::config::{CalculatorConfig, ConfigError};
use crate::error::{CalcError, Result};
use crate::history::HistoryLog;
use crate::observer::{CalculationObserver, NotificationBus};
use crate::record::CalculationRecord;
use crate::registry::OperationRegistry;
use crate::snapshot::SnapshotManager;

/// Interactive calculator state.
#[derive(Debug)]
pub struct Calculator {
    config: CalculatorConfig,
    registry: OperationRegistry,
    history: HistoryLog,
    snapshots: SnapshotManager,
    observers: NotificationBus,
}

impl Calculator {
    /// Creates a calculator with the builtin operations and no observers.
    pub fn new(config: CalculatorConfig) -> std::result::Result<Self, ConfigError> {
        Self::with_registry(config, OperationRegistry::with_builtins())
    }

    /// Creates a calculator over a caller-supplied registry.
    pub fn with_registry(
        config: CalculatorConfig,
        registry: OperationRegistry,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            history: HistoryLog::new(config.max_history_size),
            snapshots: SnapshotManager::new(config.max_history_size),
            observers: NotificationBus::new(),
            registry,
            config,
        })
    }

    /// Executes `token` on `a` and `b` and commits the result to history.
    pub fn compute(&mut self, token: &str, a: f64, b: f64) -> Result<CalculationRecord> {
        self.validate_operand("first operand", a)?;
        self.validate_operand("second operand", b)?;
        let operation = self.registry.resolve(token)?;
        let raw = operation.execute(a, b).inspect_err(|error| {
            debug!(operator = token, error = %error, "operation rejected");
        })?;
        let result = round_to_precision(raw, self.config.precision);
        let record = CalculationRecord::new(token.trim().to_lowercase(), a, b, result);

        self.snapshots.capture_before_change(&self.history);
        self.history.append(record.clone());
        debug!(
            history_len = self.history.len(),
            undo_depth = self.snapshots.undo_depth(),
            "calculation committed"
        );
        self.observers.publish(&record, &self.history);
        Ok(record)
    }

    /// Restores the state before the last undoable action.
    pub fn undo(&mut self) -> bool {
        let done = self.snapshots.undo(&mut self.history);
        if done {
            info!(history_len = self.history.len(), "undo performed");
        } else {
            warn!("nothing to undo");
        }
        done
    }

    /// Re-applies the most recently undone action.
    pub fn redo(&mut self) -> bool {
        let done = self.snapshots.redo(&mut self.history);
        if done {
            info!(history_len = self.history.len(), "redo performed");
        } else {
            warn!("nothing to redo");
        }
        done
    }

    /// Empties history. Undoable; observers are not notified.
    pub fn clear_history(&mut self) {
        self.snapshots.capture_before_change(&self.history);
        let cleared = self.history.len();
        self.history.clear();
        info!(cleared, "history cleared");
    }

    /// Replaces history with `records` (e.g. loaded from disk). Undoable.
    pub fn load_history<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = CalculationRecord>,
    {
        self.snapshots.capture_before_change(&self.history);
        self.history.replace_all(records);
        info!(history_len = self.history.len(), "history loaded");
    }

    /// Applies a new configuration.
    ///
    /// A smaller history bound takes effect on the next append; nothing is
    /// evicted immediately.
    pub fn reconfigure(&mut self, config: CalculatorConfig) -> std::result::Result<(), ConfigError> {
        config.validate()?;
        self.history.set_max_size(config.max_history_size);
        self.snapshots.set_capacity(config.max_history_size);
        self.config = config;
        Ok(())
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// The last `count` records, oldest first.
    pub fn recent(&self, count: i64) -> Result<Vec<CalculationRecord>> {
        Ok(self.history.recent(count)?.cloned().collect())
    }

    pub fn can_undo(&self) -> bool {
        self.snapshots.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.snapshots.can_redo()
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Mutable registry access for registering extra operations.
    pub fn registry_mut(&mut self) -> &mut OperationRegistry {
        &mut self.registry
    }

    /// Adds an observer. Returns false if the instance is already registered.
    pub fn register_observer(&mut self, observer: Rc<dyn CalculationObserver>) -> bool {
        self.observers.register(observer)
    }

    /// Removes an observer by identity.
    pub fn unregister_observer(&mut self, observer: &Rc<dyn CalculationObserver>) -> bool {
        self.observers.unregister(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn validate_operand(&self, operand: &'static str, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(CalcError::Validation {
                operand,
                value,
                reason: format!("must be a finite number, got {value}"),
            });
        }
        let limit = self.config.max_input_value;
        if value.abs() > limit {
            return Err(CalcError::Validation {
                operand,
                value,
                reason: format!("exceeds maximum allowed value ({limit})"),
            });
        }
        Ok(())
    }
}

/// Rounds half away from zero to `precision` decimal places.
///
/// Values already exact at that precision (the scaled form has no
/// fractional bits left, or would overflow) are returned unchanged.
pub fn round_to_precision(value: f64, precision: u32) -> f64 {
    // 2^52: from here on every f64 is an integer.
    const INTEGRAL_THRESHOLD: f64 = 4_503_599_627_370_496.0;

    let Ok(exponent) = i32::try_from(precision) else {
        return value;
    };
    let factor = 10f64.powi(exponent);
    let scaled = value * factor;
    if !factor.is_finite() || !scaled.is_finite() || scaled.abs() >= INTEGRAL_THRESHOLD {
        return value;
    }
    let rounded = scaled.round() / factor;
    if rounded.is_finite() { rounded } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalcErrorKind;

    fn calculator(max_history: usize) -> Calculator {
        Calculator::new(CalculatorConfig::default().with_max_history_size(max_history)).unwrap()
    }

    #[test]
    fn test_round_to_precision() {
        assert_eq!(round_to_precision(1.0 / 3.0, 2), 0.33);
        assert_eq!(round_to_precision(2.675_1, 1), 2.7);
        assert_eq!(round_to_precision(-1.25, 0), -1.0);
        assert_eq!(round_to_precision(1e300, 10), 1e300);
        assert_eq!(round_to_precision(0.5, u32::MAX), 0.5);
    }

    #[test]
    fn test_round_to_precision_keeps_values_beyond_f64_digits() {
        assert_eq!(round_to_precision(0.1, 300), 0.1);
        assert_eq!(round_to_precision(123.456, 200), 123.456);
        assert_eq!(round_to_precision(0.1 + 0.2, 17), 0.1 + 0.2);
        assert_eq!(round_to_precision(-9.87654321, 40), -9.87654321);
    }

    #[test]
    fn test_compute_at_high_precision_stores_exact_sum() {
        let mut calc =
            Calculator::new(CalculatorConfig::default().with_precision(300)).unwrap();
        let record = calc.compute("add", 0.05, 0.05).unwrap();
        assert_eq!(record.result, 0.05 + 0.05);
    }

    #[test]
    fn test_compute_rounds_result() {
        let mut calc =
            Calculator::new(CalculatorConfig::default().with_precision(3)).unwrap();
        let record = calc.compute("divide", 1.0, 3.0).unwrap();
        assert_eq!(record.result, 0.333);
        assert_eq!(calc.history().last(), Some(&record));
    }

    #[test]
    fn test_validation_rejects_out_of_bounds() {
        let mut calc =
            Calculator::new(CalculatorConfig::default().with_max_input_value(100.0)).unwrap();
        let err = calc.compute("add", 101.0, 1.0).unwrap_err();
        assert_eq!(err.kind(), CalcErrorKind::Validation);
        let err = calc.compute("add", 1.0, f64::NAN).unwrap_err();
        assert_eq!(err.kind(), CalcErrorKind::Validation);
        assert!(calc.history().is_empty());
        assert!(!calc.can_undo());
    }

    #[test]
    fn test_validation_precedes_operator_lookup() {
        let mut calc = calculator(5);
        let err = calc.compute("nope", f64::INFINITY, 1.0).unwrap_err();
        assert_eq!(err.kind(), CalcErrorKind::Validation);
        let err = calc.compute("nope", 1.0, 1.0).unwrap_err();
        assert_eq!(err.kind(), CalcErrorKind::UnknownOperator);
    }

    #[test]
    fn test_record_uses_normalized_token() {
        let mut calc = calculator(5);
        let record = calc.compute(" ADD ", 1.0, 2.0).unwrap();
        assert_eq!(record.operator, "add");
    }

    #[test]
    fn test_reconfigure_rejects_invalid() {
        let mut calc = calculator(5);
        let err = calc.reconfigure(CalculatorConfig::default().with_max_history_size(0));
        assert!(err.is_err());
        assert_eq!(calc.config().max_history_size, 5);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = CalculatorConfig::default().with_max_input_value(-1.0);
        assert!(Calculator::new(config).is_err());
    }
}
