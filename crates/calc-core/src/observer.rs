//! Calculation observers and the bus that notifies them.
//!
//! Observers run synchronously, in registration order, after a calculation
//! has been committed. A failing observer is logged as a warning and never
//! stops delivery to the observers registered after it.

use std::rc::Rc;

use thiserror::Error;
use tracing::{info, warn};

use crate::history::HistoryLog;
use crate::record::CalculationRecord;

/// Failure reported by an observer.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ObserverError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ObserverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps an underlying error.
    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Side-effect handler invoked for every committed calculation.
///
/// `history` is a read-only view of the log after the record was appended.
pub trait CalculationObserver {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    fn on_calculation(
        &self,
        record: &CalculationRecord,
        history: &HistoryLog,
    ) -> Result<(), ObserverError>;
}

/// Ordered set of observers.
///
/// Registering the same observer instance twice is rejected; identity is the
/// `Rc` allocation, so two separately constructed observers of the same type
/// are distinct.
///
/// Only `Err` returns are isolated. A panicking observer unwinds through
/// [`publish`](Self::publish) and the caller, after the record is committed.
#[derive(Default)]
pub struct NotificationBus {
    observers: Vec<Rc<dyn CalculationObserver>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `observer`. Returns false if this instance is already registered.
    pub fn register(&mut self, observer: Rc<dyn CalculationObserver>) -> bool {
        if self.position(&observer).is_some() {
            return false;
        }
        self.observers.push(observer);
        true
    }

    /// Removes `observer` by identity. Returns false if it was not registered.
    pub fn unregister(&mut self, observer: &Rc<dyn CalculationObserver>) -> bool {
        match self.position(observer) {
            Some(index) => {
                self.observers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Delivers `record` to every observer and returns how many failed.
    pub fn publish(&self, record: &CalculationRecord, history: &HistoryLog) -> usize {
        let mut failures = 0;
        for observer in &self.observers {
            if let Err(error) = observer.on_calculation(record, history) {
                failures += 1;
                warn!(
                    observer = observer.name(),
                    error = %error,
                    "observer failed to handle calculation"
                );
            }
        }
        failures
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    fn position(&self, observer: &Rc<dyn CalculationObserver>) -> Option<usize> {
        self.observers
            .iter()
            .position(|existing| Rc::ptr_eq(existing, observer))
    }
}

impl std::fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.observers.iter().map(|o| o.name()).collect();
        f.debug_struct("NotificationBus")
            .field("observers", &names)
            .finish()
    }
}

/// Writes every calculation to the `tracing` pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

impl CalculationObserver for LoggingObserver {
    fn name(&self) -> &str {
        "logging"
    }

    fn on_calculation(
        &self,
        record: &CalculationRecord,
        history: &HistoryLog,
    ) -> Result<(), ObserverError> {
        info!(
            operator = %record.operator,
            operand_a = record.operand_a,
            operand_b = record.operand_b,
            result = record.result,
            history_len = history.len(),
            "calculation performed: {record}"
        );
        Ok(())
    }
}
