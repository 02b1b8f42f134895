//! Calculation record.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One executed operation.
///
/// Field order matches the persisted CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub operand_a: f64,
    pub operand_b: f64,
    /// Operator token (e.g. `add`).
    pub operator: String,
    pub result: f64,
    pub timestamp: DateTime<Utc>,
}

impl CalculationRecord {
    /// Creates a record stamped with the current time.
    pub fn new(operator: impl Into<String>, operand_a: f64, operand_b: f64, result: f64) -> Self {
        Self::at(operator, operand_a, operand_b, result, Utc::now())
    }

    /// Creates a record with an explicit timestamp.
    pub fn at(
        operator: impl Into<String>,
        operand_a: f64,
        operand_b: f64,
        result: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            operand_a,
            operand_b,
            operator: operator.into(),
            result,
            timestamp,
        }
    }
}

impl fmt::Display for CalculationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, {}) = {}",
            self.operator, self.operand_a, self.operand_b, self.result
        )
    }
}
