//! Error types for calculator operations.
//!
//! Every variant is a local, recoverable condition. The engine checks all
//! preconditions before it touches history, so returning one of these never
//! leaves partial state behind.

use thiserror::Error;

/// Errors that can occur while computing or querying history.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// Operand is non-finite or outside the configured magnitude bound.
    #[error("{operand} {reason}")]
    Validation {
        operand: &'static str,
        value: f64,
        reason: String,
    },

    /// Operator token has no registered operation.
    #[error("unknown operator '{token}' (available: {})", available.join(", "))]
    UnknownOperator {
        token: String,
        available: Vec<String>,
    },

    /// Operation is mathematically undefined for the given operands.
    #[error("{operation}: {reason}")]
    Domain {
        operation: String,
        reason: String,
    },

    /// Query argument is out of range.
    #[error("invalid {argument}: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },
}

/// Coarse classification of a [`CalcError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcErrorKind {
    Validation,
    UnknownOperator,
    Domain,
    InvalidArgument,
}

impl CalcError {
    /// Builds a domain error for the named operation.
    pub fn domain(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Domain {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Returns the error category without its payload.
    pub fn kind(&self) -> CalcErrorKind {
        match self {
            Self::Validation { .. } => CalcErrorKind::Validation,
            Self::UnknownOperator { .. } => CalcErrorKind::UnknownOperator,
            Self::Domain { .. } => CalcErrorKind::Domain,
            Self::InvalidArgument { .. } => CalcErrorKind::InvalidArgument,
        }
    }
}

/// Result type for calculator operations.
pub type Result<T> = std::result::Result<T, CalcError>;
