//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is raised before any state is touched, so a caller that
/// receives one can assume the books are exactly as they were.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed or out-of-range input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced record does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// A usage request asked for more than is on hand.
    #[error("insufficient stock: cannot use {requested} {unit} of {name}, only {available} {unit} available")]
    InsufficientStock {
        name: String,
        requested: f64,
        available: f64,
        unit: String,
    },

    /// A domain invariant was violated (e.g. a loaded snapshot is inconsistent).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn insufficient_stock(
        name: impl Into<String>,
        requested: f64,
        available: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self::InsufficientStock {
            name: name.into(),
            requested,
            available,
            unit: unit.into(),
        }
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
