//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// stock sufficiency, missing references). Storage concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A value failed validation (bad format, out of range, missing field).
    #[error("{0}")]
    Validation(String),

    /// A stock-out asked for more than the part has on hand.
    #[error("Insufficient stock quantity (requested {requested}, available {available})")]
    InsufficientStock { requested: i64, available: i64 },

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A referenced record does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn insufficient_stock(requested: i64, available: i64) -> Self {
        Self::InsufficientStock { requested, available }
    }

    pub fn not_found(what: &'static str) -> Self {
        Self::NotFound(what)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_record() {
        assert_eq!(DomainError::not_found("Spare part").to_string(), "Spare part not found");
    }

    #[test]
    fn insufficient_stock_message_starts_with_the_user_facing_text() {
        let msg = DomainError::insufficient_stock(30, 25).to_string();
        assert!(msg.starts_with("Insufficient stock quantity"));
        assert!(msg.contains("30") && msg.contains("25"));
    }
}
