//! Storage and service error types.

use thiserror::Error;

use sims_auth::AuthError;
use sims_core::DomainError;

/// Storage operation error.
///
/// Domain outcomes decided inside a storage transaction (missing part,
/// insufficient stock) surface as `Domain`; everything else is an
/// infrastructure failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("database error: {0}")]
    Database(String),

    /// A stored row could not be mapped back to a domain value.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(value: sqlx::Error) -> Self {
        Self::Database(value.to_string())
    }
}

/// Error returned by the catalog, ledger, report and session services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Any persistence failure. Terminal for the request; never retried.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Domain(e) => Self::Domain(e),
            other => Self::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_outcomes_survive_the_storage_boundary() {
        let err: ServiceError = StoreError::from(DomainError::insufficient_stock(3, 1)).into();
        assert!(matches!(err, ServiceError::Domain(DomainError::InsufficientStock { .. })));
    }

    #[test]
    fn database_failures_become_storage_errors() {
        let err: ServiceError = StoreError::Database("connection reset".into()).into();
        assert!(matches!(err, ServiceError::Storage(msg) if msg.contains("connection reset")));
    }
}
