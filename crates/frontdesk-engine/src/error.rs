//! # Engine Error Types
//!
//! What the request layer sees from every engine operation: either a typed
//! domain error it can map to a response, or an opaque persistence failure.
//!
//! Storage errors are logged server-side at conversion time; their message
//! text is never forwarded to the caller.

use thiserror::Error;
use tracing::error;

use frontdesk_core::DomainError;
use frontdesk_db::DbError;

/// Errors returned by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A business rule rejected the operation. Safe to show to the caller.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The storage layer failed. Details are in the server log only.
    #[error("persistence failure")]
    Persistence(#[source] DbError),
}

impl From<DbError> for EngineError {
    fn from(err: DbError) -> Self {
        error!(error = %err, "storage operation failed");
        EngineError::Persistence(err)
    }
}

/// Raw sqlx errors (transaction commit, connection acquire) take the same
/// path as any other storage failure.
impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        EngineError::from(DbError::from(err))
    }
}

impl EngineError {
    /// Whether this is a domain (business rule) error.
    pub fn is_domain(&self) -> bool {
        matches!(self, EngineError::Domain(_))
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_error_is_opaque() {
        let err: EngineError = DbError::QueryFailed("CHECK constraint failed: bookings".into()).into();
        // The caller-visible message carries no storage detail
        assert_eq!(err.to_string(), "persistence failure");
        assert!(!err.is_domain());
    }

    #[test]
    fn test_domain_error_passes_through() {
        let err: EngineError = DomainError::not_found("Booking", "b-1").into();
        assert_eq!(err.to_string(), "Booking not found: b-1");
        assert!(err.is_domain());
    }
}
