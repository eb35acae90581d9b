//! Errors raised by the consistency checks.

use thiserror::Error;

use crate::domain::foundation::{Collection, DomainError, ErrorCode, ValidationError};
use crate::ports::StoreError;

/// Failure of an existence or uniqueness check.
///
/// A store failure is never reported as "not found": callers always see
/// `StoreAccess` and decide whether to retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("store access failed for {collection} ({target}): {source}")]
    StoreAccess {
        collection: Collection,
        target: String,
        #[source]
        source: StoreError,
    },
}

impl ConsistencyError {
    pub fn store_access(
        collection: Collection,
        target: impl Into<String>,
        source: StoreError,
    ) -> Self {
        ConsistencyError::StoreAccess {
            collection,
            target: target.into(),
            source,
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ConsistencyError::Validation(err) => err.code(),
            ConsistencyError::StoreAccess { .. } => ErrorCode::StoreAccess,
        }
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ConsistencyError::StoreAccess { .. })
    }
}

impl From<ConsistencyError> for DomainError {
    fn from(err: ConsistencyError) -> Self {
        match err {
            ConsistencyError::Validation(inner) => inner.into(),
            ConsistencyError::StoreAccess {
                collection,
                ref target,
                ..
            } => DomainError::new(ErrorCode::StoreAccess, err.to_string())
                .with_detail("collection", collection.as_str())
                .with_detail("target", target.clone()),
        }
    }
}
