//! Uniqueness checks: does any document already hold this field value?
//!
//! These reads are never transactional. Two concurrent registrations with
//! the same value can both see "unique"; closing that race needs a unique
//! index or a write-time check in the store.

use std::sync::Arc;

use tracing::{debug, error};

use super::ConsistencyError;
use crate::domain::foundation::{Collection, ValidationError};
use crate::ports::{DocumentStore, FieldValue};

/// Answers whether a field value is unused within a collection.
#[derive(Clone)]
pub struct UniquenessChecker {
    store: Arc<dyn DocumentStore>,
}

impl UniquenessChecker {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Returns `true` iff no document in `collection` has `field == value`.
    ///
    /// Equality is exact; no range, case-folding or type coercion.
    ///
    /// # Errors
    ///
    /// - `Validation(MissingField)` when `field` is empty
    /// - `StoreAccess` when the store query fails
    pub async fn is_unique(
        &self,
        collection: Collection,
        field: &str,
        value: &FieldValue,
    ) -> Result<bool, ConsistencyError> {
        if field.trim().is_empty() {
            return Err(ValidationError::missing_field("field").into());
        }

        let matches = self
            .store
            .query_equals(collection.as_str(), field, value)
            .await
            .map_err(|source| {
                error!(
                    collection = %collection,
                    field = %field,
                    error = %source,
                    "Uniqueness check failed"
                );
                ConsistencyError::store_access(collection, format!("{}={}", field, value), source)
            })?;

        debug!(
            collection = %collection,
            field = %field,
            matches = matches.len(),
            "Uniqueness check"
        );
        Ok(matches.is_empty())
    }
}
