//! Existence checks: is this id present in that collection?

use std::sync::Arc;

use tracing::{debug, error};

use super::ConsistencyError;
use crate::domain::foundation::{Collection, ValidationError};
use crate::ports::{DocumentStore, TransactionContext};

/// Answers whether a document exists, optionally inside a transaction.
///
/// Stateless apart from the store handle; clone freely.
#[derive(Clone)]
pub struct ExistenceChecker {
    store: Arc<dyn DocumentStore>,
}

impl ExistenceChecker {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Returns `true` iff `collection` holds a document with `id`.
    ///
    /// With `tx`, the read is part of that transaction's snapshot. Document
    /// contents are never inspected.
    ///
    /// # Errors
    ///
    /// - `Validation(MissingField)` when `id` is empty; the store is not called
    /// - `StoreAccess` when the store call fails, including a closed `tx`
    pub async fn exists(
        &self,
        collection: Collection,
        id: &str,
        tx: Option<&TransactionContext>,
    ) -> Result<bool, ConsistencyError> {
        if id.trim().is_empty() {
            return Err(ValidationError::missing_field("id").into());
        }

        let found = self
            .store
            .get_by_id(collection.as_str(), id, tx)
            .await
            .map_err(|source| {
                error!(
                    collection = %collection,
                    id = %id,
                    transaction = ?tx.map(|t| t.id()),
                    error = %source,
                    "Existence check failed"
                );
                ConsistencyError::store_access(collection, id, source)
            })?
            .is_some();

        debug!(
            collection = %collection,
            id = %id,
            transactional = tx.is_some(),
            found,
            "Existence check"
        );
        Ok(found)
    }
}
