//! ConsistencyValidator - one injectable value for every consistency check.

use std::sync::Arc;

use tracing::warn;

use super::{
    validate_event_date, ConsistencyError, ExistenceChecker, ReferenceValidator,
    UniquenessChecker,
};
use crate::domain::foundation::{Collection, ValidationError};
use crate::ports::{DocumentStore, FieldValue, StoreError, TransactionContext};

/// Stateless facade over the existence, reference and uniqueness checks.
///
/// Holds no mutable state; build one per process and clone it into each
/// request handler.
///
/// # Example
///
/// ```ignore
/// let validator = ConsistencyValidator::new(store);
///
/// let tx = validator.begin_snapshot().await?;
/// let ok = validator.member_exists("m-1", Some(&tx)).await?
///     && validator.course_exists("c-9", Some(&tx)).await?;
/// validator.end_snapshot(&tx).await?;
/// ```
#[derive(Clone)]
pub struct ConsistencyValidator {
    store: Arc<dyn DocumentStore>,
    existence: ExistenceChecker,
    references: ReferenceValidator,
    uniqueness: UniquenessChecker,
}

impl ConsistencyValidator {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let existence = ExistenceChecker::new(store.clone());
        Self {
            references: ReferenceValidator::new(existence.clone()),
            uniqueness: UniquenessChecker::new(store.clone()),
            existence,
            store,
        }
    }

    // === Snapshots ===

    /// Opens a transaction so that several checks share one snapshot.
    pub async fn begin_snapshot(&self) -> Result<TransactionContext, StoreError> {
        self.store.begin_transaction().await
    }

    /// Closes a snapshot opened with `begin_snapshot`.
    pub async fn end_snapshot(&self, tx: &TransactionContext) -> Result<(), StoreError> {
        self.store.end_transaction(tx).await.map_err(|e| {
            warn!(
                transaction = %tx.id(),
                held_ms = tx.started_at().elapsed_millis(),
                error = %e,
                "Failed to end snapshot"
            );
            e
        })
    }

    // === Checks ===

    pub async fn exists(
        &self,
        collection: Collection,
        id: &str,
        tx: Option<&TransactionContext>,
    ) -> Result<bool, ConsistencyError> {
        self.existence.exists(collection, id, tx).await
    }

    pub async fn member_exists(
        &self,
        id: &str,
        tx: Option<&TransactionContext>,
    ) -> Result<bool, ConsistencyError> {
        self.references.member_exists(id, tx).await
    }

    pub async fn course_exists(
        &self,
        id: &str,
        tx: Option<&TransactionContext>,
    ) -> Result<bool, ConsistencyError> {
        self.references.course_exists(id, tx).await
    }

    pub async fn group_exists(
        &self,
        id: &str,
        tx: Option<&TransactionContext>,
    ) -> Result<bool, ConsistencyError> {
        self.references.group_exists(id, tx).await
    }

    pub async fn event_exists(
        &self,
        id: &str,
        tx: Option<&TransactionContext>,
    ) -> Result<bool, ConsistencyError> {
        self.references.event_exists(id, tx).await
    }

    /// Non-transactional; see [`UniquenessChecker::is_unique`].
    pub async fn is_unique(
        &self,
        collection: Collection,
        field: &str,
        value: &FieldValue,
    ) -> Result<bool, ConsistencyError> {
        self.uniqueness.is_unique(collection, field, value).await
    }

    pub fn validate_event_date(&self, date: Option<&str>) -> Result<bool, ValidationError> {
        validate_event_date(date)
    }
}
