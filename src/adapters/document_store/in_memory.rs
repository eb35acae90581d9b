//! In-memory document store with snapshot transactions.
//!
//! Intended for tests and local development. Each `begin_transaction` clones
//! the live collections, so reads through that transaction keep seeing the
//! data as it was even while `insert`/`remove` change the live state.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::{
    Document, DocumentStore, FieldValue, StoreError, TransactionContext, TransactionId,
};

type Collections = HashMap<String, HashMap<String, Map<String, Value>>>;

/// In-memory document store.
///
/// Features:
/// - Snapshot isolation per transaction
/// - Seeding helpers (`insert`, `remove`) for test setup
/// - Fault injection (`fail_with`) to exercise store-failure paths
///
/// # Example
///
/// ```ignore
/// let store = InMemoryDocumentStore::new();
/// store.insert("courses", "bible-101", Map::new()).await;
///
/// let doc = store.get_by_id("courses", "bible-101", None).await?;
/// assert!(doc.is_some());
/// ```
#[derive(Default)]
pub struct InMemoryDocumentStore {
    live: RwLock<Collections>,
    snapshots: RwLock<HashMap<TransactionId, Arc<Collections>>>,
    failure: RwLock<Option<StoreError>>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Inserts or replaces a document in the live state.
    pub async fn insert(&self, collection: &str, id: &str, fields: Map<String, Value>) {
        self.live
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
    }

    /// Removes a document from the live state. Returns true if it existed.
    pub async fn remove(&self, collection: &str, id: &str) -> bool {
        self.live
            .write()
            .await
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .is_some()
    }

    /// Makes every subsequent call fail with `error` until cleared.
    pub async fn fail_with(&self, error: StoreError) {
        *self.failure.write().await = Some(error);
    }

    /// Stops injecting failures.
    pub async fn clear_failure(&self) {
        *self.failure.write().await = None;
    }

    /// Number of transactions begun and not yet ended.
    pub async fn open_transaction_count(&self) -> usize {
        self.snapshots.read().await.len()
    }

    async fn check_failure(&self) -> Result<(), StoreError> {
        match self.failure.read().await.as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn find(collections: &Collections, collection: &str, id: &str) -> Option<Document> {
    collections
        .get(collection)
        .and_then(|docs| docs.get(id))
        .map(|fields| Document::new(id, fields.clone()))
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get_by_id(
        &self,
        collection: &str,
        id: &str,
        tx: Option<&TransactionContext>,
    ) -> Result<Option<Document>, StoreError> {
        self.check_failure().await?;

        match tx {
            Some(tx) => {
                let snapshot = self
                    .snapshots
                    .read()
                    .await
                    .get(&tx.id())
                    .cloned()
                    .ok_or(StoreError::TransactionClosed(tx.id()))?;
                Ok(find(&snapshot, collection, id))
            }
            None => Ok(find(&*self.live.read().await, collection, id)),
        }
    }

    async fn query_equals(
        &self,
        collection: &str,
        field: &str,
        value: &FieldValue,
    ) -> Result<Vec<Document>, StoreError> {
        self.check_failure().await?;

        let live = self.live.read().await;
        let mut matches: Vec<Document> = live
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, fields)| fields.get(field).is_some_and(|v| value.matches(v)))
                    .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matches)
    }

    async fn begin_transaction(&self) -> Result<TransactionContext, StoreError> {
        self.check_failure().await?;

        let snapshot = Arc::new(self.live.read().await.clone());
        let tx = TransactionContext::new(TransactionId::new());
        self.snapshots.write().await.insert(tx.id(), snapshot);
        Ok(tx)
    }

    async fn end_transaction(&self, tx: &TransactionContext) -> Result<(), StoreError> {
        match self.snapshots.write().await.remove(&tx.id()) {
            Some(_) => Ok(()),
            None => Err(StoreError::TransactionClosed(tx.id())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fields must be a JSON object"),
        }
    }

    #[tokio::test]
    async fn get_by_id_returns_inserted_document() {
        let store = InMemoryDocumentStore::new();
        store
            .insert("members", "m-1", fields(json!({"name": "Ana"})))
            .await;

        let doc = store.get_by_id("members", "m-1", None).await.unwrap();

        let doc = doc.expect("document should exist");
        assert_eq!(doc.id, "m-1");
        assert_eq!(doc.get("name"), Some(&json!("Ana")));
    }

    #[tokio::test]
    async fn get_by_id_is_scoped_to_collection() {
        let store = InMemoryDocumentStore::new();
        store.insert("courses", "x", Map::new()).await;

        assert!(store.get_by_id("events", "x", None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn remove_reports_whether_document_existed() {
        let store = InMemoryDocumentStore::new();
        store.insert("events", "e-1", Map::new()).await;

        assert!(store.remove("events", "e-1").await);
        assert!(!store.remove("events", "e-1").await);
        assert!(store.get_by_id("events", "e-1", None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn transaction_reads_from_snapshot() {
        let store = InMemoryDocumentStore::new();
        store.insert("courses", "c-1", Map::new()).await;

        let tx = store.begin_transaction().await.unwrap();
        store.remove("courses", "c-1").await;
        store.insert("courses", "c-2", Map::new()).await;

        assert!(store.get_by_id("courses", "c-1", Some(&tx)).await.unwrap().is_some());
        assert!(store.get_by_id("courses", "c-2", Some(&tx)).await.unwrap().is_none());
        assert!(store.get_by_id("courses", "c-1", None).await.unwrap().is_none());
        assert!(store.get_by_id("courses", "c-2", None).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn ended_transaction_cannot_be_read_through() {
        let store = InMemoryDocumentStore::new();
        let tx = store.begin_transaction().await.unwrap();
        assert_eq!(store.open_transaction_count().await, 1);

        store.end_transaction(&tx).await.unwrap();
        assert_eq!(store.open_transaction_count().await, 0);

        let result = store.get_by_id("members", "m-1", Some(&tx)).await;
        assert_eq!(result, Err(StoreError::TransactionClosed(tx.id())));
    }

    #[tokio::test]
    async fn ending_twice_fails() {
        let store = InMemoryDocumentStore::new();
        let tx = store.begin_transaction().await.unwrap();
        store.end_transaction(&tx).await.unwrap();

        assert!(store.end_transaction(&tx).await.is_err());
    }

    #[tokio::test]
    async fn query_equals_matches_exact_values_only() {
        let store = InMemoryDocumentStore::new();
        store
            .insert("members", "m-1", fields(json!({"email": "ana@example.org"})))
            .await;
        store
            .insert("members", "m-2", fields(json!({"email": "bea@example.org"})))
            .await;
        store.insert("members", "m-3", Map::new()).await;

        let hits = store
            .query_equals("members", "email", &FieldValue::from("ana@example.org"))
            .await
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "m-1");
    }

    #[tokio::test]
    async fn query_equals_on_missing_collection_is_empty() {
        let store = InMemoryDocumentStore::new();
        let hits = store
            .query_equals("groups", "name", &FieldValue::from("choir"))
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn injected_failure_surfaces_until_cleared() {
        let store = InMemoryDocumentStore::new();
        store
            .fail_with(StoreError::Connection("network down".to_string()))
            .await;

        assert!(store.get_by_id("members", "m-1", None).await.is_err());
        assert!(store
            .query_equals("members", "email", &FieldValue::from("x"))
            .await
            .is_err());
        assert!(store.begin_transaction().await.is_err());

        store.clear_failure().await;
        assert!(store.get_by_id("members", "m-1", None).await.is_ok());
    }
}
