//! DocumentStore port - Interface to the remote document database.
//!
//! The registry never writes through this port. It only asks two questions:
//! "does this id exist?" and "does any document carry this field value?".
//!
//! # Transactions
//!
//! `begin_transaction` hands out a [`TransactionContext`]. Reads passed that
//! context observe the snapshot taken when the transaction began, so several
//! checks made for one logical operation agree with each other. The context
//! is passed explicitly on every call; there is no ambient transaction.
//!
//! ```ignore
//! let tx = store.begin_transaction().await?;
//! let member = store.get_by_id("members", "m-1", Some(&tx)).await?;
//! let course = store.get_by_id("courses", "c-9", Some(&tx)).await?;
//! store.end_transaction(&tx).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::foundation::Timestamp;

/// A stored document: its id plus schemaless fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Returns the value stored under `field`, if any.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// Scalar used in field-equality queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
}

impl FieldValue {
    /// Exact equality against a stored JSON value. No coercion between types.
    pub fn matches(&self, stored: &Value) -> bool {
        match (self, stored) {
            (FieldValue::Text(expected), Value::String(actual)) => expected == actual,
            (FieldValue::Integer(expected), Value::Number(actual)) => {
                actual.as_i64() == Some(*expected)
            }
            (FieldValue::Boolean(expected), Value::Bool(actual)) => expected == actual,
            _ => false,
        }
    }

    /// JSON form, as written into store queries.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Integer(i) => Value::from(*i),
            FieldValue::Boolean(b) => Value::Bool(*b),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

/// Identifier of an open store transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Creates a new random TransactionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to one consistent read snapshot of the store.
///
/// Only the store that issued it can interpret it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionContext {
    id: TransactionId,
    started_at: Timestamp,
}

impl TransactionContext {
    /// Issued by store adapters from `begin_transaction`.
    pub fn new(id: TransactionId) -> Self {
        Self {
            id,
            started_at: Timestamp::now(),
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }
}

/// Infrastructure failures raised by a document store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store unreachable: {0}")]
    Connection(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("document could not be decoded: {0}")]
    Serialization(String),

    #[error("transaction {0} is closed or unknown")]
    TransactionClosed(TransactionId),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// Port for reading from the document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Looks up one document by id.
    ///
    /// With `tx`, the read joins that transaction's snapshot. Returns `None`
    /// when the collection has no such document.
    async fn get_by_id(
        &self,
        collection: &str,
        id: &str,
        tx: Option<&TransactionContext>,
    ) -> Result<Option<Document>, StoreError>;

    /// Returns every document in `collection` whose `field` equals `value`.
    async fn query_equals(
        &self,
        collection: &str,
        field: &str,
        value: &FieldValue,
    ) -> Result<Vec<Document>, StoreError>;

    /// Opens a transaction and captures its read snapshot.
    async fn begin_transaction(&self) -> Result<TransactionContext, StoreError>;

    /// Closes a transaction. Later reads through it fail with `TransactionClosed`.
    async fn end_transaction(&self, tx: &TransactionContext) -> Result<(), StoreError>;
}
