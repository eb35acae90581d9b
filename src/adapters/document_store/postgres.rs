//! PostgreSQL implementation of DocumentStore.
//!
//! Documents live in a single JSONB table keyed by `(collection, id)`.
//! Transactions run at `REPEATABLE READ`, so every read through one
//! `TransactionContext` sees the same snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use tokio::sync::Mutex;

use crate::config::DatabaseConfig;
use crate::ports::{
    Document, DocumentStore, FieldValue, StoreError, TransactionContext, TransactionId,
};

/// Postgres SQLSTATE for `insufficient_privilege`.
const INSUFFICIENT_PRIVILEGE: &str = "42501";

type OpenTransaction = Arc<Mutex<Option<Transaction<'static, Postgres>>>>;

/// PostgreSQL implementation of the DocumentStore port.
pub struct PostgresDocumentStore {
    pool: PgPool,
    open: Mutex<HashMap<TransactionId, OpenTransaction>>,
}

/// Row shape shared by all document queries.
#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    body: Value,
}

impl PostgresDocumentStore {
    /// Creates a new PostgresDocumentStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            open: Mutex::new(HashMap::new()),
        }
    }

    /// Builds a pool from configuration and wraps it.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(&config.url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded migrations in `./migrations`.
    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to run migrations: {}", e)))
    }

    async fn lookup(&self, tx: &TransactionContext) -> Result<OpenTransaction, StoreError> {
        self.open
            .lock()
            .await
            .get(&tx.id())
            .cloned()
            .ok_or(StoreError::TransactionClosed(tx.id()))
    }
}

/// Maps a sqlx failure onto the store error taxonomy.
fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreError::Connection(err.to_string()),
        sqlx::Error::Database(ref db)
            if db.code().as_deref() == Some(INSUFFICIENT_PRIVILEGE) =>
        {
            StoreError::PermissionDenied(err.to_string())
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::Serialization(err.to_string())
        }
        other => StoreError::Backend(other.to_string()),
    }
}

fn into_document(row: DocumentRow) -> Result<Document, StoreError> {
    match row.body {
        Value::Object(fields) => Ok(Document::new(row.id, fields)),
        other => Err(StoreError::Serialization(format!(
            "document {} body is not an object: {}",
            row.id, other
        ))),
    }
}

const SELECT_BY_ID: &str = r#"
    SELECT id, body
    FROM documents
    WHERE collection = $1 AND id = $2
"#;

const SELECT_BY_FIELD: &str = r#"
    SELECT id, body
    FROM documents
    WHERE collection = $1 AND body -> $2 = $3
    ORDER BY id
"#;

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn get_by_id(
        &self,
        collection: &str,
        id: &str,
        tx: Option<&TransactionContext>,
    ) -> Result<Option<Document>, StoreError> {
        let query = sqlx::query_as::<_, DocumentRow>(SELECT_BY_ID)
            .bind(collection)
            .bind(id);

        let row = match tx {
            Some(ctx) => {
                let handle = self.lookup(ctx).await?;
                let mut guard = handle.lock().await;
                let conn = guard
                    .as_mut()
                    .ok_or(StoreError::TransactionClosed(ctx.id()))?;
                query.fetch_optional(&mut **conn).await
            }
            None => query.fetch_optional(&self.pool).await,
        }
        .map_err(map_sqlx_error)?;

        row.map(into_document).transpose()
    }

    async fn query_equals(
        &self,
        collection: &str,
        field: &str,
        value: &FieldValue,
    ) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, DocumentRow>(SELECT_BY_FIELD)
            .bind(collection)
            .bind(field)
            .bind(Json(value.to_json()))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(into_document).collect()
    }

    async fn begin_transaction(&self) -> Result<TransactionContext, StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        // The snapshot is taken at the first statement, not at BEGIN.
        sqlx::query("SELECT 1")
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let ctx = TransactionContext::new(TransactionId::new());
        self.open
            .lock()
            .await
            .insert(ctx.id(), Arc::new(Mutex::new(Some(tx))));
        Ok(ctx)
    }

    async fn end_transaction(&self, ctx: &TransactionContext) -> Result<(), StoreError> {
        let handle = self
            .open
            .lock()
            .await
            .remove(&ctx.id())
            .ok_or(StoreError::TransactionClosed(ctx.id()))?;

        let tx = handle
            .lock()
            .await
            .take()
            .ok_or(StoreError::TransactionClosed(ctx.id()))?;
        tx.rollback().await.map_err(map_sqlx_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pool_errors_map_to_connection() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolTimedOut),
            StoreError::Connection(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolClosed),
            StoreError::Connection(_)
        ));
    }

    #[test]
    fn io_errors_map_to_connection() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(matches!(
            map_sqlx_error(sqlx::Error::Io(io)),
            StoreError::Connection(_)
        ));
    }

    #[test]
    fn decode_errors_map_to_serialization() {
        let err = sqlx::Error::Decode("bad jsonb".into());
        assert!(matches!(map_sqlx_error(err), StoreError::Serialization(_)));
    }

    #[test]
    fn other_errors_map_to_backend() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::RowNotFound),
            StoreError::Backend(_)
        ));
    }

    #[test]
    fn object_body_becomes_document() {
        let row = DocumentRow {
            id: "m-1".to_string(),
            body: json!({"name": "Ana"}),
        };
        let doc = into_document(row).unwrap();
        assert_eq!(doc.id, "m-1");
        assert_eq!(doc.get("name"), Some(&json!("Ana")));
    }

    #[test]
    fn non_object_body_is_serialization_error() {
        let row = DocumentRow {
            id: "m-1".to_string(),
            body: json!([1, 2, 3]),
        };
        assert!(matches!(
            into_document(row),
            Err(StoreError::Serialization(_))
        ));
    }
}
