//! Document store adapters.
//!
//! - `InMemoryDocumentStore` - Snapshot-isolated store for tests and local runs
//! - `PostgresDocumentStore` - JSONB table on PostgreSQL

mod in_memory;
mod postgres;

pub use in_memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
