//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `document_store` - Document database implementations (in-memory, PostgreSQL)

pub mod document_store;

pub use document_store::{InMemoryDocumentStore, PostgresDocumentStore};
