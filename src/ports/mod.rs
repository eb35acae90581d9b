//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Store Ports
//!
//! - `DocumentStore` - Read access to the remote document database,
//!   with explicit transaction contexts for snapshot-consistent reads

mod document_store;

pub use document_store::{
    Document, DocumentStore, FieldValue, StoreError, TransactionContext, TransactionId,
};
