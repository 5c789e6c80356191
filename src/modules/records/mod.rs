//! Record store for document metadata
//!
//! Defines the [`DocumentStore`] capability and its Postgres implementation.

mod document_store;
#[cfg(test)]
mod memory;
mod postgres;

pub use document_store::{
    DocumentFilter, DocumentRecord, DocumentStore, NewDocument, RecordResult, RecordStoreError,
    SortOrder,
};
#[cfg(test)]
pub use memory::InMemoryDocumentStore;
pub use postgres::PgDocumentStore;
