//! Storage module for uploaded document bytes
//!
//! Defines the [`ObjectStorage`] capability used by the document workflows and
//! the MinIO/S3-compatible client that implements it.

#[cfg(test)]
mod memory;
mod minio_client;
mod object_storage;

#[cfg(test)]
pub use memory::InMemoryStorage;
pub use minio_client::MinIOClient;
pub use object_storage::{ObjectStorage, StorageError, StorageResult};
