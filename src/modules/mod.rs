//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the backend capabilities the document workflows run against:
//! object storage for file bytes and the record store for document metadata.

pub mod records;
pub mod storage;
