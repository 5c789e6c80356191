use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Object storage bound to a single bucket.
///
/// Keys are `{user_id}/{timestamp_ms}-{filename}`; the store treats them as
/// opaque strings.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Write `data` under `key`, replacing nothing (keys are unique per upload)
    async fn put_object(&self, key: &str, data: Vec<u8>, content_type: &str)
        -> StorageResult<()>;

    /// Read the full object
    async fn get_object(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Issue a time-limited read URL for the object
    async fn signed_url(&self, key: &str, ttl_secs: u32) -> StorageResult<String>;

    /// Remove the object
    async fn delete_object(&self, key: &str) -> StorageResult<()>;
}
