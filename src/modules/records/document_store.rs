use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Row of the `documents` table
#[derive(Debug, Clone, FromRow)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub user_id: String,
    pub document_name: String,
    pub document_type: String,
    pub file_path: String,
    pub file_size: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub extracted_text: Option<String>,
}

/// Values supplied on insert; `id` and `created_at` are assigned by the store
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub user_id: String,
    pub document_name: String,
    pub document_type: String,
    pub file_path: String,
    pub file_size: i64,
    pub status: String,
}

/// Row filter for [`DocumentStore::select_all`]
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    /// Only rows owned by this user
    pub user_id: Option<String>,
}

impl DocumentFilter {
    pub fn owned_by(user_id: &str) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("Record store error: {0}")]
    Backend(#[from] sqlx::Error),

    #[error("Document limit of {limit} reached ({current} stored)")]
    QuotaExceeded { current: i64, limit: i64 },

    #[error("Document {0} not found")]
    NotFound(Uuid),
}

pub type RecordResult<T> = Result<T, RecordStoreError>;

/// Tabular store holding one [`DocumentRecord`] per uploaded file.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a record unless the owner already holds `limit` records.
    ///
    /// The count and the insert happen atomically with respect to other
    /// inserts for the same owner.
    async fn insert_within_quota(&self, doc: NewDocument, limit: i64)
        -> RecordResult<DocumentRecord>;

    /// All rows matching `filter`, ordered by `created_at` when `order` is set
    async fn select_all(
        &self,
        filter: &DocumentFilter,
        order: Option<SortOrder>,
    ) -> RecordResult<Vec<DocumentRecord>>;

    async fn count_for_owner(&self, user_id: &str) -> RecordResult<i64>;

    async fn find_by_id(&self, id: Uuid) -> RecordResult<Option<DocumentRecord>>;

    async fn delete_by_id(&self, id: Uuid) -> RecordResult<()>;
}
