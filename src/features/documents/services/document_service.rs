use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::documents::dtos::{
    content_type_for_extension, DocumentPreviewDto, DocumentResponseDto, ExtractedTextDto,
    ListDocumentsQuery, PREVIEW_NOT_SUPPORTED_MESSAGE,
};
use crate::features::documents::models::{DocumentRecord, PreviewKind};
use crate::modules::records::{DocumentFilter, DocumentStore, RecordStoreError};
use crate::modules::storage::{ObjectStorage, StorageError};
use crate::shared::validation::file_extension;

/// File bytes ready to be sent as an attachment
#[derive(Debug)]
pub struct DownloadedDocument {
    pub file_name: String,
    pub content_type: &'static str,
    pub data: Vec<u8>,
}

/// Keep documents whose name contains `query`, ignoring case.
/// A blank query keeps everything.
pub fn filter_by_name(documents: Vec<DocumentRecord>, query: &str) -> Vec<DocumentRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return documents;
    }
    documents
        .into_iter()
        .filter(|d| d.document_name.to_lowercase().contains(&needle))
        .collect()
}

/// Service for reading and removing a user's stored documents
pub struct DocumentService {
    storage: Arc<dyn ObjectStorage>,
    store: Arc<dyn DocumentStore>,
    preview_ttl_secs: u32,
}

impl DocumentService {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        store: Arc<dyn DocumentStore>,
        preview_ttl_secs: u32,
    ) -> Self {
        Self {
            storage,
            store,
            preview_ttl_secs,
        }
    }

    /// Load a record and check that it belongs to the caller
    async fn load_owned(&self, user: &AuthenticatedUser, id: Uuid) -> Result<DocumentRecord> {
        match self.store.find_by_id(id).await? {
            Some(record) if record.user_id == user.user_id => Ok(record),
            Some(_) => Err(AppError::Forbidden(
                "Document does not belong to this user".to_string(),
            )),
            None => Err(AppError::NotFound(format!("Document {} not found", id))),
        }
    }

    /// The caller's documents, newest first unless `order` says otherwise
    pub async fn list_documents(
        &self,
        user: &AuthenticatedUser,
        query: &ListDocumentsQuery,
    ) -> Result<Vec<DocumentResponseDto>> {
        let order = query.order.unwrap_or_default();
        let records = self
            .store
            .select_all(&DocumentFilter::owned_by(&user.user_id), Some(order))
            .await?;

        let records = match query.search.as_deref() {
            Some(search) => filter_by_name(records, search),
            None => records,
        };

        debug!(
            "Listed {} document(s) for user {}",
            records.len(),
            user.user_id
        );

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Issue a fresh signed URL for viewing the document
    pub async fn preview(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<DocumentPreviewDto> {
        let record = self.load_owned(user, id).await?;

        let url = self
            .storage
            .signed_url(&record.file_path, self.preview_ttl_secs)
            .await
            .map_err(|e| {
                AppError::StorageReadFailed(format!(
                    "Failed to create preview link for '{}': {}",
                    record.document_name, e
                ))
            })?;

        let kind = PreviewKind::from_path(&record.file_path);
        let message = match kind {
            PreviewKind::Other => Some(PREVIEW_NOT_SUPPORTED_MESSAGE.to_string()),
            PreviewKind::Image | PreviewKind::Pdf => None,
        };

        Ok(DocumentPreviewDto {
            document: record.into(),
            kind,
            url,
            expires_at: now + Duration::seconds(i64::from(self.preview_ttl_secs)),
            message,
        })
    }

    pub async fn download(&self, user: &AuthenticatedUser, id: Uuid) -> Result<DownloadedDocument> {
        let record = self.load_owned(user, id).await?;

        let data = self
            .storage
            .get_object(&record.file_path)
            .await
            .map_err(|e| {
                AppError::StorageReadFailed(format!(
                    "Failed to download '{}': {}",
                    record.document_name, e
                ))
            })?;

        let extension = file_extension(&record.file_path).unwrap_or_default();

        Ok(DownloadedDocument {
            content_type: content_type_for_extension(&extension),
            file_name: record.document_name,
            data,
        })
    }

    /// Remove the stored file, then its record.
    ///
    /// If the file cannot be removed the record is left in place.
    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<()> {
        let record = self.load_owned(user, id).await?;

        match self.storage.delete_object(&record.file_path).await {
            Ok(()) | Err(StorageError::NotFound(_)) => {}
            Err(e) => {
                warn!("Failed to delete object {}: {}", record.file_path, e);
                return Err(AppError::StorageWriteFailed(format!(
                    "Failed to delete '{}' from storage: {}",
                    record.document_name, e
                )));
            }
        }

        match self.store.delete_by_id(id).await {
            Ok(()) => {}
            Err(RecordStoreError::NotFound(_)) => {
                debug!("Record {} already removed", id);
            }
            Err(e) => {
                return Err(AppError::RecordDeleteFailed(format!(
                    "Failed to delete record for '{}': {}",
                    record.document_name, e
                )));
            }
        }

        info!("User {} deleted document {}", user.user_id, id);
        Ok(())
    }

    pub async fn extracted_text(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<ExtractedTextDto> {
        let record = self.load_owned(user, id).await?;

        match record.extracted_text {
            Some(text) if !text.is_empty() => Ok(ExtractedTextDto {
                id: record.id,
                document_name: record.document_name,
                extracted_text: text,
            }),
            _ => Err(AppError::NoExtractedText(
                "This document does not have extracted text available.".to_string(),
            )),
        }
    }
}
