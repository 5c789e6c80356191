use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::core::error::{quota_message, AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::documents::dtos::{
    content_type_for_extension, is_extension_allowed, DocumentResponseDto,
    UploadBatchResponseDto, ALLOWED_EXTENSIONS, MAX_FILE_SIZE,
};
use crate::features::documents::models::{DocumentStatus, DocumentType};
use crate::modules::records::{DocumentStore, NewDocument, RecordStoreError};
use crate::modules::storage::ObjectStorage;
use crate::shared::constants::MAX_DOCUMENTS_PER_USER;
use crate::shared::validation::{file_extension, sanitize_filename};

/// A file received in an upload request
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Storage key for an uploaded file: `{user_id}/{timestamp_ms}-{filename}`
pub fn storage_key(user_id: &str, timestamp_ms: i64, file_name: &str) -> String {
    format!(
        "{}/{}-{}",
        user_id,
        timestamp_ms,
        sanitize_filename(file_name)
    )
}

/// Service that stores a batch of files and records them for the caller
pub struct UploadService {
    storage: Arc<dyn ObjectStorage>,
    store: Arc<dyn DocumentStore>,
}

impl UploadService {
    pub fn new(storage: Arc<dyn ObjectStorage>, store: Arc<dyn DocumentStore>) -> Self {
        Self { storage, store }
    }

    /// Store every file of the batch, or none if it would exceed the quota.
    ///
    /// Files are written one at a time; the first failure stops the batch and
    /// files saved before it are kept.
    pub async fn upload_batch(
        &self,
        user: &AuthenticatedUser,
        document_type: DocumentType,
        files: Vec<IncomingFile>,
    ) -> Result<UploadBatchResponseDto> {
        validate_batch(&files)?;

        let existing = self.store.count_for_owner(&user.user_id).await?;
        if existing + files.len() as i64 > MAX_DOCUMENTS_PER_USER {
            debug!(
                "Rejected batch of {} for user {}: {} already stored",
                files.len(),
                user.user_id,
                existing
            );
            return Err(AppError::QuotaExceeded(quota_message(
                MAX_DOCUMENTS_PER_USER,
                existing,
            )));
        }

        let total = files.len();
        let mut documents: Vec<DocumentResponseDto> = Vec::with_capacity(total);

        for file in files {
            let saved = documents.len();
            let extension = file_extension(&file.file_name).unwrap_or_default();
            let content_type = content_type_for_extension(&extension);
            let file_path = storage_key(
                &user.user_id,
                Utc::now().timestamp_millis(),
                &file.file_name,
            );
            let file_size = file.data.len() as i64;

            self.storage
                .put_object(&file_path, file.data, content_type)
                .await
                .map_err(|e| {
                    warn!("Upload of '{}' failed: {}", file.file_name, e);
                    AppError::StorageWriteFailed(format!(
                        "Failed to upload '{}' ({} of {} files saved): {}",
                        file.file_name, saved, total, e
                    ))
                })?;

            debug!("Object stored: {} ({} bytes)", file_path, file_size);

            let new_document = NewDocument {
                user_id: user.user_id.clone(),
                document_name: file.file_name.clone(),
                document_type: document_type.as_str().to_string(),
                file_path: file_path.clone(),
                file_size,
                status: DocumentStatus::Success.as_str().to_string(),
            };

            match self
                .store
                .insert_within_quota(new_document, MAX_DOCUMENTS_PER_USER)
                .await
            {
                Ok(record) => documents.push(record.into()),
                Err(RecordStoreError::QuotaExceeded { current, limit }) => {
                    // Another session filled the quota after the pre-check
                    if let Err(e) = self.storage.delete_object(&file_path).await {
                        warn!("Failed to remove refused object {}: {}", file_path, e);
                    }
                    warn!(
                        "Quota reached mid-batch for user {}: {} of {} files saved",
                        user.user_id, saved, total
                    );
                    return Err(AppError::QuotaExceeded(quota_message(limit, current)));
                }
                Err(e) => {
                    warn!("Record insert for '{}' failed: {}", file.file_name, e);
                    return Err(AppError::RecordWriteFailed(format!(
                        "Failed to save '{}' ({} of {} files saved): {}",
                        file.file_name, saved, total, e
                    )));
                }
            }
        }

        info!(
            "User {} uploaded {} {} document(s)",
            user.user_id,
            documents.len(),
            document_type
        );

        Ok(UploadBatchResponseDto {
            scanned: documents.len(),
            documents,
        })
    }
}

fn validate_batch(files: &[IncomingFile]) -> Result<()> {
    if files.is_empty() {
        return Err(AppError::BadRequest(
            "Please select at least one file to scan".to_string(),
        ));
    }

    for file in files {
        if file.data.len() > MAX_FILE_SIZE {
            return Err(AppError::BadRequest(format!(
                "File '{}' is too large. Maximum size is {} MB",
                file.file_name,
                MAX_FILE_SIZE / 1024 / 1024
            )));
        }

        let allowed = file_extension(&file.file_name)
            .as_deref()
            .is_some_and(is_extension_allowed);
        if !allowed {
            return Err(AppError::BadRequest(format!(
                "File '{}' has an unsupported type. Allowed: {}",
                file.file_name,
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }
    }

    Ok(())
}
