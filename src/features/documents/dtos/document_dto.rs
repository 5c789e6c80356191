use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::documents::models::{DocumentRecord, PreviewKind};
use crate::modules::records::SortOrder;

/// Maximum size of a single uploaded file in bytes (10MB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// File extensions accepted for upload
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt", "jpg", "jpeg", "png"];

/// Shown in place of an inline preview for unsupported file types
pub const PREVIEW_NOT_SUPPORTED_MESSAGE: &str = "Preview not supported. Please download the file.";

pub fn is_extension_allowed(extension: &str) -> bool {
    ALLOWED_EXTENSIONS.contains(&extension)
}

/// MIME type used when storing or serving a file with this extension
pub fn content_type_for_extension(extension: &str) -> &'static str {
    match extension {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Response DTO for a stored document
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentResponseDto {
    pub id: Uuid,
    /// Original filename as uploaded
    pub document_name: String,
    pub document_type: String,
    /// Storage key of the file (`{user_id}/{timestamp}-{filename}`)
    pub file_path: String,
    /// Size in bytes
    pub file_size: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    /// Whether text extraction produced any content
    pub has_extracted_text: bool,
}

impl From<DocumentRecord> for DocumentResponseDto {
    fn from(record: DocumentRecord) -> Self {
        let has_extracted_text = record
            .extracted_text
            .as_deref()
            .is_some_and(|t| !t.is_empty());
        Self {
            id: record.id,
            document_name: record.document_name,
            document_type: record.document_type,
            file_path: record.file_path,
            file_size: record.file_size,
            status: record.status,
            created_at: record.created_at,
            has_extracted_text,
        }
    }
}

/// Upload request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadDocumentsDto {
    /// One of `resume`, `invoice`, `challan`
    pub document_type: String,
    /// Files to scan (repeat the field for each file)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub files: Vec<String>,
}

/// Result of an accepted upload batch
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadBatchResponseDto {
    /// Number of files stored
    pub scanned: usize,
    pub documents: Vec<DocumentResponseDto>,
}

impl UploadBatchResponseDto {
    pub fn message(&self) -> String {
        format!("{} file(s) scanned successfully!", self.scanned)
    }
}

/// Query parameters for listing documents
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListDocumentsQuery {
    /// Case-insensitive substring match on the document name
    #[validate(length(max = 255, message = "Search must not exceed 255 characters"))]
    pub search: Option<String>,
    /// Sort by upload time (`asc` or `desc`, default `desc`)
    pub order: Option<SortOrder>,
}

/// Short-lived link for viewing a document inline
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentPreviewDto {
    pub document: DocumentResponseDto,
    pub kind: PreviewKind,
    /// Signed URL, valid until `expires_at`
    pub url: String,
    pub expires_at: DateTime<Utc>,
    /// Set when the file type cannot be previewed inline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExtractedTextDto {
    pub id: Uuid,
    pub document_name: String,
    pub extracted_text: String,
}

/// Response DTO for delete operations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteDocumentResponseDto {
    /// Confirmation that both the file and its record were removed
    pub deleted: bool,
}
