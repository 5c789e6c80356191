use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::AppError;
use crate::core::extractor::AppQuery;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::documents::dtos::{
    DeleteDocumentResponseDto, DocumentPreviewDto, DocumentResponseDto, ExtractedTextDto,
    ListDocumentsQuery, UploadBatchResponseDto, UploadDocumentsDto,
};
use crate::features::documents::models::DocumentType;
use crate::features::documents::services::{DocumentService, IncomingFile, UploadService};
use crate::shared::types::{ApiResponse, Meta};

/// State for document handlers
#[derive(Clone)]
pub struct DocumentsState {
    pub upload_service: Arc<UploadService>,
    pub document_service: Arc<DocumentService>,
}

/// Upload a batch of documents of one type
#[utoipa::path(
    post,
    path = "/api/documents/upload",
    tag = "documents",
    request_body(
        content = UploadDocumentsDto,
        content_type = "multipart/form-data",
        description = "Document type and the files to scan"
    ),
    responses(
        (status = 201, description = "All files stored", body = ApiResponse<UploadBatchResponseDto>),
        (status = 400, description = "Empty batch, unsupported file, or missing document type"),
        (status = 401, description = "Authentication required"),
        (status = 409, description = "Batch would exceed the per-user document limit"),
        (status = 413, description = "Request too large"),
        (status = 502, description = "Object storage failure")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_documents(
    user: AuthenticatedUser,
    State(state): State<DocumentsState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UploadBatchResponseDto>>), AppError> {
    let mut document_type: Option<DocumentType> = None;
    let mut files: Vec<IncomingFile> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "document_type" => {
                let value = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read document type: {}", e))
                })?;
                document_type = Some(value.parse().map_err(AppError::BadRequest)?);
            }
            "files" | "file" => {
                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                files.push(IncomingFile {
                    file_name,
                    data: data.to_vec(),
                });
            }
            _ => debug!("Ignoring unknown field: {}", field_name),
        }
    }

    let document_type = document_type
        .ok_or_else(|| AppError::BadRequest("Please select a document type".to_string()))?;

    let response = state
        .upload_service
        .upload_batch(&user, document_type, files)
        .await?;
    let message = response.message();

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(response), Some(message), None)),
    ))
}

/// List the caller's documents
#[utoipa::path(
    get,
    path = "/api/documents",
    tag = "documents",
    params(ListDocumentsQuery),
    responses(
        (status = 200, description = "Documents of the current user", body = ApiResponse<Vec<DocumentResponseDto>>),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_documents(
    user: AuthenticatedUser,
    State(state): State<DocumentsState>,
    AppQuery(query): AppQuery<ListDocumentsQuery>,
) -> Result<Json<ApiResponse<Vec<DocumentResponseDto>>>, AppError> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let documents = state.document_service.list_documents(&user, &query).await?;
    let total = documents.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(documents),
        None,
        Some(Meta { total }),
    )))
}

/// Get a short-lived preview link for a document
#[utoipa::path(
    get,
    path = "/api/documents/{id}/preview",
    tag = "documents",
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Signed preview URL", body = ApiResponse<DocumentPreviewDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Document does not belong to user"),
        (status = 404, description = "Document not found"),
        (status = 502, description = "Object storage failure")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn preview_document(
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    State(state): State<DocumentsState>,
) -> Result<Json<ApiResponse<DocumentPreviewDto>>, AppError> {
    let preview = state
        .document_service
        .preview(&user, id, Utc::now())
        .await?;
    let message = preview.message.clone();

    Ok(Json(ApiResponse::success(Some(preview), message, None)))
}

/// Download the stored file
#[utoipa::path(
    get,
    path = "/api/documents/{id}/download",
    tag = "documents",
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Document does not belong to user"),
        (status = 404, description = "Document not found"),
        (status = 502, description = "Object storage failure")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn download_document(
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    State(state): State<DocumentsState>,
) -> Result<Response, AppError> {
    let file = state.document_service.download(&user, id).await?;

    let headers = [
        (header::CONTENT_TYPE, file.content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            content_disposition(&file.file_name),
        ),
    ];

    Ok((headers, file.data).into_response())
}

/// Get the text extracted from a document
#[utoipa::path(
    get,
    path = "/api/documents/{id}/text",
    tag = "documents",
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Extracted text", body = ApiResponse<ExtractedTextDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Document does not belong to user"),
        (status = 404, description = "Document not found or has no extracted text")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_extracted_text(
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    State(state): State<DocumentsState>,
) -> Result<Json<ApiResponse<ExtractedTextDto>>, AppError> {
    let text = state.document_service.extracted_text(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(text), None, None)))
}

/// Delete a document and its stored file
#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    tag = "documents",
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document deleted", body = ApiResponse<DeleteDocumentResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Document does not belong to user"),
        (status = 404, description = "Document not found"),
        (status = 500, description = "Record could not be removed"),
        (status = 502, description = "Stored file could not be removed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_document(
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    State(state): State<DocumentsState>,
) -> Result<Json<ApiResponse<DeleteDocumentResponseDto>>, AppError> {
    state.document_service.delete(&user, id).await?;

    Ok(Json(ApiResponse::success(
        Some(DeleteDocumentResponseDto { deleted: true }),
        Some("Document deleted successfully".to_string()),
        None,
    )))
}

/// `attachment; filename="..."` with characters unsafe in a quoted header value replaced
fn content_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_quotes_filename() {
        assert_eq!(
            content_disposition("Invoice March.pdf"),
            "attachment; filename=\"Invoice March.pdf\""
        );
        assert_eq!(
            content_disposition("a\"b\\c\né.pdf"),
            "attachment; filename=\"a_b_c__.pdf\""
        );
    }
}
