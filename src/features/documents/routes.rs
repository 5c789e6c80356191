use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use super::dtos::MAX_FILE_SIZE;
use super::handlers::{
    delete_document, download_document, get_extracted_text, list_documents, preview_document,
    upload_documents, DocumentsState,
};
use super::services::{DocumentService, UploadService};
use crate::shared::constants::MAX_DOCUMENTS_PER_USER;

/// Body limit for a full batch plus 1MB of multipart overhead
const UPLOAD_BODY_LIMIT: usize = MAX_DOCUMENTS_PER_USER as usize * MAX_FILE_SIZE + 1024 * 1024;

/// Create document routes (require a resolved session)
pub fn routes(
    upload_service: Arc<UploadService>,
    document_service: Arc<DocumentService>,
) -> Router {
    let state = DocumentsState {
        upload_service,
        document_service,
    };

    Router::new()
        .route(
            "/api/documents/upload",
            post(upload_documents).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/documents", get(list_documents))
        .route("/api/documents/{id}", delete(delete_document))
        .route("/api/documents/{id}/preview", get(preview_document))
        .route("/api/documents/{id}/download", get(download_document))
        .route("/api/documents/{id}/text", get(get_extracted_text))
        .with_state(state)
}
