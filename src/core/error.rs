use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::modules::records::RecordStoreError;
use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Upload limit reached: {0}")]
    QuotaExceeded(String),

    #[error("Storage write failed: {0}")]
    StorageWriteFailed(String),

    #[error("Storage read failed: {0}")]
    StorageReadFailed(String),

    #[error("Record write failed: {0}")]
    RecordWriteFailed(String),

    #[error("Record delete failed: {0}")]
    RecordDeleteFailed(String),

    #[error("No extracted text: {0}")]
    NoExtractedText(String),
}

impl AppError {
    /// HTTP status returned for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) | AppError::NoExtractedText(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::QuotaExceeded(_) => StatusCode::CONFLICT,
            AppError::StorageWriteFailed(_) | AppError::StorageReadFailed(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::RecordWriteFailed(_) | AppError::RecordDeleteFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (message, errors) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                ("Database error occurred".to_string(), None)
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Internal server error".to_string(), None)
            }
            AppError::Validation(ref msg) => (msg.clone(), Some(vec![msg.clone()])),
            AppError::StorageWriteFailed(ref msg)
            | AppError::StorageReadFailed(ref msg)
            | AppError::RecordWriteFailed(ref msg)
            | AppError::RecordDeleteFailed(ref msg) => {
                tracing::error!("Backend error: {}", msg);
                (msg.clone(), None)
            }
            AppError::NotFound(ref msg)
            | AppError::BadRequest(ref msg)
            | AppError::Unauthenticated(ref msg)
            | AppError::Forbidden(ref msg)
            | AppError::QuotaExceeded(ref msg)
            | AppError::NoExtractedText(ref msg) => (msg.clone(), None),
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

impl From<RecordStoreError> for AppError {
    fn from(err: RecordStoreError) -> Self {
        match err {
            RecordStoreError::Backend(e) => AppError::Database(e),
            RecordStoreError::QuotaExceeded { current, limit } => {
                AppError::QuotaExceeded(quota_message(limit, current))
            }
            RecordStoreError::NotFound(id) => {
                AppError::NotFound(format!("Document {} not found", id))
            }
        }
    }
}

/// User-facing message for a refused upload batch
pub fn quota_message(limit: i64, current: i64) -> String {
    format!(
        "You can only upload {} documents total. You currently have {}.",
        limit, current
    )
}

pub type Result<T> = std::result::Result<T, AppError>;
