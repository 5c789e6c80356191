mod document_service;
mod upload_service;

pub use document_service::{filter_by_name, DocumentService, DownloadedDocument};
pub use upload_service::{storage_key, IncomingFile, UploadService};
