mod document;

pub use crate::modules::records::DocumentRecord;
pub use document::{DocumentStatus, DocumentType, PreviewKind};
