pub mod document_dto;

pub use document_dto::{
    content_type_for_extension, is_extension_allowed, DeleteDocumentResponseDto,
    DocumentPreviewDto, DocumentResponseDto, ExtractedTextDto, ListDocumentsQuery,
    UploadBatchResponseDto, UploadDocumentsDto, ALLOWED_EXTENSIONS, MAX_FILE_SIZE,
    PREVIEW_NOT_SUPPORTED_MESSAGE,
};
