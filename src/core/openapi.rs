use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::documents::{
    dtos as documents_dtos, handlers as documents_handlers, models as documents_models,
};
use crate::modules::records::SortOrder;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::get_me,
        auth::handlers::sign_out,
        // Documents
        documents_handlers::upload_documents,
        documents_handlers::list_documents,
        documents_handlers::preview_document,
        documents_handlers::download_document,
        documents_handlers::get_extracted_text,
        documents_handlers::delete_document,
        // Dashboard
        dashboard_handlers::get_summary,
    ),
    components(
        schemas(
            // Shared
            Meta,
            SortOrder,
            // Auth
            auth::model::AuthenticatedUser,
            auth::dtos::SessionResponseDto,
            auth::dtos::SignOutResponseDto,
            ApiResponse<auth::dtos::SessionResponseDto>,
            ApiResponse<auth::dtos::SignOutResponseDto>,
            // Documents
            documents_models::DocumentType,
            documents_models::DocumentStatus,
            documents_models::PreviewKind,
            documents_dtos::UploadDocumentsDto,
            documents_dtos::DocumentResponseDto,
            documents_dtos::UploadBatchResponseDto,
            documents_dtos::DocumentPreviewDto,
            documents_dtos::ExtractedTextDto,
            documents_dtos::DeleteDocumentResponseDto,
            ApiResponse<documents_dtos::UploadBatchResponseDto>,
            ApiResponse<Vec<documents_dtos::DocumentResponseDto>>,
            ApiResponse<documents_dtos::DocumentPreviewDto>,
            ApiResponse<documents_dtos::ExtractedTextDto>,
            ApiResponse<documents_dtos::DeleteDocumentResponseDto>,
            // Dashboard
            dashboard_dtos::DocumentTypeUsageDto,
            dashboard_dtos::QuotaUsageDto,
            dashboard_dtos::DashboardSummaryDto,
            ApiResponse<dashboard_dtos::DashboardSummaryDto>,
        )
    ),
    tags(
        (name = "auth", description = "Current session and sign-out"),
        (name = "documents", description = "Document upload, history, preview, download and removal"),
        (name = "Dashboard", description = "Per-type usage and upload quota"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Docscan API",
        version = "0.1.0",
        description = "API documentation for Docscan",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_document_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/me",
            "/api/documents/upload",
            "/api/documents/{id}/preview",
            "/api/dashboard/summary",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_swagger_info_modifier_overrides_info() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Custom".to_string(),
            version: "9.9.9".to_string(),
            description: "Overridden".to_string(),
        }
        .modify(&mut doc);
        assert_eq!(doc.info.title, "Custom");
        assert_eq!(doc.info.version, "9.9.9");
    }
}
