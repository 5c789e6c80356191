use axum::{http::StatusCode, middleware::from_fn_with_state, routing::get, Router};
use std::sync::Arc;

use crate::core::middleware;
use crate::features::auth::{routes as auth_routes, SessionResolver};
use crate::features::dashboard::{routes as dashboard_routes, DashboardService};
use crate::features::documents::{routes as documents_routes, DocumentService, UploadService};

/// Services the API routes are built from
pub struct AppServices {
    pub session_resolver: Arc<dyn SessionResolver>,
    pub upload_service: Arc<UploadService>,
    pub document_service: Arc<DocumentService>,
    pub dashboard_service: Arc<DashboardService>,
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// API routes plus `/health`. Everything except `/health` requires a bearer token.
pub fn api_router(services: AppServices) -> Router {
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(
            &services.session_resolver,
        )))
        .merge(documents_routes::routes(
            services.upload_service,
            services.document_service,
        ))
        .merge(dashboard_routes::routes(services.dashboard_service))
        .route_layer(from_fn_with_state(
            services.session_resolver,
            middleware::auth_middleware,
        ));

    Router::new()
        .merge(protected_routes)
        .route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use fake::faker::lorem::en::Word;
    use fake::Fake;
    use serde_json::Value;

    use crate::shared::test_helpers::test_app;

    fn pdf(name: &str) -> Part {
        Part::bytes(b"%PDF-1.4 test".to_vec())
            .file_name(name.to_string())
            .mime_type("application/pdf")
    }

    fn upload_form(document_type: &str, names: &[String]) -> MultipartForm {
        names.iter().fold(
            MultipartForm::new().add_text("document_type", document_type.to_string()),
            |form, name| form.add_part("files", pdf(name)),
        )
    }

    fn random_names(n: usize) -> Vec<String> {
        (0..n)
            .map(|i| format!("{}-{}.pdf", Word().fake::<String>(), i))
            .collect()
    }

    #[tokio::test]
    async fn test_health_needs_no_token() {
        let app = test_app().await;
        app.server.get("/health").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_protected_routes_require_bearer_token() {
        let app = test_app().await;

        let response = app.server.get("/api/documents").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["success"], false);

        app.server
            .get("/api/dashboard/summary")
            .authorization_bearer("unknown-token")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_upload_list_and_delete() {
        let app = test_app().await;
        let names = random_names(2);

        let response = app
            .server
            .post("/api/documents/upload")
            .authorization_bearer("alice-token")
            .multipart(upload_form("Invoice", &names))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["data"]["scanned"], 2);
        assert_eq!(body["message"], "2 file(s) scanned successfully!");

        let listing: Value = app
            .server
            .get("/api/documents")
            .authorization_bearer("alice-token")
            .await
            .json();
        assert_eq!(listing["meta"]["total"], 2);
        let id = listing["data"][0]["id"].as_str().unwrap().to_string();

        let summary: Value = app
            .server
            .get("/api/dashboard/summary")
            .authorization_bearer("alice-token")
            .await
            .json();
        assert_eq!(summary["data"]["quota"]["used"], 2);
        assert_eq!(summary["data"]["quota"]["remaining"], 5);

        // Other users cannot see or remove it
        app.server
            .delete(&format!("/api/documents/{}", id))
            .authorization_bearer("bob-token")
            .await
            .assert_status(StatusCode::FORBIDDEN);

        app.server
            .delete(&format!("/api/documents/{}", id))
            .authorization_bearer("alice-token")
            .await
            .assert_status_ok();

        let listing: Value = app
            .server
            .get("/api/documents")
            .authorization_bearer("alice-token")
            .await
            .json();
        assert_eq!(listing["meta"]["total"], 1);
        assert_eq!(app.storage.len(), 1);
    }

    #[tokio::test]
    async fn test_upload_over_quota_is_conflict() {
        let app = test_app().await;
        for i in 0..5 {
            app.store
                .seed("alice", &format!("old-{}.pdf", i), "resume", chrono::Utc::now());
        }

        let response = app
            .server
            .post("/api/documents/upload")
            .authorization_bearer("alice-token")
            .multipart(upload_form("resume", &random_names(3)))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        let body: Value = response.json();
        assert_eq!(
            body["message"],
            "You can only upload 7 documents total. You currently have 5."
        );
        assert_eq!(app.storage.len(), 0);
        assert_eq!(app.store.all().len(), 5);
    }

    #[tokio::test]
    async fn test_upload_rejects_unknown_document_type() {
        let app = test_app().await;

        app.server
            .post("/api/documents/upload")
            .authorization_bearer("alice-token")
            .multipart(upload_form("passport", &random_names(1)))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_download_sets_attachment_headers() {
        let app = test_app().await;
        let record = app
            .store
            .seed("alice", "scan.png", "challan", chrono::Utc::now());
        app.storage.insert(&record.file_path, b"png-bytes");

        let response = app
            .server
            .get(&format!("/api/documents/{}/download", record.id))
            .authorization_bearer("alice-token")
            .await;

        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "image/png");
        assert_eq!(
            response.header("content-disposition"),
            "attachment; filename=\"scan.png\""
        );
        assert_eq!(response.as_bytes().as_ref(), b"png-bytes");
    }

    #[tokio::test]
    async fn test_invalid_order_is_bad_request() {
        let app = test_app().await;

        app.server
            .get("/api/documents?order=sideways")
            .authorization_bearer("alice-token")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_overlong_search_is_rejected() {
        let app = test_app().await;
        let search = "a".repeat(256);

        app.server
            .get("/api/documents")
            .add_query_param("search", &search)
            .authorization_bearer("alice-token")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_sign_out_ends_session() {
        let app = test_app().await;

        app.server
            .get("/api/auth/me")
            .authorization_bearer("alice-token")
            .await
            .assert_status_ok();

        app.server
            .post("/api/auth/sign-out")
            .authorization_bearer("alice-token")
            .await
            .assert_status_ok();

        app.server
            .get("/api/auth/me")
            .authorization_bearer("alice-token")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
