use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use tokio::sync::RwLock;

use crate::core::error::{AppError, Result};
use crate::core::router::{api_router, AppServices};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::SessionResolver;
use crate::features::dashboard::DashboardService;
use crate::features::documents::{DocumentService, UploadService};
use crate::modules::records::InMemoryDocumentStore;
use crate::modules::storage::InMemoryStorage;

pub const PREVIEW_TTL_SECS: u32 = 300;

pub fn test_user(user_id: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: user_id.to_string(),
        session_uid: Some(format!("session-{}", user_id)),
        token_id: format!("token-{}", user_id),
        expires_at: (chrono::Utc::now().timestamp() + 3600) as u64,
    }
}

/// Resolves fixed bearer tokens to users; sign-out forgets the token
#[derive(Default)]
pub struct StaticSessionResolver {
    sessions: RwLock<HashMap<String, AuthenticatedUser>>,
}

impl StaticSessionResolver {
    /// Map `token` to a session for `user_id`
    pub async fn add(&self, token: &str, user_id: &str) {
        let mut user = test_user(user_id);
        user.token_id = token.to_string();
        self.sessions.write().await.insert(token.to_string(), user);
    }
}

#[async_trait]
impl SessionResolver for StaticSessionResolver {
    async fn resolve(&self, token: &str) -> Result<AuthenticatedUser> {
        self.sessions
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or_else(|| AppError::Unauthenticated("Unknown token".to_string()))
    }

    async fn sign_out(&self, user: &AuthenticatedUser) -> Result<()> {
        self.sessions.write().await.remove(&user.token_id);
        Ok(())
    }
}

/// HTTP server over in-memory backends
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<InMemoryStorage>,
    pub store: Arc<InMemoryDocumentStore>,
}

pub async fn test_app() -> TestApp {
    let storage = Arc::new(InMemoryStorage::new());
    let store = Arc::new(InMemoryDocumentStore::new());
    let sessions = Arc::new(StaticSessionResolver::default());
    sessions.add("alice-token", "alice").await;
    sessions.add("bob-token", "bob").await;

    let services = AppServices {
        session_resolver: sessions.clone(),
        upload_service: Arc::new(UploadService::new(storage.clone(), store.clone())),
        document_service: Arc::new(DocumentService::new(
            storage.clone(),
            store.clone(),
            PREVIEW_TTL_SECS,
        )),
        dashboard_service: Arc::new(DashboardService::new(store.clone())),
    };

    TestApp {
        server: TestServer::new(api_router(services)).unwrap(),
        storage,
        store,
    }
}
