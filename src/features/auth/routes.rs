use crate::features::auth::handlers;
use crate::features::auth::SessionResolver;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Protected auth routes (require a resolved session)
pub fn protected_routes(resolver: Arc<dyn SessionResolver>) -> Router {
    Router::new()
        .route("/api/auth/me", get(handlers::get_me))
        .route("/api/auth/sign-out", post(handlers::sign_out))
        .with_state(resolver)
}
