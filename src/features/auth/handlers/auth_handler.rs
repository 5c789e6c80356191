use crate::core::error::Result;
use crate::features::auth::dtos::{SessionResponseDto, SignOutResponseDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::SessionResolver;
use crate::shared::types::ApiResponse;
use axum::{extract::State, Json};
use std::sync::Arc;

/// Get the current session
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current session", body = ApiResponse<SessionResponseDto>),
        (status = 401, description = "Unauthenticated")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(user: AuthenticatedUser) -> Result<Json<ApiResponse<SessionResponseDto>>> {
    Ok(Json(ApiResponse::success(Some(user.into()), None, None)))
}

/// Sign out, revoking the bearer token used for this request
#[utoipa::path(
    post,
    path = "/api/auth/sign-out",
    responses(
        (status = 200, description = "Signed out", body = ApiResponse<SignOutResponseDto>),
        (status = 401, description = "Unauthenticated")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn sign_out(
    user: AuthenticatedUser,
    State(resolver): State<Arc<dyn SessionResolver>>,
) -> Result<Json<ApiResponse<SignOutResponseDto>>> {
    resolver.sign_out(&user).await?;
    Ok(Json(ApiResponse::success(
        Some(SignOutResponseDto { signed_out: true }),
        Some("Signed out successfully".to_string()),
        None,
    )))
}
