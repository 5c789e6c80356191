use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::auth::model::AuthenticatedUser;

/// Current session as returned by `/api/auth/me`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponseDto {
    pub user_id: String,
    pub session_uid: Option<String>,
    /// Token expiry as a unix timestamp
    pub expires_at: u64,
}

impl From<AuthenticatedUser> for SessionResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            user_id: user.user_id,
            session_uid: user.session_uid,
            expires_at: user.expires_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignOutResponseDto {
    pub signed_out: bool,
}
