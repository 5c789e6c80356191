use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Resolved session of the caller, passed explicitly into every workflow
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Owner id stored on document records (`sub` claim)
    pub user_id: String,
    /// Session UID (only present for interactive OIDC flows)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_uid: Option<String>,
    /// Key used to revoke this token on sign-out (`jti`, or the token itself)
    #[serde(skip)]
    pub token_id: String,
    /// Token expiry as a unix timestamp
    pub expires_at: u64,
}
