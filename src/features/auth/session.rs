use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::JwtValidator;

/// Identity capability: current-user lookup and sign-out.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// Resolve a bearer token into the caller's session
    async fn resolve(&self, token: &str) -> Result<AuthenticatedUser>;

    /// End the session; later `resolve` calls with the same token fail
    async fn sign_out(&self, user: &AuthenticatedUser) -> Result<()>;
}

/// Tokens signed out before their expiry, keyed by token id
#[derive(Default)]
pub struct RevocationList {
    revoked: RwLock<HashMap<String, u64>>,
}

impl RevocationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn revoke(&self, token_id: &str, expires_at: u64, now: u64) {
        let mut revoked = self.revoked.write().await;
        // Expired entries can never validate again
        revoked.retain(|_, exp| *exp > now);
        revoked.insert(token_id.to_string(), expires_at);
    }

    pub async fn is_revoked(&self, token_id: &str) -> bool {
        self.revoked.read().await.contains_key(token_id)
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.revoked.read().await.len()
    }
}

/// [`SessionResolver`] backed by JWT verification and an in-process revocation list
pub struct JwtSessionResolver {
    validator: Arc<JwtValidator>,
    revocations: RevocationList,
}

impl JwtSessionResolver {
    pub fn new(validator: Arc<JwtValidator>) -> Self {
        Self {
            validator,
            revocations: RevocationList::new(),
        }
    }
}

#[async_trait]
impl SessionResolver for JwtSessionResolver {
    async fn resolve(&self, token: &str) -> Result<AuthenticatedUser> {
        let user = self.validator.validate_token(token).await?;

        if self.revocations.is_revoked(&user.token_id).await {
            return Err(AppError::Unauthenticated(
                "Session has been signed out".to_string(),
            ));
        }

        Ok(user)
    }

    async fn sign_out(&self, user: &AuthenticatedUser) -> Result<()> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        self.revocations
            .revoke(&user.token_id, user.expires_at, now)
            .await;

        info!("User {} signed out", user.user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::validator::tests::{sign, test_validator, valid_claims};

    #[tokio::test]
    async fn test_sign_out_revokes_token() {
        let resolver = JwtSessionResolver::new(Arc::new(test_validator()));
        let token = sign(valid_claims("user-1"));

        let user = resolver.resolve(&token).await.unwrap();
        resolver.sign_out(&user).await.unwrap();

        let err = resolver.resolve(&token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));

        // Other sessions are unaffected
        let other = sign(valid_claims("user-2"));
        assert!(resolver.resolve(&other).await.is_ok());
    }

    #[tokio::test]
    async fn test_revocation_list_prunes_expired_entries() {
        let list = RevocationList::new();
        list.revoke("old", 100, 50).await;
        list.revoke("new", 1_000, 500).await;

        assert!(!list.is_revoked("old").await);
        assert!(list.is_revoked("new").await);
        assert_eq!(list.len().await, 1);
    }
}
