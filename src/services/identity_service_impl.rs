//! `SeaORM` implementation of the `IdentityService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task;
use tracing::info;

use crate::config::AuthConfig;
use crate::db::Store;
use crate::domain::credentials;
use crate::entities::users::{self, UserRole, UserStatus};
use crate::services::identity_service::{IdentityError, IdentityService, LoginSession};
use crate::services::token::TokenIssuer;

pub struct SeaOrmIdentityService {
    store: Store,
    issuer: Arc<TokenIssuer>,
    refresh_auth_key_after_logout: bool,
}

impl SeaOrmIdentityService {
    #[must_use]
    pub fn new(store: Store, issuer: Arc<TokenIssuer>, auth: &AuthConfig) -> Self {
        Self {
            store,
            issuer,
            refresh_auth_key_after_logout: auth.refresh_auth_key_after_logout,
        }
    }
}

/// Map a non-active status to its guard error.
pub(crate) fn guard_status(status: UserStatus) -> Result<(), IdentityError> {
    match status {
        UserStatus::Active => Ok(()),
        UserStatus::Inactive => Err(IdentityError::PendingVerification),
        UserStatus::Disabled => Err(IdentityError::AccountDisabled),
        UserStatus::Blocked => Err(IdentityError::AccountBlocked),
        UserStatus::Deleted => Err(IdentityError::AccountRemoved),
    }
}

#[async_trait]
impl IdentityService for SeaOrmIdentityService {
    async fn login(
        &self,
        email: &str,
        password: &str,
        ip: Option<String>,
    ) -> Result<LoginSession, IdentityError> {
        let email = email.trim().to_lowercase();

        let user = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or(IdentityError::AccessDenied)?;

        let stored_hash = user.password_hash.clone();
        let password = password.to_string();

        // Argon2 verification is CPU-heavy; keep it off the async runtime
        let is_valid =
            task::spawn_blocking(move || credentials::validate_password(&password, &stored_hash))
                .await
                .map_err(|e| IdentityError::Internal(e.to_string()))?;

        if !is_valid {
            return Err(IdentityError::AccessDenied);
        }

        guard_status(user.status)?;

        let mut user = user;
        user.on_login(ip);

        let user = self
            .store
            .save_user(user)
            .await?
            .ok_or_else(|| IdentityError::ProcessFailed("login bookkeeping".to_string()))?;

        let token = self.issuer.issue(&user, None)?;

        info!(user_id = user.id, "User logged in");

        Ok(LoginSession { user, token })
    }

    async fn resolve_claims(
        &self,
        auth_key: &str,
        role: UserRole,
    ) -> Result<users::Model, IdentityError> {
        let user = self
            .store
            .find_user_by_auth_key(auth_key)
            .await?
            .ok_or(IdentityError::TokenInvalidated)?;

        guard_status(user.status)?;

        if user.metadata.security.token_invalidate {
            return Err(IdentityError::Revoked);
        }

        if user.role != role {
            return Err(IdentityError::IneligibleRole);
        }

        Ok(user)
    }

    async fn logout(&self, mut user: users::Model) -> Result<(), IdentityError> {
        user.on_logout(self.refresh_auth_key_after_logout);

        let user_id = user.id;

        self.store
            .save_user(user)
            .await?
            .ok_or_else(|| IdentityError::ProcessFailed("logout".to_string()))?;

        info!(user_id, "User logged out");

        Ok(())
    }
}
