//! Domain service for authentication: login, token resolution, logout.

use thiserror::Error;

use crate::domain::validation::FieldError;
use crate::entities::users::{self, UserRole};
use crate::services::token::IssuedToken;

/// Errors shared by the identity and account services. Every variant maps
/// to one machine-readable code at the API boundary.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Unknown email or wrong password; callers get the same answer for both
    #[error("Access denied")]
    AccessDenied,

    /// Token failed verification, or its auth key resolves to no account
    #[error("Token invalidated")]
    TokenInvalidated,

    /// Account exists but has not completed the activation handshake
    #[error("Account pending verification")]
    PendingVerification,

    #[error("Account disabled")]
    AccountDisabled,

    #[error("Account blocked")]
    AccountBlocked,

    #[error("Account no longer available")]
    AccountRemoved,

    /// Revocation flag set; the account must log in again
    #[error("Access revoked")]
    Revoked,

    /// Token role claim does not match the stored role
    #[error("Ineligible role")]
    IneligibleRole,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Code has expired")]
    ExpiredCode,

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// A write touched zero rows
    #[error("Process failed: {0}")]
    ProcessFailed(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for IdentityError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for IdentityError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<crate::services::token::TokenError> for IdentityError {
    fn from(_: crate::services::token::TokenError) -> Self {
        Self::TokenInvalidated
    }
}

/// Successful login: the refreshed user row plus a signed token.
#[derive(Debug)]
pub struct LoginSession {
    pub user: users::Model,
    pub token: IssuedToken,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait IdentityService: Send + Sync {
    /// Verifies credentials and issues a token.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::AccessDenied`] for unknown email and wrong
    /// password alike; status-gated variants for non-active accounts.
    async fn login(
        &self,
        email: &str,
        password: &str,
        ip: Option<String>,
    ) -> Result<LoginSession, IdentityError>;

    /// Resolves verified token claims to a live account.
    ///
    /// Guards run in a fixed order: account lookup, status, revocation
    /// flag, role. The first failure wins.
    async fn resolve_claims(
        &self,
        auth_key: &str,
        role: UserRole,
    ) -> Result<users::Model, IdentityError>;

    /// Revokes the user's outstanding tokens.
    async fn logout(&self, user: users::Model) -> Result<(), IdentityError>;
}
