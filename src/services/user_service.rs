//! Domain service for the account lifecycle: signup, verification,
//! password reset and change.

use crate::entities::users;
use crate::services::identity_service::IdentityError;

/// Signup request fields.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Creates an inactive account holding a pending activation code.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Validation`] with one entry per rejected
    /// field, including a taken email address.
    async fn signup(&self, account: NewAccount) -> Result<users::Model, IdentityError>;

    /// Completes the activation handshake for `email` with `code`.
    async fn verify_account(&self, email: &str, code: &str)
    -> Result<users::Model, IdentityError>;

    /// Issues a password reset code for an active account.
    async fn request_password_reset(&self, email: &str) -> Result<(), IdentityError>;

    /// Consumes a reset code and installs a new password, revoking
    /// outstanding tokens.
    async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), IdentityError>;

    /// Changes the password of a logged-in user after re-verifying the
    /// current one; rotates the auth key.
    async fn change_password(
        &self,
        user: users::Model,
        current_password: &str,
        new_password: &str,
    ) -> Result<users::Model, IdentityError>;
}
