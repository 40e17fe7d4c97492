//! `SeaORM` implementation of the `UserService` trait.

use async_trait::async_trait;
use chrono::Utc;
use tokio::task;
use tracing::info;

use crate::config::SecurityConfig;
use crate::db::{NewUser, Store};
use crate::domain::credentials::{self, EncryptedPassword};
use crate::domain::validation::{self, FieldError};
use crate::entities::user_metadata::UserMetadata;
use crate::entities::users::{self, UserRole, UserStatus};
use crate::services::identity_service::IdentityError;
use crate::services::identity_service_impl::guard_status;
use crate::services::user_service::{NewAccount, UserService};

pub struct SeaOrmUserService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    async fn encrypt(&self, password: &str) -> Result<EncryptedPassword, IdentityError> {
        let password = password.to_string();
        let security = self.security.clone();

        task::spawn_blocking(move || credentials::encrypt_password(&password, &security))
            .await
            .map_err(|e| IdentityError::Internal(e.to_string()))?
            .map_err(IdentityError::from)
    }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn signup(&self, account: NewAccount) -> Result<users::Model, IdentityError> {
        let email = account.email.trim().to_lowercase();

        let mut errors = validation::validate_signup(
            &account.first_name,
            &account.last_name,
            &email,
            &account.password,
        );

        if errors.is_empty() && self.store.user_email_exists(&email).await? {
            errors.push(FieldError::new("email", "Already registered"));
        }

        if !errors.is_empty() {
            return Err(IdentityError::Validation(errors));
        }

        let encrypted = self.encrypt(&account.password).await?;
        let activation_code = credentials::generate_one_time_code();

        let mut metadata = UserMetadata::default();
        metadata.activation.code = Some(activation_code);
        metadata.activation.pending = true;
        metadata.activation.requested_at = Some(Utc::now());

        let user = self
            .store
            .insert_user(NewUser {
                email,
                password: encrypted.digest,
                password_hash: encrypted.hash,
                auth_key: credentials::generate_auth_key(),
                first_name: account.first_name,
                last_name: account.last_name,
                role: UserRole::User,
                status: UserStatus::Inactive,
                metadata,
            })
            .await?;

        info!(user_id = user.id, "Account created, pending verification");

        Ok(user)
    }

    async fn verify_account(
        &self,
        email: &str,
        code: &str,
    ) -> Result<users::Model, IdentityError> {
        let email = email.trim().to_lowercase();

        let mut user = self
            .store
            .find_user_by_email_and_activation_code(&email, code)
            .await?
            .ok_or_else(|| IdentityError::NotFound("Account".to_string()))?;

        user.on_activated();

        let user = self
            .store
            .save_user(user)
            .await?
            .ok_or_else(|| IdentityError::ProcessFailed("account verification".to_string()))?;

        info!(user_id = user.id, "Account verified");

        Ok(user)
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), IdentityError> {
        let email = email.trim().to_lowercase();

        let mut user = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| IdentityError::NotFound("Account".to_string()))?;

        guard_status(user.status)?;

        user.on_password_reset_request(credentials::generate_one_time_code());

        let user_id = user.id;

        self.store
            .save_user(user)
            .await?
            .ok_or_else(|| IdentityError::ProcessFailed("reset request".to_string()))?;

        info!(user_id, "Password reset requested");

        Ok(())
    }

    async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), IdentityError> {
        let email = email.trim().to_lowercase();

        let mut user = self
            .store
            .find_user_by_email_and_reset_code(&email, code)
            .await?
            .ok_or_else(|| IdentityError::NotFound("Account".to_string()))?;

        if user.is_reset_code_expired() {
            return Err(IdentityError::ExpiredCode);
        }

        if let Some(error) = validation::validate_password(new_password) {
            return Err(IdentityError::Validation(vec![error]));
        }

        let encrypted = self.encrypt(new_password).await?;
        user.set_password(encrypted);
        user.on_password_reset();

        let user_id = user.id;

        self.store
            .save_user(user)
            .await?
            .ok_or_else(|| IdentityError::ProcessFailed("password reset".to_string()))?;

        info!(user_id, "Password reset completed");

        Ok(())
    }

    async fn change_password(
        &self,
        mut user: users::Model,
        current_password: &str,
        new_password: &str,
    ) -> Result<users::Model, IdentityError> {
        if let Some(error) = validation::validate_password(new_password) {
            return Err(IdentityError::Validation(vec![error]));
        }

        if current_password == new_password {
            return Err(IdentityError::Validation(vec![FieldError::new(
                "password",
                "New password must be different from the current one",
            )]));
        }

        let stored_hash = user.password_hash.clone();
        let current = current_password.to_string();

        let is_valid =
            task::spawn_blocking(move || credentials::validate_password(&current, &stored_hash))
                .await
                .map_err(|e| IdentityError::Internal(e.to_string()))?;

        if !is_valid {
            return Err(IdentityError::Validation(vec![FieldError::new(
                "current_password",
                "Current password is incorrect",
            )]));
        }

        let encrypted = self.encrypt(new_password).await?;
        user.set_password(encrypted);
        user.on_password_update();

        // New credentials mean new tokens; rotate the revocation handle
        user.auth_key = credentials::generate_auth_key();

        let user = self
            .store
            .save_user(user)
            .await?
            .ok_or_else(|| IdentityError::ProcessFailed("password change".to_string()))?;

        info!(user_id = user.id, "Password changed");

        Ok(user)
    }
}
