//! Account lifecycle events.
//!
//! Each event mutates the in-memory row; persistence is a single repository
//! `save` performed by the calling service.

use chrono::{Duration, Utc};

use crate::domain::credentials::{self, EncryptedPassword};
use crate::entities::users;

/// Reset codes are accepted for three days after they were requested.
pub const RESET_CODE_TTL_DAYS: i64 = 3;

impl users::Model {
    /// New account enters the activation handshake.
    pub fn on_signed_up(&mut self, activation_code: String) {
        let activation = &mut self.metadata.activation;
        activation.code = Some(activation_code);
        activation.pending = true;
        activation.requested_at = Some(Utc::now());
        activation.completed_at = None;
    }

    /// Activation code matched; the account becomes usable.
    pub fn on_activated(&mut self) {
        self.status = users::UserStatus::Active;

        let activation = &mut self.metadata.activation;
        activation.code = None;
        activation.pending = false;
        activation.completed_at = Some(Utc::now());
    }

    /// Successful login clears the failure streak and any revocation flag.
    pub fn on_login(&mut self, ip: Option<String>) {
        let history = &mut self.metadata.logged_in_history;
        history.last_ip = ip;
        history.last_date = Some(Utc::now());
        history.success_count += 1;
        history.failed_count = 0;

        self.metadata.security.token_invalidate = false;
    }

    /// Revoke every outstanding token; optionally rotate the auth key so
    /// even a re-validated token cannot resolve this account.
    pub fn on_logout(&mut self, refresh_auth_key: bool) {
        self.metadata.security.token_invalidate = true;

        if refresh_auth_key {
            self.auth_key = credentials::generate_auth_key();
        }
    }

    /// Install freshly encrypted credentials.
    pub fn set_password(&mut self, encrypted: EncryptedPassword) {
        self.password = encrypted.digest;
        self.password_hash = encrypted.hash;
    }

    /// Voluntary password change by a logged-in user.
    pub fn on_password_update(&mut self) {
        let password = &mut self.metadata.password;
        password.last_updated_at = Some(Utc::now());
        password.updated_count += 1;
    }

    pub fn on_password_reset_request(&mut self, reset_code: String) {
        let password = &mut self.metadata.password;
        password.reset_code = Some(reset_code);
        password.reset_code_requested_at = Some(Utc::now());
    }

    /// Completed reset consumes the code and revokes outstanding tokens.
    pub fn on_password_reset(&mut self) {
        let password = &mut self.metadata.password;
        password.last_reset_at = Some(Utc::now());
        password.reset_code = None;
        password.reset_count += 1;

        self.metadata.security.token_invalidate = true;
    }

    /// A code with no request timestamp counts as expired.
    #[must_use]
    pub fn is_reset_code_expired(&self) -> bool {
        self.metadata
            .password
            .reset_code_requested_at
            .is_none_or(|requested| {
                requested + Duration::days(RESET_CODE_TTL_DAYS) < Utc::now()
            })
    }
}
