//! Typed JSON payload stored in the `metadata` column of `users`.
//!
//! Field names are camelCase on the wire so rows written by earlier
//! deployments keep deserializing.

use chrono::{DateTime, Utc};
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(default, rename_all = "camelCase")]
pub struct UserMetadata {
    pub language: String,

    pub timezone: String,

    pub security: SecurityMetadata,

    pub activation: ActivationMetadata,

    pub password: PasswordMetadata,

    pub logged_in_history: LoginHistoryMetadata,
}

impl Default for UserMetadata {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            timezone: "UTC".to_string(),
            security: SecurityMetadata::default(),
            activation: ActivationMetadata::default(),
            password: PasswordMetadata::default(),
            logged_in_history: LoginHistoryMetadata::default(),
        }
    }
}

/// Server-side token switches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecurityMetadata {
    /// When set, every previously issued token for this account is rejected
    /// until the next successful login.
    pub token_invalidate: bool,
}

/// Account activation state for the signup/verify handshake.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivationMetadata {
    pub code: Option<String>,

    pub pending: bool,

    pub requested_at: Option<DateTime<Utc>>,

    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PasswordMetadata {
    pub last_reset_at: Option<DateTime<Utc>>,

    pub reset_code: Option<String>,

    pub reset_code_requested_at: Option<DateTime<Utc>>,

    pub reset_count: i64,

    pub last_updated_at: Option<DateTime<Utc>>,

    pub updated_count: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginHistoryMetadata {
    pub last_ip: Option<String>,

    pub last_date: Option<DateTime<Utc>>,

    pub success_count: i64,

    pub failed_count: i64,
}
