//! Response envelope and wire DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::validation::FieldError;
use crate::entities::users::{self, UserRole, UserStatus};
use crate::services::IssuedToken;

/// Uniform JSON envelope for every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
            fields: None,
        }
    }

    pub fn error(
        message: impl Into<String>,
        code: impl Into<String>,
        fields: Option<Vec<FieldError>>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            code: Some(code.into()),
            fields,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Token block of a login response.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthDto {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedToken> for AuthDto {
    fn from(token: IssuedToken) -> Self {
        Self {
            token: token.token,
            issued_at: token.issued_at,
            expires_at: token.expires_at,
        }
    }
}

/// Compact user block of a login response.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserDto {
    pub fullname: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&users::Model> for UserDto {
    fn from(user: &users::Model) -> Self {
        Self {
            fullname: user.fullname(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub auth: AuthDto,
    pub user: UserDto,
}

/// Full profile returned by the `me` endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileDto {
    pub id: i64,
    pub fullname: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&users::Model> for ProfileDto {
    fn from(user: &users::Model) -> Self {
        Self {
            id: user.id,
            fullname: user.fullname(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            role: user.role,
            status: user.status,
            created_at: user.created_at,
        }
    }
}
