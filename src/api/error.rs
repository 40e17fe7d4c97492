use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::domain::validation::FieldError;
use crate::services::IdentityError;

#[derive(Debug)]
pub enum ApiError {
    Validation(Vec<FieldError>),

    AccessDenied,

    TokenInvalidated,

    AccessRevoked,

    IneligibleRole,

    Forbidden(String),

    Unavailable(String),

    NotFound(String),

    BadRequest(String),

    ProcessFailed(String),

    DatabaseError(String),

    InternalError(String),
}

impl ApiError {
    /// Machine-readable code rendered alongside the message.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "UNPROCESSABLE_ENTITY",
            ApiError::AccessDenied => "ACCESS_DENIED",
            ApiError::TokenInvalidated => "TOKEN_INVALIDATED",
            ApiError::AccessRevoked => "ACCESS_REVOKED",
            ApiError::IneligibleRole => "INELIGIBLE_ROLE",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::Unavailable(_) => "UNAVAILABLE",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ProcessFailed(_) => "PROCESS_FAILED",
            ApiError::DatabaseError(_) => "DB_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    const fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::AccessDenied | ApiError::TokenInvalidated => StatusCode::UNAUTHORIZED,
            ApiError::AccessRevoked | ApiError::IneligibleRole | ApiError::Forbidden(_) => {
                StatusCode::FORBIDDEN
            }
            ApiError::Unavailable(_) => StatusCode::GONE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::ProcessFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::DatabaseError(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(fields) => write!(f, "Validation failed ({} fields)", fields.len()),
            ApiError::AccessDenied => write!(f, "Access denied"),
            ApiError::TokenInvalidated => write!(f, "Token invalidated"),
            ApiError::AccessRevoked => write!(f, "Access revoked"),
            ApiError::IneligibleRole => write!(f, "Ineligible role"),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::Unavailable(msg) => write!(f, "Unavailable: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::ProcessFailed(msg) => write!(f, "Process failed: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let (message, fields) = match self {
            ApiError::Validation(fields) => ("Validation failed".to_string(), Some(fields)),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                ("A database error occurred".to_string(), None)
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("An internal error occurred".to_string(), None)
            }
            other => (other.to_string(), None),
        };

        let body = ApiResponse::<()>::error(message, code, fields);
        (status, Json(body)).into_response()
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::AccessDenied => ApiError::AccessDenied,
            IdentityError::TokenInvalidated => ApiError::TokenInvalidated,
            IdentityError::PendingVerification => {
                ApiError::Forbidden("Account pending verification".to_string())
            }
            IdentityError::AccountDisabled => ApiError::Forbidden("Account disabled".to_string()),
            IdentityError::AccountBlocked => {
                ApiError::Unavailable("Account blocked".to_string())
            }
            IdentityError::AccountRemoved => {
                ApiError::Unavailable("Account no longer available".to_string())
            }
            IdentityError::Revoked => ApiError::AccessRevoked,
            IdentityError::IneligibleRole => ApiError::IneligibleRole,
            IdentityError::NotFound(what) => ApiError::NotFound(what),
            IdentityError::ExpiredCode => ApiError::BadRequest("Code has expired".to_string()),
            IdentityError::Validation(fields) => ApiError::Validation(fields),
            IdentityError::ProcessFailed(msg) => ApiError::ProcessFailed(msg),
            IdentityError::Database(msg) => ApiError::DatabaseError(msg),
            IdentityError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<crate::services::token::TokenError> for ApiError {
    fn from(_: crate::services::token::TokenError) -> Self {
        ApiError::TokenInvalidated
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}
