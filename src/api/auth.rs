//! Bearer-token middleware and the login/logout endpoints.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use tracing::Span;

use super::AppState;
use super::error::ApiError;
use super::types::{ApiResponse, AuthDto, LoginResponse, MessageResponse, UserDto};
use crate::entities::users;

/// Authenticated user attached to the request by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct Identity(pub users::Model);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(ApiError::TokenInvalidated)
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::TokenInvalidated)
}

fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

/// Verifies the bearer token and resolves it to a live account. The
/// account lands in request extensions for downstream extractors.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?;

    let claims = state.token_issuer().decode(token)?;

    let user = state
        .identity_service()
        .resolve_claims(&claims.jti, claims.role)
        .await?;

    Span::current().record("user_id", user.id);

    request.extensions_mut().insert(Identity(user));

    Ok(next.run(request).await)
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let ip = client_ip(&headers);

    let session = state
        .identity_service()
        .login(&payload.email, &payload.password, ip)
        .await?;

    let response = LoginResponse {
        auth: AuthDto::from(session.token),
        user: UserDto::from(&session.user),
    };

    Ok(Json(ApiResponse::success(response)))
}

pub async fn logout(
    State(state): State<AppState>,
    Identity(user): Identity,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.identity_service().logout(user).await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Logged out",
    ))))
}
