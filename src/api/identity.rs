//! Public account lifecycle endpoints: signup, verification, password
//! reset.

use axum::{Json, extract::State};
use serde::Deserialize;

use super::AppState;
use super::error::ApiError;
use super::types::{ApiResponse, MessageResponse, ProfileDto};
use crate::services::NewAccount;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<ApiResponse<ProfileDto>>, ApiError> {
    let user = state
        .user_service()
        .signup(NewAccount {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok(Json(ApiResponse::success(ProfileDto::from(&user))))
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub email: String,
    pub code: String,
}

pub async fn verify(
    State(state): State<AppState>,
    Json(payload): Json<VerifyRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .user_service()
        .verify_account(&payload.email, &payload.code)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Account verified",
    ))))
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(payload): Json<PasswordResetRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .user_service()
        .request_password_reset(&payload.email)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Password reset requested",
    ))))
}

#[derive(Debug, Deserialize)]
pub struct PasswordReset {
    pub email: String,
    pub code: String,
    pub password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<PasswordReset>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .user_service()
        .reset_password(&payload.email, &payload.code, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Password reset",
    ))))
}
