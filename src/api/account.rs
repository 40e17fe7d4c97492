//! Endpoints for the logged-in user's own account.

use axum::{Json, extract::State};
use serde::Deserialize;

use super::AppState;
use super::auth::Identity;
use super::error::ApiError;
use super::types::{ApiResponse, MessageResponse, ProfileDto};

pub async fn me(Identity(user): Identity) -> Json<ApiResponse<ProfileDto>> {
    Json(ApiResponse::success(ProfileDto::from(&user)))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

pub async fn change_password(
    State(state): State<AppState>,
    Identity(user): Identity,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .user_service()
        .change_password(user, &payload.current_password, &payload.new_password)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Password changed",
    ))))
}
