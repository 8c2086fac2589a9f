//! Login, signup and profile handlers.
//!
//! The gateway keeps the bearer token to itself; responses only carry the
//! user record.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use bookbridge_core::backend::ProfileUpdate;
use bookbridge_core::listing::User;

use super::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub authenticated: bool,
    pub user: Option<User>,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.auth().login(&body.email, &body.password).await?;
    Ok(Json(UserResponse { user }))
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state
        .auth()
        .signup(&body.name, &body.email, &body.password)
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.auth().update_profile(&update).await?;
    Ok(Json(UserResponse { user }))
}

pub async fn logout(State(state): State<Arc<AppState>>) -> StatusCode {
    state.auth().logout().await;
    StatusCode::NO_CONTENT
}

pub async fn me(State(state): State<Arc<AppState>>) -> Json<MeResponse> {
    let user = state.auth().current_user().await;
    Json(MeResponse {
        authenticated: user.is_some(),
        user,
    })
}
