//! Login and session handlers.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use teddy_core::UserAccount;

use crate::auth::{verify_password, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserAccount,
}

/// POST /api/auth/login
///
/// The failure message deliberately doesn't distinguish an unknown email
/// from a wrong password.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .db
        .users()
        .get_by_email(req.email.trim())
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let token = state.tokens.issue(&user)?;

    tracing::info!(user = %user.email, "User logged in");
    Ok(Json(LoginResponse { token, user }))
}

/// GET /api/auth/me
pub async fn me(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserAccount>, ApiError> {
    let account = state
        .db
        .users()
        .get_by_id(&user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", &user.id))?;

    Ok(Json(account))
}
