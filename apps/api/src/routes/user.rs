//! Staff account management. Every endpoint here is admin-gated - these
//! are the privileged identity operations.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use teddy_core::validation::require;
use teddy_core::{Role, UserAccount};

use crate::auth::{hash_password, AdminUser};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/users (admin)
pub async fn list(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserAccount>>, ApiError> {
    Ok(Json(state.db.users().list().await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: Role,
}

/// POST /api/users (admin)
pub async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<UserAccount>, ApiError> {
    let email = require("email", &req.email)?;
    let display_name = require("display name", &req.display_name)?;
    require("password", &req.password)?;

    let user = UserAccount {
        id: Uuid::new_v4().to_string(),
        email,
        password_hash: hash_password(&req.password)?,
        display_name,
        role: req.role,
        created_at: Utc::now(),
    };

    state.db.users().insert(&user).await?;

    tracing::info!(email = %user.email, role = ?user.role, "User account created");
    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: String,
    pub display_name: String,
    pub role: Role,
    /// When present, resets the password.
    pub password: Option<String>,
}

/// PUT /api/users/{id} (admin)
pub async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserAccount>, ApiError> {
    let email = require("email", &req.email)?;
    let display_name = require("display name", &req.display_name)?;

    let existing = state
        .db
        .users()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", &id))?;

    let password_hash = match req.password.as_deref().map(str::trim) {
        Some(plain) if !plain.is_empty() => hash_password(plain)?,
        _ => existing.password_hash.clone(),
    };

    let user = UserAccount {
        email,
        display_name,
        role: req.role,
        password_hash,
        ..existing
    };

    state.db.users().update(&user).await?;
    Ok(Json(user))
}

/// DELETE /api/users/{id} (admin)
///
/// Admins cannot delete their own account - locking everyone out of user
/// management takes deliberate effort.
pub async fn remove(
    admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if admin.0.id == id {
        return Err(ApiError::validation("You cannot delete your own account"));
    }

    state.db.users().delete(&id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}
