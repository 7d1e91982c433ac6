//! Per-user preference handlers.
//!
//! The monthly profit goal, saved payslip period, and similar view
//! settings live here as opaque JSON documents keyed by user and name.

use axum::extract::{Path, State};
use axum::Json;

use teddy_db::Preference;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/preferences
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Preference>>, ApiError> {
    Ok(Json(state.db.preferences().list_for_user(&user.id).await?))
}

/// GET /api/preferences/{key}
pub async fn get_one(
    user: AuthUser,
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Preference>, ApiError> {
    let pref = state
        .db
        .preferences()
        .get(&user.id, &key)
        .await?
        .ok_or_else(|| ApiError::not_found("Preference", &key))?;

    Ok(Json(pref))
}

/// PUT /api/preferences/{key}
///
/// Upserts the value as-is; last write wins.
pub async fn put(
    user: AuthUser,
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(value): Json<serde_json::Value>,
) -> Result<Json<Preference>, ApiError> {
    let pref = state.db.preferences().put(&user.id, &key, &value).await?;
    Ok(Json(pref))
}
