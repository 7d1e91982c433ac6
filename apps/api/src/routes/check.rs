//! Stock check handlers, driving the audit runner.

use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use teddy_core::audit::VerifyOutcome;
use teddy_core::document::Document;
use teddy_core::StockCheck;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StartCheckRequest {
    pub check_date: NaiveDate,
}

/// POST /api/checks
///
/// Snapshots the current in-stock codes and opens a session; the caller's
/// identity is recorded as the checker.
pub async fn start(
    user: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<StartCheckRequest>,
) -> Result<Json<StockCheck>, ApiError> {
    let check = state.audits.start(req.check_date, &user.id).await?;
    Ok(Json(check))
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    /// Raw scan/entry: shop code in any accepted shape, or an IMEI.
    pub entry: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub check: StockCheck,
    pub outcome: VerifyOutcome,
}

/// POST /api/checks/{id}/verify
///
/// Not-found and already-verified are 200 responses with the outcome in
/// the body - they're expected events during a count, not errors.
pub async fn verify(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let check = state
        .db
        .checks()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Stock check", &id))?;

    let (check, outcome) = state.audits.verify(&check, &req.entry).await?;
    Ok(Json(VerifyResponse { check, outcome }))
}

/// POST /api/checks/{id}/complete
pub async fn complete(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StockCheck>, ApiError> {
    let check = state
        .db
        .checks()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Stock check", &id))?;

    let done = state.audits.complete(&check).await?;
    Ok(Json(done))
}

/// GET /api/checks/active
///
/// The in-progress session to resume after a page reload, if any.
pub async fn active(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Option<StockCheck>>, ApiError> {
    Ok(Json(state.db.checks().active().await?))
}

/// GET /api/checks
pub async fn history(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<StockCheck>>, ApiError> {
    Ok(Json(state.db.checks().history().await?))
}

/// GET /api/checks/{id}
pub async fn get_one(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StockCheck>, ApiError> {
    let check = state
        .db
        .checks()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Stock check", &id))?;

    Ok(Json(check))
}

/// GET /api/checks/{id}/document
pub async fn document(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    let check = state
        .db
        .checks()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Stock check", &id))?;

    Ok(Json(Document::stock_check(&check)))
}
