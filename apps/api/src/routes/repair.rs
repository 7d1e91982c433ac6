//! Repair ledger handlers: issue a device out, receive it back.
//!
//! Both lookups accept whatever the counter types fastest - a shop code in
//! any accepted shape, or a scanned IMEI - and normalize before searching.

use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use teddy_core::audit::AuditQuery;
use teddy_core::{RepairRecord, ShopCode, StockItem};
use teddy_ledger::RepairIntake;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Splits a raw entry into the code/IMEI pair the lookup policy wants.
fn lookup_keys(raw: &str) -> Result<(Option<ShopCode>, Option<String>), ApiError> {
    Ok(match AuditQuery::parse(raw)? {
        AuditQuery::Code(code) => (Some(code), None),
        AuditQuery::Imei(imei) => (None, Some(imei)),
    })
}

/// GET /api/repairs
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<RepairRecord>>, ApiError> {
    Ok(Json(state.db.repairs().list().await?))
}

#[derive(Debug, Deserialize)]
pub struct IssueRequest {
    /// Shop code or IMEI of the device to hand out.
    pub device: String,
    pub person: String,
    pub repair_description: String,
    pub issue_date: NaiveDate,
}

/// POST /api/repairs
///
/// Issue Device: moves an in-stock item to the repair ledger.
pub async fn issue(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<IssueRequest>,
) -> Result<Json<RepairRecord>, ApiError> {
    let (code, imei) = lookup_keys(&req.device)?;

    let item = state
        .ledger
        .locate_stock(code.as_ref(), imei.as_deref())
        .await?
        .ok_or_else(|| ApiError::not_found("Stock item", req.device.trim()))?;

    let intake = RepairIntake {
        person: req.person,
        repair_description: req.repair_description,
        issue_date: req.issue_date,
    };

    let record = state.ledger.issue_repair(&item, &intake).await?;
    Ok(Json(record))
}

#[derive(Debug, Deserialize)]
pub struct ReceiveRequest {
    /// Shop code or IMEI of the device coming back.
    pub device: String,
}

/// POST /api/repairs/receive
///
/// Receive Device: moves a repaired item back to the in-stock ledger.
pub async fn receive(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ReceiveRequest>,
) -> Result<Json<StockItem>, ApiError> {
    let (code, imei) = lookup_keys(&req.device)?;

    let record = state
        .ledger
        .locate_repair(code.as_ref(), imei.as_deref())
        .await?
        .ok_or_else(|| ApiError::not_found("Repair record", req.device.trim()))?;

    let item = state.ledger.receive_repair(&record).await?;
    Ok(Json(item))
}
