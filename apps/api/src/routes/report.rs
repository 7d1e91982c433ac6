//! Profit report handlers: save-and-settle, listing, range statistics,
//! analytics, and the printable document.
//!
//! The frontend keeps the worksheet as working state; saving posts the
//! whole thing. The handler rebuilds a [`Worksheet`] (validating every
//! line - a bad line refuses the save before anything is stored), then
//! hands it to the settlement saga.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use teddy_core::analytics::{range_stats, weekday_profits, RangeStats, WeekdayProfit};
use teddy_core::document::Document;
use teddy_core::money::Money;
use teddy_core::payout::PayslipPeriod;
use teddy_core::sale::{AccessorySaleInput, PhoneSaleInput};
use teddy_core::worksheet::Worksheet;
use teddy_core::{ProfitReport, ReportSummary};
use teddy_ledger::{SaveMode, SettlementSummary};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Save & Settle
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ManualLineInput {
    pub description: String,
    pub amount_cents: i64,
}

#[derive(Debug, Deserialize)]
pub struct SaveReportRequest {
    /// Present for the edit-and-resave flow, absent for a new report.
    pub report_id: Option<String>,
    pub report_date: NaiveDate,
    pub phones: Vec<PhoneSaleInput>,
    pub accessories: Vec<AccessorySaleInput>,
    pub manual_thabrew: Vec<ManualLineInput>,
    pub manual_kelan: Vec<ManualLineInput>,
}

/// POST /api/reports
///
/// Saves the report and settles its phone entries against stock. The
/// response carries the moved/skipped breakdown for the user-facing
/// message.
pub async fn save(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SaveReportRequest>,
) -> Result<Json<SettlementSummary>, ApiError> {
    let mut worksheet = Worksheet::new(req.report_date);

    for phone in req.phones {
        worksheet.add_phone(phone)?;
    }
    for accessory in req.accessories {
        worksheet.add_accessory(accessory)?;
    }
    for line in &req.manual_thabrew {
        worksheet.add_manual_thabrew(&line.description, Money::from_cents(line.amount_cents))?;
    }
    for line in &req.manual_kelan {
        worksheet.add_manual_kelan(&line.description, Money::from_cents(line.amount_cents))?;
    }

    let mode = match req.report_id {
        Some(report_id) => SaveMode::Edit { report_id },
        None => SaveMode::New,
    };

    let summary = state.ledger.save_report(&worksheet, mode).await?;
    Ok(Json(summary))
}

// =============================================================================
// Reads
// =============================================================================

/// GET /api/reports
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ReportSummary>>, ApiError> {
    Ok(Json(state.db.reports().list().await?))
}

/// GET /api/reports/{id}
pub async fn get_one(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProfitReport>, ApiError> {
    let report = state
        .db
        .reports()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profit report", &id))?;

    Ok(Json(report))
}

/// GET /api/reports/{id}/document
pub async fn document(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    let report = state
        .db
        .reports()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profit report", &id))?;

    Ok(Json(Document::profit_report(&report)))
}

// =============================================================================
// Range Statistics & Analytics
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct PeriodParams {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// GET /api/reports/stats?start=..&end=..
pub async fn stats(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> Result<Json<RangeStats>, ApiError> {
    // Validates the range (inverted periods are refused)
    PayslipPeriod::new(params.start, params.end)?;

    let summaries = state
        .db
        .reports()
        .summaries_between(params.start, params.end)
        .await?;

    Ok(Json(range_stats(&summaries)))
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub stats: RangeStats,
    pub weekdays: Vec<WeekdayProfit>,
}

/// GET /api/reports/analytics?start=..&end=..
pub async fn analytics(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    PayslipPeriod::new(params.start, params.end)?;

    let summaries = state
        .db
        .reports()
        .summaries_between(params.start, params.end)
        .await?;

    Ok(Json(AnalyticsResponse {
        stats: range_stats(&summaries),
        weekdays: weekday_profits(&summaries),
    }))
}
