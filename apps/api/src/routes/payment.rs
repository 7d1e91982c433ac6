//! Kelan payment handlers: the append-only payout ledger, the running
//! balance, and period-bounded payslips.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use teddy_core::document::Document;
use teddy_core::payout::{build_payslip, Payslip, PayslipPeriod};
use teddy_core::validation::validate_amount_cents;
use teddy_core::KelanPayment;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/payments
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<KelanPayment>>, ApiError> {
    Ok(Json(state.db.payments().list().await?))
}

#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub payment_date: NaiveDate,
    pub amount_cents: i64,
    pub description: Option<String>,
}

/// POST /api/payments
///
/// Append-only: there is no edit or delete of historical payments.
pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<RecordPaymentRequest>,
) -> Result<Json<KelanPayment>, ApiError> {
    validate_amount_cents("amount", req.amount_cents)?;

    let payment = KelanPayment {
        id: Uuid::new_v4().to_string(),
        payment_date: req.payment_date,
        amount_cents: req.amount_cents,
        description: req.description,
        created_at: Utc::now(),
    };

    state.db.payments().insert(&payment).await?;
    Ok(Json(payment))
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub earned_cents: i64,
    pub paid_cents: i64,
    pub balance_cents: i64,
}

/// GET /api/payments/balance
///
/// balance = Σ report kelan_total − Σ payment amount, computed on demand
/// from the stored column sums - never cached or stored itself.
pub async fn balance(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let earned = state.db.reports().kelan_total_sum().await?;
    let paid = state.db.payments().total_paid().await?;

    Ok(Json(BalanceResponse {
        earned_cents: earned,
        paid_cents: paid,
        balance_cents: earned - paid,
    }))
}

#[derive(Debug, Deserialize)]
pub struct PayslipParams {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

async fn load_payslip(state: &AppState, params: &PayslipParams) -> Result<Payslip, ApiError> {
    let period = PayslipPeriod::new(params.start, params.end)?;

    let reports = state
        .db
        .reports()
        .summaries_between(params.start, params.end)
        .await?;
    let payments = state.db.payments().between(params.start, params.end).await?;

    Ok(build_payslip(period, &reports, &payments))
}

/// GET /api/payments/payslip?start=..&end=..
pub async fn payslip(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PayslipParams>,
) -> Result<Json<Payslip>, ApiError> {
    Ok(Json(load_payslip(&state, &params).await?))
}

/// GET /api/payments/payslip/document?start=..&end=..
pub async fn payslip_document(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PayslipParams>,
) -> Result<Json<Document>, ApiError> {
    let slip = load_payslip(&state, &params).await?;
    Ok(Json(Document::payslip(&slip)))
}
