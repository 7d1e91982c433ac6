//! # API Routes
//!
//! Route table for the Teddy Mobile API. Handlers declare their access
//! level through extractors: `AuthUser` for any signed-in staff member,
//! `AdminUser` for destructive and user-management endpoints.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  /api/auth        login, me                                             │
//! │  /api/stocks      list/create/get/update/delete, sell                  │
//! │  /api/sold        list, return                                         │
//! │  /api/repairs     list, issue, receive                                 │
//! │  /api/reports     save+settle, list, get, stats, analytics, document   │
//! │  /api/payments    list, record, balance, payslip (+document)           │
//! │  /api/checks      start, verify, complete, active, history, document   │
//! │  /api/users       admin-gated account management                       │
//! │  /api/preferences per-user preference records                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod check;
pub mod payment;
pub mod preference;
pub mod repair;
pub mod report;
pub mod stock;
pub mod user;

use axum::routing::{get, post, put};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        // auth
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        // in-stock ledger
        .route("/api/stocks", get(stock::list).post(stock::create))
        .route(
            "/api/stocks/{id}",
            get(stock::get_one).put(stock::update).delete(stock::remove),
        )
        .route("/api/stocks/{id}/sell", post(stock::sell))
        // sold ledger
        .route("/api/sold", get(stock::sold_list))
        .route("/api/sold/{id}/return", post(stock::return_from_sold))
        // repair ledger
        .route("/api/repairs", get(repair::list).post(repair::issue))
        .route("/api/repairs/receive", post(repair::receive))
        // profit reports
        .route("/api/reports", get(report::list).post(report::save))
        .route("/api/reports/stats", get(report::stats))
        .route("/api/reports/analytics", get(report::analytics))
        .route("/api/reports/{id}", get(report::get_one))
        .route("/api/reports/{id}/document", get(report::document))
        // kelan payments
        .route("/api/payments", get(payment::list).post(payment::create))
        .route("/api/payments/balance", get(payment::balance))
        .route("/api/payments/payslip", get(payment::payslip))
        .route("/api/payments/payslip/document", get(payment::payslip_document))
        // stock checks
        .route("/api/checks", get(check::history).post(check::start))
        .route("/api/checks/active", get(check::active))
        .route("/api/checks/{id}", get(check::get_one))
        .route("/api/checks/{id}/verify", post(check::verify))
        .route("/api/checks/{id}/complete", post(check::complete))
        .route("/api/checks/{id}/document", get(check::document))
        // user management (admin)
        .route("/api/users", get(user::list).post(user::create))
        .route("/api/users/{id}", put(user::update).delete(user::remove))
        // preferences
        .route("/api/preferences", get(preference::list))
        .route(
            "/api/preferences/{key}",
            get(preference::get_one).put(preference::put),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe: process up, database reachable, schema current.
async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    let db_ok = state.db.health_check().await;
    let migrations = state.db.migration_status().await.ok();
    let schema_current = migrations.map(|m| m.is_current()).unwrap_or(false);

    Json(serde_json::json!({
        "status": if db_ok && schema_current { "ok" } else { "degraded" },
        "database": db_ok,
        "migrations": migrations,
    }))
}
