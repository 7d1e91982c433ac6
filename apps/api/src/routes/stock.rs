//! In-stock and sold ledger handlers.
//!
//! Plain CRUD goes straight to the repositories; anything that MOVES a
//! device between ledgers goes through the saga layer.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use teddy_core::money::Money;
use teddy_core::validation::{require, validate_amount_cents, validate_imei};
use teddy_core::{ShopCode, SoldStockItem, StockItem, StockState};
use teddy_db::{StockListQuery, StockSort};
use teddy_ledger::{ReturnTerms, SaleTerms};

use crate::auth::{AdminUser, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Listing
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub min_retail_cents: Option<i64>,
    pub max_retail_cents: Option<i64>,
    /// `buy_date_desc` (default) | `buy_date_asc` | `code_asc`
    pub sort: Option<String>,
}

fn parse_sort(raw: Option<&str>) -> Result<StockSort, ApiError> {
    match raw {
        None | Some("buy_date_desc") => Ok(StockSort::BuyDateDesc),
        Some("buy_date_asc") => Ok(StockSort::BuyDateAsc),
        Some("code_asc") => Ok(StockSort::CodeAsc),
        Some(other) => Err(ApiError::validation(format!("Unknown sort '{}'", other))),
    }
}

/// GET /api/stocks
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<StockItem>>, ApiError> {
    let query = StockListQuery {
        search: params.search,
        min_retail_cents: params.min_retail_cents,
        max_retail_cents: params.max_retail_cents,
        sort: parse_sort(params.sort.as_deref())?,
    };

    Ok(Json(state.db.stocks().list(&query).await?))
}

/// GET /api/stocks/{id}
pub async fn get_one(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StockItem>, ApiError> {
    let item = state
        .db
        .stocks()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Stock item", &id))?;

    Ok(Json(item))
}

// =============================================================================
// Intake & Edit
// =============================================================================

/// Request body shared by create and update. The code is normalized
/// (`1234` → `TDY-1234`) before anything is stored.
#[derive(Debug, Deserialize)]
pub struct StockItemRequest {
    pub code: String,
    pub phone: String,
    pub imei: String,
    pub storage: String,
    pub colour: String,
    pub description: Option<String>,
    pub buy_date: NaiveDate,
    pub cost_cents: i64,
    pub wholesale_cents: i64,
    pub retail_cents: i64,
    pub return_date: Option<NaiveDate>,
}

impl StockItemRequest {
    fn validate(&self) -> Result<ShopCode, ApiError> {
        let code = ShopCode::parse(&self.code)?;
        require("phone", &self.phone)?;
        validate_imei(&self.imei)?;
        require("storage", &self.storage)?;
        require("colour", &self.colour)?;
        validate_amount_cents("cost", self.cost_cents)?;
        validate_amount_cents("wholesale price", self.wholesale_cents)?;
        validate_amount_cents("retail price", self.retail_cents)?;
        Ok(code)
    }
}

/// POST /api/stocks
pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<StockItemRequest>,
) -> Result<Json<StockItem>, ApiError> {
    let code = req.validate()?;
    let now = Utc::now();

    let item = StockItem {
        id: Uuid::new_v4().to_string(),
        code,
        phone: req.phone.trim().to_string(),
        imei: req.imei.trim().to_string(),
        storage: req.storage.trim().to_string(),
        colour: req.colour.trim().to_string(),
        description: req.description,
        buy_date: req.buy_date,
        cost_cents: req.cost_cents,
        wholesale_cents: req.wholesale_cents,
        retail_cents: req.retail_cents,
        state: StockState::InStock,
        return_date: req.return_date,
        last_checked_at: None,
        created_at: now,
        updated_at: now,
    };

    state.db.stocks().insert(&item).await?;
    Ok(Json(item))
}

/// PUT /api/stocks/{id}
pub async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<StockItemRequest>,
) -> Result<Json<StockItem>, ApiError> {
    let code = req.validate()?;

    let existing = state
        .db
        .stocks()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Stock item", &id))?;

    let item = StockItem {
        code,
        phone: req.phone.trim().to_string(),
        imei: req.imei.trim().to_string(),
        storage: req.storage.trim().to_string(),
        colour: req.colour.trim().to_string(),
        description: req.description,
        buy_date: req.buy_date,
        cost_cents: req.cost_cents,
        wholesale_cents: req.wholesale_cents,
        retail_cents: req.retail_cents,
        return_date: req.return_date,
        updated_at: Utc::now(),
        ..existing
    };

    state.db.stocks().update(&item).await?;
    Ok(Json(item))
}

/// DELETE /api/stocks/{id} (admin)
pub async fn remove(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.stocks().delete(&id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

// =============================================================================
// Transitions
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SellRequest {
    pub sell_price_cents: i64,
    pub sell_date: NaiveDate,
    /// Cost basis override; falls back to the stock row's cost.
    pub cost_cents: Option<i64>,
}

/// POST /api/stocks/{id}/sell
pub async fn sell(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SellRequest>,
) -> Result<Json<SoldStockItem>, ApiError> {
    validate_amount_cents("sell price", req.sell_price_cents)?;

    let item = state
        .db
        .stocks()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Stock item", &id))?;

    let terms = SaleTerms {
        cost: req.cost_cents.map(Money::from_cents),
        sell_price: Money::from_cents(req.sell_price_cents),
        sell_date: req.sell_date,
    };

    let sold = state.ledger.sell(&item, &terms).await?;
    Ok(Json(sold))
}

/// GET /api/sold
pub async fn sold_list(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<SoldStockItem>>, ApiError> {
    Ok(Json(state.db.sold().list().await?))
}

#[derive(Debug, Deserialize)]
pub struct ReturnRequest {
    pub cost_cents: Option<i64>,
    pub wholesale_cents: Option<i64>,
    pub retail_cents: Option<i64>,
    pub return_date: Option<NaiveDate>,
}

/// POST /api/sold/{id}/return
///
/// Reverses a sale. If the sold-row delete fails after the stock insert,
/// the device is left duplicated and the error says so - see the ledger
/// crate for why that trade-off is deliberate.
pub async fn return_from_sold(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReturnRequest>,
) -> Result<Json<StockItem>, ApiError> {
    let sold = state
        .db
        .sold()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Sold item", &id))?;

    let terms = ReturnTerms {
        cost: req.cost_cents.map(Money::from_cents),
        wholesale: req.wholesale_cents.map(Money::from_cents),
        retail: req.retail_cents.map(Money::from_cents),
        return_date: req.return_date,
    };

    let item = state.ledger.return_from_sold(&sold, &terms).await?;
    Ok(Json(item))
}
