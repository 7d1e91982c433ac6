//! # Stock Repository
//!
//! Database operations for the in-stock ledger.
//!
//! ## Key Operations
//! - Filtered/sorted listing for the stock page
//! - Lookup by id, shop code, or IMEI (the lookup policy everywhere is
//!   "code first, then IMEI" - both single-row fetches live here)
//! - Insert/update/delete as independent statements for the transitions
//! - `in_stock_codes` snapshot for starting a stock check

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use teddy_core::{ShopCode, StockItem};

/// Sort order for stock listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StockSort {
    /// Newest acquisitions first (the stock page default).
    #[default]
    BuyDateDesc,
    /// Oldest acquisitions first.
    BuyDateAsc,
    /// By shop code, ascending.
    CodeAsc,
}

impl StockSort {
    fn order_clause(self) -> &'static str {
        match self {
            StockSort::BuyDateDesc => " ORDER BY buy_date DESC, code ASC",
            StockSort::BuyDateAsc => " ORDER BY buy_date ASC, code ASC",
            StockSort::CodeAsc => " ORDER BY code ASC",
        }
    }
}

/// Filters for the stock listing.
///
/// ## Example
/// ```rust,ignore
/// // Phones between Rs 50,000 and Rs 150,000 matching "iphone"
/// let query = StockListQuery {
///     search: Some("iphone".into()),
///     min_retail_cents: Some(5_000_000),
///     max_retail_cents: Some(15_000_000),
///     sort: StockSort::BuyDateDesc,
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub struct StockListQuery {
    /// Case-insensitive substring match against code, model, and IMEI.
    pub search: Option<String>,
    /// Inclusive lower bound on retail price.
    pub min_retail_cents: Option<i64>,
    /// Inclusive upper bound on retail price.
    pub max_retail_cents: Option<i64>,
    pub sort: StockSort,
}

const STOCK_COLUMNS: &str = "id, code, phone, imei, storage, colour, description, buy_date, \
     cost_cents, wholesale_cents, retail_cents, state, return_date, \
     last_checked_at, created_at, updated_at";

/// Repository for in-stock ledger operations.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    /// Creates a new StockRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Lists in-stock items with optional search, price bounds, and sort.
    pub async fn list(&self, query: &StockListQuery) -> DbResult<Vec<StockItem>> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {STOCK_COLUMNS} FROM stocks WHERE 1=1"));

        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search);
            qb.push(" AND (code LIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" COLLATE NOCASE OR phone LIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" COLLATE NOCASE OR imei LIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        if let Some(min) = query.min_retail_cents {
            qb.push(" AND retail_cents >= ");
            qb.push_bind(min);
        }

        if let Some(max) = query.max_retail_cents {
            qb.push(" AND retail_cents <= ");
            qb.push_bind(max);
        }

        qb.push(query.sort.order_clause());

        let items = qb.build_query_as::<StockItem>().fetch_all(&self.pool).await?;

        debug!(count = items.len(), "Stock list query returned items");
        Ok(items)
    }

    /// Gets a stock item by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<StockItem>> {
        let item = sqlx::query_as::<_, StockItem>(&format!(
            "SELECT {STOCK_COLUMNS} FROM stocks WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Gets a stock item by its canonical shop code.
    pub async fn get_by_code(&self, code: &ShopCode) -> DbResult<Option<StockItem>> {
        let item = sqlx::query_as::<_, StockItem>(&format!(
            "SELECT {STOCK_COLUMNS} FROM stocks WHERE code = ?1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Gets a stock item by IMEI.
    pub async fn get_by_imei(&self, imei: &str) -> DbResult<Option<StockItem>> {
        let item = sqlx::query_as::<_, StockItem>(&format!(
            "SELECT {STOCK_COLUMNS} FROM stocks WHERE imei = ?1"
        ))
        .bind(imei)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Inserts a new stock item.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - code or IMEI already in stock
    pub async fn insert(&self, item: &StockItem) -> DbResult<()> {
        debug!(code = %item.code, imei = %item.imei, "Inserting stock item");

        sqlx::query(
            r#"
            INSERT INTO stocks (
                id, code, phone, imei, storage, colour, description, buy_date,
                cost_cents, wholesale_cents, retail_cents, state, return_date,
                last_checked_at, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8,
                ?9, ?10, ?11, ?12, ?13,
                ?14, ?15, ?16
            )
            "#,
        )
        .bind(&item.id)
        .bind(&item.code)
        .bind(&item.phone)
        .bind(&item.imei)
        .bind(&item.storage)
        .bind(&item.colour)
        .bind(&item.description)
        .bind(item.buy_date)
        .bind(item.cost_cents)
        .bind(item.wholesale_cents)
        .bind(item.retail_cents)
        .bind(item.state)
        .bind(item.return_date)
        .bind(item.last_checked_at)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing stock item's editable fields.
    pub async fn update(&self, item: &StockItem) -> DbResult<()> {
        debug!(id = %item.id, "Updating stock item");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE stocks SET
                code = ?2,
                phone = ?3,
                imei = ?4,
                storage = ?5,
                colour = ?6,
                description = ?7,
                buy_date = ?8,
                cost_cents = ?9,
                wholesale_cents = ?10,
                retail_cents = ?11,
                return_date = ?12,
                updated_at = ?13
            WHERE id = ?1
            "#,
        )
        .bind(&item.id)
        .bind(&item.code)
        .bind(&item.phone)
        .bind(&item.imei)
        .bind(&item.storage)
        .bind(&item.colour)
        .bind(&item.description)
        .bind(item.buy_date)
        .bind(item.cost_cents)
        .bind(item.wholesale_cents)
        .bind(item.retail_cents)
        .bind(item.return_date)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Stock item", &item.id));
        }

        Ok(())
    }

    /// Deletes a stock item.
    ///
    /// Used both for plain removal and as the second step of the sell/issue
    /// transitions (after the destination row is inserted).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting stock item");

        let result = sqlx::query("DELETE FROM stocks WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Stock item", id));
        }

        Ok(())
    }

    /// Stamps the item as seen by a stock check.
    pub async fn touch_last_checked(&self, id: &str, at: DateTime<Utc>) -> DbResult<()> {
        let result = sqlx::query("UPDATE stocks SET last_checked_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Stock item", id));
        }

        Ok(())
    }

    /// All in-stock codes, for the stock check snapshot.
    pub async fn in_stock_codes(&self) -> DbResult<Vec<ShopCode>> {
        let codes: Vec<ShopCode> =
            sqlx::query_scalar("SELECT code FROM stocks ORDER BY code ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(codes)
    }

    /// Counts in-stock items (for diagnostics and the seed tool).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stocks")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
