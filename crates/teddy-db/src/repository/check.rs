//! # Stock Check Repository
//!
//! Persistence for stock audit sessions.
//!
//! Code lists are JSON arrays of canonical `TDY-####` strings. At most one
//! session is in progress at a time in practice, but nothing here enforces
//! that - the audit runner checkpoints after every verification so a
//! session survives a page reload.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use teddy_core::{CheckStatus, ShopCode, StockCheck};

/// Row shape; the code lists are JSON text.
#[derive(Debug, sqlx::FromRow)]
struct CheckRow {
    id: String,
    check_date: NaiveDate,
    checked_by: String,
    snapshot_codes: String,
    verified_codes: String,
    missing_codes: String,
    status: CheckStatus,
    created_at: DateTime<Utc>,
}

impl CheckRow {
    fn into_check(self) -> DbResult<StockCheck> {
        Ok(StockCheck {
            id: self.id,
            check_date: self.check_date,
            checked_by: self.checked_by,
            snapshot_codes: serde_json::from_str(&self.snapshot_codes)?,
            verified_codes: serde_json::from_str(&self.verified_codes)?,
            missing_codes: serde_json::from_str(&self.missing_codes)?,
            status: self.status,
            created_at: self.created_at,
        })
    }
}

const CHECK_COLUMNS: &str = "id, check_date, checked_by, snapshot_codes, verified_codes, \
     missing_codes, status, created_at";

fn codes_json(codes: &[ShopCode]) -> DbResult<String> {
    Ok(serde_json::to_string(codes)?)
}

/// Repository for stock check operations.
#[derive(Debug, Clone)]
pub struct StockCheckRepository {
    pool: SqlitePool,
}

impl StockCheckRepository {
    /// Creates a new StockCheckRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockCheckRepository { pool }
    }

    /// Inserts a freshly started session.
    pub async fn insert(&self, check: &StockCheck) -> DbResult<()> {
        debug!(id = %check.id, items = check.total_items(), "Inserting stock check");

        sqlx::query(
            r#"
            INSERT INTO stock_checks (
                id, check_date, checked_by, snapshot_codes,
                verified_codes, missing_codes, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&check.id)
        .bind(check.check_date)
        .bind(&check.checked_by)
        .bind(codes_json(&check.snapshot_codes)?)
        .bind(codes_json(&check.verified_codes)?)
        .bind(codes_json(&check.missing_codes)?)
        .bind(check.status)
        .bind(check.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Checkpoints an in-progress session's verified list.
    pub async fn update_progress(&self, check: &StockCheck) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE stock_checks SET verified_codes = ?2 WHERE id = ?1 AND status = 'in_progress'",
        )
        .bind(&check.id)
        .bind(codes_json(&check.verified_codes)?)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Stock check", &check.id));
        }

        Ok(())
    }

    /// Freezes a completed session: final lists and status.
    pub async fn complete(&self, check: &StockCheck) -> DbResult<()> {
        debug!(id = %check.id, missing = check.missing_items(), "Completing stock check");

        let result = sqlx::query(
            r#"
            UPDATE stock_checks SET
                verified_codes = ?2,
                missing_codes = ?3,
                status = ?4
            WHERE id = ?1 AND status = 'in_progress'
            "#,
        )
        .bind(&check.id)
        .bind(codes_json(&check.verified_codes)?)
        .bind(codes_json(&check.missing_codes)?)
        .bind(check.status)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Stock check", &check.id));
        }

        Ok(())
    }

    /// The most recent in-progress session, if any.
    pub async fn active(&self) -> DbResult<Option<StockCheck>> {
        let row = sqlx::query_as::<_, CheckRow>(&format!(
            "SELECT {CHECK_COLUMNS} FROM stock_checks \
             WHERE status = 'in_progress' ORDER BY created_at DESC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;

        row.map(CheckRow::into_check).transpose()
    }

    /// All sessions, newest first.
    pub async fn history(&self) -> DbResult<Vec<StockCheck>> {
        let rows = sqlx::query_as::<_, CheckRow>(&format!(
            "SELECT {CHECK_COLUMNS} FROM stock_checks ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CheckRow::into_check).collect()
    }

    /// Gets a session by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<StockCheck>> {
        let row = sqlx::query_as::<_, CheckRow>(&format!(
            "SELECT {CHECK_COLUMNS} FROM stock_checks WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CheckRow::into_check).transpose()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
