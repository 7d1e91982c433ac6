//! # Repair Repository
//!
//! Database operations for the repair ledger.
//!
//! A row here means the device is OUT of the in-stock ledger and with a
//! repair person. The issue transition inserts here then deletes the stock
//! row; the receive transition does the reverse.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use teddy_core::{RepairRecord, ShopCode};

const REPAIR_COLUMNS: &str = "id, code, phone, imei, storage, colour, description, buy_date, \
     cost_cents, wholesale_cents, retail_cents, repair_description, \
     issue_date, person, created_at";

/// Repository for repair ledger operations.
#[derive(Debug, Clone)]
pub struct RepairRepository {
    pool: SqlitePool,
}

impl RepairRepository {
    /// Creates a new RepairRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RepairRepository { pool }
    }

    /// Lists repair records, most recently issued first.
    pub async fn list(&self) -> DbResult<Vec<RepairRecord>> {
        let records = sqlx::query_as::<_, RepairRecord>(&format!(
            "SELECT {REPAIR_COLUMNS} FROM repairs ORDER BY issue_date DESC, created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Gets a repair record by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<RepairRecord>> {
        let record = sqlx::query_as::<_, RepairRecord>(&format!(
            "SELECT {REPAIR_COLUMNS} FROM repairs WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Gets a repair record by shop code.
    pub async fn get_by_code(&self, code: &ShopCode) -> DbResult<Option<RepairRecord>> {
        let record = sqlx::query_as::<_, RepairRecord>(&format!(
            "SELECT {REPAIR_COLUMNS} FROM repairs WHERE code = ?1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Gets a repair record by IMEI.
    pub async fn get_by_imei(&self, imei: &str) -> DbResult<Option<RepairRecord>> {
        let record = sqlx::query_as::<_, RepairRecord>(&format!(
            "SELECT {REPAIR_COLUMNS} FROM repairs WHERE imei = ?1"
        ))
        .bind(imei)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Inserts a repair record (first step of the issue transition).
    pub async fn insert(&self, record: &RepairRecord) -> DbResult<()> {
        debug!(code = %record.code, person = %record.person, "Inserting repair record");

        sqlx::query(
            r#"
            INSERT INTO repairs (
                id, code, phone, imei, storage, colour, description, buy_date,
                cost_cents, wholesale_cents, retail_cents,
                repair_description, issue_date, person, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8,
                ?9, ?10, ?11,
                ?12, ?13, ?14, ?15
            )
            "#,
        )
        .bind(&record.id)
        .bind(&record.code)
        .bind(&record.phone)
        .bind(&record.imei)
        .bind(&record.storage)
        .bind(&record.colour)
        .bind(&record.description)
        .bind(record.buy_date)
        .bind(record.cost_cents)
        .bind(record.wholesale_cents)
        .bind(record.retail_cents)
        .bind(&record.repair_description)
        .bind(record.issue_date)
        .bind(&record.person)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a repair record by ID (receive transition, second step; also
    /// the compensating action when the issue transition's delete fails).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting repair record");

        let result = sqlx::query("DELETE FROM repairs WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Repair record", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
