//! # Sold Stock Repository
//!
//! Database operations for the sold ledger.
//!
//! Rows here are snapshots taken at the moment of sale; the only mutations
//! are an insert (sell transition), a cost correction (report edit), and a
//! delete (sale reversal, or the compensating action when the sell
//! transition's delete step fails).

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use teddy_core::SoldStockItem;

const SOLD_COLUMNS: &str = "id, original_id, code, phone, imei, storage, colour, description, \
     buy_date, cost_cents, sell_price_cents, sell_date, created_at";

/// Repository for sold ledger operations.
#[derive(Debug, Clone)]
pub struct SoldStockRepository {
    pool: SqlitePool,
}

impl SoldStockRepository {
    /// Creates a new SoldStockRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SoldStockRepository { pool }
    }

    /// Lists sold items, most recent sale first.
    pub async fn list(&self) -> DbResult<Vec<SoldStockItem>> {
        let items = sqlx::query_as::<_, SoldStockItem>(&format!(
            "SELECT {SOLD_COLUMNS} FROM sold_stocks ORDER BY sell_date DESC, created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets a sold item by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<SoldStockItem>> {
        let item = sqlx::query_as::<_, SoldStockItem>(&format!(
            "SELECT {SOLD_COLUMNS} FROM sold_stocks WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Inserts a sold snapshot (first step of the sell transition).
    pub async fn insert(&self, item: &SoldStockItem) -> DbResult<()> {
        debug!(code = %item.code, sell_date = %item.sell_date, "Inserting sold item");

        sqlx::query(
            r#"
            INSERT INTO sold_stocks (
                id, original_id, code, phone, imei, storage, colour, description,
                buy_date, cost_cents, sell_price_cents, sell_date, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8,
                ?9, ?10, ?11, ?12, ?13
            )
            "#,
        )
        .bind(&item.id)
        .bind(&item.original_id)
        .bind(&item.code)
        .bind(&item.phone)
        .bind(&item.imei)
        .bind(&item.storage)
        .bind(&item.colour)
        .bind(&item.description)
        .bind(item.buy_date)
        .bind(item.cost_cents)
        .bind(item.sell_price_cents)
        .bind(item.sell_date)
        .bind(item.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Corrects the cost basis of a sold row (report edit-and-resave).
    pub async fn update_cost(&self, id: &str, cost_cents: i64) -> DbResult<()> {
        let result = sqlx::query("UPDATE sold_stocks SET cost_cents = ?2 WHERE id = ?1")
            .bind(id)
            .bind(cost_cents)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sold item", id));
        }

        Ok(())
    }

    /// Deletes a sold row by ID (sale reversal, second step).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting sold item");

        let result = sqlx::query("DELETE FROM sold_stocks WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sold item", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{NaiveDate, Utc};
    use teddy_core::ShopCode;

    fn sold(code: &str, day: u32) -> SoldStockItem {
        SoldStockItem {
            id: uuid::Uuid::new_v4().to_string(),
            original_id: "orig-1".to_string(),
            code: ShopCode::parse(code).unwrap(),
            phone: "iPhone 14".to_string(),
            imei: "123456789012345".to_string(),
            storage: "128GB".to_string(),
            colour: "Black".to_string(),
            description: None,
            buy_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            cost_cents: 8_000_000,
            sell_price_cents: 10_000_000,
            sell_date: NaiveDate::from_ymd_opt(2026, 7, day).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_list_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.sold();

        repo.insert(&sold("0001", 5)).await.unwrap();
        repo.insert(&sold("0002", 20)).await.unwrap();

        let items = repo.list().await.unwrap();
        assert_eq!(items.len(), 2);
        // Most recent sale first
        assert_eq!(items[0].code.as_str(), "TDY-0002");
    }

    #[tokio::test]
    async fn test_update_cost_and_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.sold();

        let item = sold("0001", 5);
        repo.insert(&item).await.unwrap();

        repo.update_cost(&item.id, 7_500_000).await.unwrap();
        let fetched = repo.get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(fetched.cost_cents, 7_500_000);

        repo.delete(&item.id).await.unwrap();
        assert!(repo.get_by_id(&item.id).await.unwrap().is_none());
        assert!(repo.delete(&item.id).await.unwrap_err().is_not_found());
    }
}
