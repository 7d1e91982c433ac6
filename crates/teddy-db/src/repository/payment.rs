//! # Kelan Payment Repository
//!
//! Append-only payout ledger for the minority stakeholder.
//!
//! There is deliberately no update or delete: the balance is always
//! reconstructible as earned minus paid, and history stays auditable.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use teddy_core::KelanPayment;

const PAYMENT_COLUMNS: &str = "id, payment_date, amount_cents, description, created_at";

/// Repository for Kelan payment operations.
#[derive(Debug, Clone)]
pub struct KelanPaymentRepository {
    pool: SqlitePool,
}

impl KelanPaymentRepository {
    /// Creates a new KelanPaymentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KelanPaymentRepository { pool }
    }

    /// Records a payout.
    pub async fn insert(&self, payment: &KelanPayment) -> DbResult<()> {
        debug!(date = %payment.payment_date, amount = payment.amount_cents, "Recording Kelan payment");

        sqlx::query(
            r#"
            INSERT INTO kelan_payments (id, payment_date, amount_cents, description, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&payment.id)
        .bind(payment.payment_date)
        .bind(payment.amount_cents)
        .bind(&payment.description)
        .bind(payment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists payments, most recent first.
    pub async fn list(&self) -> DbResult<Vec<KelanPayment>> {
        let payments = sqlx::query_as::<_, KelanPayment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM kelan_payments ORDER BY payment_date DESC, created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Payments inside an inclusive date range, oldest first (payslips).
    pub async fn between(&self, start: NaiveDate, end: NaiveDate) -> DbResult<Vec<KelanPayment>> {
        let payments = sqlx::query_as::<_, KelanPayment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM kelan_payments \
             WHERE payment_date >= ?1 AND payment_date <= ?2 \
             ORDER BY payment_date ASC"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Sum of every payout (the paid side of the balance).
    pub async fn total_paid(&self) -> DbResult<i64> {
        let sum: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(amount_cents), 0) FROM kelan_payments")
                .fetch_one(&self.pool)
                .await?;

        Ok(sum)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;

    fn payment(day: u32, rupees: i64) -> KelanPayment {
        KelanPayment {
            id: uuid::Uuid::new_v4().to_string(),
            payment_date: NaiveDate::from_ymd_opt(2026, 7, day).unwrap(),
            amount_cents: rupees * 100,
            description: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_list_and_sum() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.payments();

        repo.insert(&payment(5, 3_000)).await.unwrap();
        repo.insert(&payment(20, 2_000)).await.unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].amount_cents, 200_000); // newest first

        assert_eq!(repo.total_paid().await.unwrap(), 500_000);
    }

    #[tokio::test]
    async fn test_between_is_inclusive() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.payments();

        repo.insert(&payment(4, 100)).await.unwrap();
        repo.insert(&payment(5, 200)).await.unwrap();
        repo.insert(&payment(10, 300)).await.unwrap();
        repo.insert(&payment(11, 400)).await.unwrap();

        let slice = repo
            .between(
                NaiveDate::from_ymd_opt(2026, 7, 5).unwrap(),
                NaiveDate::from_ymd_opt(2026, 7, 10).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(slice.len(), 2);
        assert_eq!(slice[0].amount_cents, 20_000); // oldest first
    }
}
