//! # Profit Report Repository
//!
//! Database operations for saved profit reports.
//!
//! ## Storage Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  profit_reports row                                                     │
//! │                                                                         │
//! │  entry lists ──► four JSON TEXT columns (phone/accessory/thabrew/kelan)│
//! │  totals      ──► twelve denormalized INTEGER columns                   │
//! │                                                                         │
//! │  Range statistics, payslips, and analytics read ONLY the totals        │
//! │  columns (as ReportSummary rows) - no JSON deserialization needed.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use teddy_core::{ProfitReport, ReportSummary, ReportTotals};

/// Row shape for the full report; entry lists are JSON text.
#[derive(Debug, sqlx::FromRow)]
struct ReportRow {
    id: String,
    report_date: NaiveDate,
    phone_entries: String,
    accessory_entries: String,
    thabrew_entries: String,
    kelan_entries: String,
    #[sqlx(flatten)]
    totals: ReportTotals,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ReportRow {
    fn into_report(self) -> DbResult<ProfitReport> {
        Ok(ProfitReport {
            id: self.id,
            report_date: self.report_date,
            phone_entries: serde_json::from_str(&self.phone_entries)?,
            accessory_entries: serde_json::from_str(&self.accessory_entries)?,
            thabrew_entries: serde_json::from_str(&self.thabrew_entries)?,
            kelan_entries: serde_json::from_str(&self.kelan_entries)?,
            totals: self.totals,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const REPORT_COLUMNS: &str = "id, report_date, phone_entries, accessory_entries, \
     thabrew_entries, kelan_entries, \
     phone_revenue_cents, phone_cost_cents, phone_profit_cents, \
     accessory_revenue_cents, accessory_cost_cents, accessory_profit_cents, \
     thabrew_phone_cents, thabrew_accessory_cents, thabrew_total_cents, \
     kelan_phone_cents, kelan_accessory_cents, kelan_total_cents, \
     created_at, updated_at";

const SUMMARY_COLUMNS: &str = "id, report_date, phone_profit_cents, accessory_profit_cents, \
     thabrew_total_cents, kelan_total_cents";

/// Repository for profit report operations.
#[derive(Debug, Clone)]
pub struct ProfitReportRepository {
    pool: SqlitePool,
}

impl ProfitReportRepository {
    /// Creates a new ProfitReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProfitReportRepository { pool }
    }

    /// Inserts a new report.
    pub async fn insert(&self, report: &ProfitReport) -> DbResult<()> {
        debug!(id = %report.id, date = %report.report_date, "Inserting profit report");

        let t = &report.totals;

        sqlx::query(
            r#"
            INSERT INTO profit_reports (
                id, report_date,
                phone_entries, accessory_entries, thabrew_entries, kelan_entries,
                phone_revenue_cents, phone_cost_cents, phone_profit_cents,
                accessory_revenue_cents, accessory_cost_cents, accessory_profit_cents,
                thabrew_phone_cents, thabrew_accessory_cents, thabrew_total_cents,
                kelan_phone_cents, kelan_accessory_cents, kelan_total_cents,
                created_at, updated_at
            ) VALUES (
                ?1, ?2,
                ?3, ?4, ?5, ?6,
                ?7, ?8, ?9,
                ?10, ?11, ?12,
                ?13, ?14, ?15,
                ?16, ?17, ?18,
                ?19, ?20
            )
            "#,
        )
        .bind(&report.id)
        .bind(report.report_date)
        .bind(serde_json::to_string(&report.phone_entries)?)
        .bind(serde_json::to_string(&report.accessory_entries)?)
        .bind(serde_json::to_string(&report.thabrew_entries)?)
        .bind(serde_json::to_string(&report.kelan_entries)?)
        .bind(t.phone_revenue_cents)
        .bind(t.phone_cost_cents)
        .bind(t.phone_profit_cents)
        .bind(t.accessory_revenue_cents)
        .bind(t.accessory_cost_cents)
        .bind(t.accessory_profit_cents)
        .bind(t.thabrew_phone_cents)
        .bind(t.thabrew_accessory_cents)
        .bind(t.thabrew_total_cents)
        .bind(t.kelan_phone_cents)
        .bind(t.kelan_accessory_cents)
        .bind(t.kelan_total_cents)
        .bind(report.created_at)
        .bind(report.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Overwrites an existing report (edit-and-resave flow).
    ///
    /// The original `created_at` is preserved; only `updated_at` moves.
    pub async fn update(&self, report: &ProfitReport) -> DbResult<()> {
        debug!(id = %report.id, "Updating profit report");

        let t = &report.totals;

        let result = sqlx::query(
            r#"
            UPDATE profit_reports SET
                report_date = ?2,
                phone_entries = ?3,
                accessory_entries = ?4,
                thabrew_entries = ?5,
                kelan_entries = ?6,
                phone_revenue_cents = ?7,
                phone_cost_cents = ?8,
                phone_profit_cents = ?9,
                accessory_revenue_cents = ?10,
                accessory_cost_cents = ?11,
                accessory_profit_cents = ?12,
                thabrew_phone_cents = ?13,
                thabrew_accessory_cents = ?14,
                thabrew_total_cents = ?15,
                kelan_phone_cents = ?16,
                kelan_accessory_cents = ?17,
                kelan_total_cents = ?18,
                updated_at = ?19
            WHERE id = ?1
            "#,
        )
        .bind(&report.id)
        .bind(report.report_date)
        .bind(serde_json::to_string(&report.phone_entries)?)
        .bind(serde_json::to_string(&report.accessory_entries)?)
        .bind(serde_json::to_string(&report.thabrew_entries)?)
        .bind(serde_json::to_string(&report.kelan_entries)?)
        .bind(t.phone_revenue_cents)
        .bind(t.phone_cost_cents)
        .bind(t.phone_profit_cents)
        .bind(t.accessory_revenue_cents)
        .bind(t.accessory_cost_cents)
        .bind(t.accessory_profit_cents)
        .bind(t.thabrew_phone_cents)
        .bind(t.thabrew_accessory_cents)
        .bind(t.thabrew_total_cents)
        .bind(t.kelan_phone_cents)
        .bind(t.kelan_accessory_cents)
        .bind(t.kelan_total_cents)
        .bind(report.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Profit report", &report.id));
        }

        Ok(())
    }

    /// Gets a full report (entry lists included) by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ProfitReport>> {
        let row = sqlx::query_as::<_, ReportRow>(&format!(
            "SELECT {REPORT_COLUMNS} FROM profit_reports WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ReportRow::into_report).transpose()
    }

    /// Lists report summaries, newest report date first.
    pub async fn list(&self) -> DbResult<Vec<ReportSummary>> {
        let summaries = sqlx::query_as::<_, ReportSummary>(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM profit_reports ORDER BY report_date DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    /// Report summaries inside an inclusive date range, oldest first.
    ///
    /// Feeds range statistics, payslips, and analytics.
    pub async fn summaries_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<ReportSummary>> {
        let summaries = sqlx::query_as::<_, ReportSummary>(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM profit_reports \
             WHERE report_date >= ?1 AND report_date <= ?2 \
             ORDER BY report_date ASC"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    /// Sum of every report's Kelan total (the earned side of the balance).
    pub async fn kelan_total_sum(&self) -> DbResult<i64> {
        let sum: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(kelan_total_cents), 0) FROM profit_reports")
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
    use teddy_core::sale::{AccessorySaleInput, PhoneSaleInput};
    use teddy_core::worksheet::Worksheet;

    fn sample_report(id: &str, day: u32) -> ProfitReport {
        let mut ws = Worksheet::new(NaiveDate::from_ymd_opt(2026, 7, day).unwrap());
        ws.add_phone(PhoneSaleInput {
            model: "iPhone 14".into(),
            imei: "123456789012345".into(),
            colour: "Black".into(),
            owner: "TB".into(),
            code: Some("1234".into()),
            revenue_cents: 10_000_000,
            cost_cents: 8_000_000,
        })
        .unwrap();
        ws.add_accessory(AccessorySaleInput {
            model: "20W Charger".into(),
            revenue_cents: 300_000,
            cost_cents: 200_000,
        })
        .unwrap();
        ws.to_report(id, Utc::now())
    }

    #[tokio::test]
    async fn test_insert_roundtrip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.reports();

        let report = sample_report("r1", 14);
        repo.insert(&report).await.unwrap();

        let fetched = repo.get_by_id("r1").await.unwrap().unwrap();
        assert_eq!(fetched.report_date, report.report_date);
        assert_eq!(fetched.phone_entries.len(), 1);
        assert_eq!(fetched.phone_entries[0].model, "iPhone 14");
        assert_eq!(fetched.thabrew_entries.len(), 4);
        assert_eq!(fetched.totals, report.totals);
    }

    #[tokio::test]
    async fn test_update_overwrites() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.reports();

        let report = sample_report("r1", 14);
        repo.insert(&report).await.unwrap();

        // Re-save with an extra accessory
        let mut ws = Worksheet::from_report(&report);
        ws.add_accessory(AccessorySaleInput {
            model: "Tempered Glass".into(),
            revenue_cents: 150_000,
            cost_cents: 50_000,
        })
        .unwrap();
        let edited = ws.to_report("r1", Utc::now());
        repo.update(&edited).await.unwrap();

        let fetched = repo.get_by_id("r1").await.unwrap().unwrap();
        assert_eq!(fetched.accessory_entries.len(), 2);

        // Updating a missing id is the distinguishable not-found outcome
        let ghost = sample_report("ghost", 15);
        assert!(repo.update(&ghost).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_summaries_and_sums() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.reports();

        repo.insert(&sample_report("r1", 5)).await.unwrap();
        repo.insert(&sample_report("r2", 14)).await.unwrap();
        repo.insert(&sample_report("r3", 25)).await.unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, "r3"); // newest first

        let mid = repo
            .summaries_between(
                NaiveDate::from_ymd_opt(2026, 7, 6).unwrap(),
                NaiveDate::from_ymd_opt(2026, 7, 20).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(mid.len(), 1);
        assert_eq!(mid[0].id, "r2");

        let expected_kelan = sample_report("x", 1).totals.kelan_total_cents * 3;
        assert_eq!(repo.kelan_total_sum().await.unwrap(), expected_kelan);
    }
}
