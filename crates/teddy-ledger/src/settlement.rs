//! # Report Settlement
//!
//! Saving a profit report and moving its phones out of stock.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  save_report(worksheet, mode)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Aggregate totals, persist the report (insert or overwrite)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. For EVERY phone entry (new save or edit alike):                    │
//! │       locate stock by code, then by IMEI                               │
//! │       ├── found    → sell with the ENTRY's cost and revenue            │
//! │       ├── missing  → skip (already sold, or no usable reference)       │
//! │       └── sell err → skip, keep going (never fatal)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. Report moved vs skipped so the user sees exactly what happened     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stock movement runs for edits too: an entry added during an edit
//! still needs its device moved, and entries whose devices already moved
//! simply come back not-found and land in the skipped list.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use teddy_core::money::Money;
use teddy_core::worksheet::Worksheet;
use teddy_core::{ProfitReport, ShopCode};

use crate::error::LedgerResult;
use crate::gateway::StockGateway;
use crate::transitions::{SaleTerms, StockLedger};

// =============================================================================
// Inputs / Outputs
// =============================================================================

/// Whether this save creates a report or overwrites an existing one.
#[derive(Debug, Clone)]
pub enum SaveMode {
    New,
    Edit { report_id: String },
}

/// Why a phone entry did not move its stock item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// No stock row matched the entry's code or IMEI (commonly: it was
    /// already sold by a previous save of this report).
    NotFound,
    /// The sell transition failed; the device is still in stock.
    TransitionFailed { message: String },
}

/// One phone entry that was skipped during settlement.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedEntry {
    pub model: String,
    pub imei: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// The outcome of a report save: the persisted report plus what happened
/// to each phone's stock item.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementSummary {
    pub report: ProfitReport,
    /// Codes of stock items moved to the sold ledger.
    pub moved: Vec<ShopCode>,
    pub skipped: Vec<SkippedEntry>,
}

impl SettlementSummary {
    pub fn moved_count(&self) -> usize {
        self.moved.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

// =============================================================================
// Settlement
// =============================================================================

impl<G: StockGateway> StockLedger<G> {
    /// Persists the worksheet as a report, then settles its phone entries
    /// against the in-stock ledger.
    ///
    /// Per-entry problems are never fatal: a failed or impossible move
    /// lands in `skipped` and the loop continues. Only a failure to
    /// persist the report itself aborts.
    pub async fn save_report(
        &self,
        worksheet: &Worksheet,
        mode: SaveMode,
    ) -> LedgerResult<SettlementSummary> {
        let now = Utc::now();

        let report = match &mode {
            SaveMode::New => worksheet.to_report(Uuid::new_v4().to_string(), now),
            SaveMode::Edit { report_id } => worksheet.to_report(report_id.clone(), now),
        };

        match &mode {
            SaveMode::New => self.gateway().insert_report(&report).await?,
            SaveMode::Edit { .. } => self.gateway().update_report(&report).await?,
        }

        info!(
            id = %report.id,
            date = %report.report_date,
            phones = report.phone_entries.len(),
            accessories = report.accessory_entries.len(),
            "Profit report saved"
        );

        let mut moved = Vec::new();
        let mut skipped = Vec::new();

        for entry in &report.phone_entries {
            let item = self
                .locate_stock(entry.code.as_ref(), Some(&entry.imei))
                .await?;

            let Some(item) = item else {
                skipped.push(SkippedEntry {
                    model: entry.model.clone(),
                    imei: entry.imei.clone(),
                    reason: SkipReason::NotFound,
                });
                continue;
            };

            let terms = SaleTerms {
                // The entry's figures, not the stock row's stored ones
                cost: Some(Money::from_cents(entry.figures.cost_cents)),
                sell_price: Money::from_cents(entry.figures.revenue_cents),
                sell_date: report.report_date,
            };

            match self.sell(&item, &terms).await {
                Ok(_) => moved.push(item.code.clone()),
                Err(failure) => {
                    warn!(code = %item.code, error = %failure, "Settlement skipped a device");
                    skipped.push(SkippedEntry {
                        model: entry.model.clone(),
                        imei: entry.imei.clone(),
                        reason: SkipReason::TransitionFailed {
                            message: failure.to_string(),
                        },
                    });
                }
            }
        }

        info!(
            moved = moved.len(),
            skipped = skipped.len(),
            "Report settlement finished"
        );

        Ok(SettlementSummary { report, moved, skipped })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::mock::fixtures::stock_item;
    use crate::mock::MockGateway;
    use chrono::NaiveDate;
    use teddy_core::sale::PhoneSaleInput;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 14).unwrap()
    }

    fn phone(code: Option<&str>, imei: &str, revenue: i64, cost: i64) -> PhoneSaleInput {
        PhoneSaleInput {
            model: "iPhone 14".into(),
            imei: imei.into(),
            colour: "Black".into(),
            owner: "TB".into(),
            code: code.map(str::to_string),
            revenue_cents: Money::from_rupees(revenue).cents(),
            cost_cents: Money::from_rupees(cost).cents(),
        }
    }

    #[tokio::test]
    async fn test_save_moves_referenced_phones() {
        let item = stock_item("1234", "123456789012345");
        let ledger = StockLedger::new(MockGateway::new().with_stock(item.clone()));

        let mut ws = Worksheet::new(date());
        ws.add_phone(phone(Some("1234"), "123456789012345", 100_000, 75_000))
            .unwrap();

        let summary = ledger.save_report(&ws, SaveMode::New).await.unwrap();

        assert_eq!(summary.moved_count(), 1);
        assert_eq!(summary.skipped_count(), 0);
        assert_eq!(summary.moved[0].as_str(), "TDY-1234");

        let gw = ledger.gateway();
        assert_eq!(gw.saved_reports().len(), 1);
        assert!(gw.stocks().is_empty());

        // Cost basis comes from the sale entry, not the stock row
        let sold = &gw.sold_items()[0];
        assert_eq!(sold.cost_cents, Money::from_rupees(75_000).cents());
        assert_eq!(sold.sell_price_cents, Money::from_rupees(100_000).cents());
        assert_eq!(sold.sell_date, date());
    }

    #[tokio::test]
    async fn test_save_falls_back_to_imei_lookup() {
        let item = stock_item("1234", "123456789012345");
        let ledger = StockLedger::new(MockGateway::new().with_stock(item));

        // Entry has no code, only the IMEI
        let mut ws = Worksheet::new(date());
        ws.add_phone(phone(None, "123456789012345", 100_000, 80_000)).unwrap();

        let summary = ledger.save_report(&ws, SaveMode::New).await.unwrap();
        assert_eq!(summary.moved_count(), 1);
    }

    #[tokio::test]
    async fn test_unmatched_entries_are_skipped_not_fatal() {
        let item = stock_item("1234", "123456789012345");
        let ledger = StockLedger::new(MockGateway::new().with_stock(item));

        let mut ws = Worksheet::new(date());
        ws.add_phone(phone(Some("1234"), "123456789012345", 100_000, 80_000))
            .unwrap();
        // Customer-supplied phone never existed in stock
        ws.add_phone(phone(None, "999999999999999", 50_000, 45_000)).unwrap();

        let summary = ledger.save_report(&ws, SaveMode::New).await.unwrap();
        assert_eq!(summary.moved_count(), 1);
        assert_eq!(summary.skipped_count(), 1);
        assert_eq!(summary.skipped[0].reason, SkipReason::NotFound);
        assert_eq!(summary.skipped[0].imei, "999999999999999");
    }

    #[tokio::test]
    async fn test_failed_transition_is_skipped_and_loop_continues() {
        let first = stock_item("1111", "111111111111111");
        let second = stock_item("2222", "222222222222222");
        let gw = MockGateway::new().with_stock(first).with_stock(second);
        // First sell's delete fails (compensation eats the sold row)
        gw.fail("delete_stock", 1);
        let ledger = StockLedger::new(gw);

        let mut ws = Worksheet::new(date());
        ws.add_phone(phone(Some("1111"), "111111111111111", 100_000, 80_000))
            .unwrap();
        ws.add_phone(phone(Some("2222"), "222222222222222", 90_000, 70_000))
            .unwrap();

        let summary = ledger.save_report(&ws, SaveMode::New).await.unwrap();

        assert_eq!(summary.moved_count(), 1);
        assert_eq!(summary.moved[0].as_str(), "TDY-2222");
        assert_eq!(summary.skipped_count(), 1);
        assert!(matches!(
            summary.skipped[0].reason,
            SkipReason::TransitionFailed { .. }
        ));

        // The failed device is still in stock, the report still saved
        let gw = ledger.gateway();
        assert_eq!(gw.stocks().len(), 1);
        assert_eq!(gw.saved_reports().len(), 1);
    }

    #[tokio::test]
    async fn test_edit_overwrites_and_resettles() {
        let item = stock_item("1234", "123456789012345");
        let ledger = StockLedger::new(MockGateway::new().with_stock(item));

        let mut ws = Worksheet::new(date());
        ws.add_phone(phone(Some("1234"), "123456789012345", 100_000, 80_000))
            .unwrap();

        let first = ledger.save_report(&ws, SaveMode::New).await.unwrap();
        assert_eq!(first.moved_count(), 1);
        let report_id = first.report.id.clone();

        // Edit-and-resave: the device already moved, so it comes back skipped
        let reloaded = Worksheet::from_report(&first.report);
        let second = ledger
            .save_report(&reloaded, SaveMode::Edit { report_id: report_id.clone() })
            .await
            .unwrap();

        assert_eq!(second.report.id, report_id);
        assert_eq!(second.moved_count(), 0);
        assert_eq!(second.skipped_count(), 1);
        assert_eq!(second.skipped[0].reason, SkipReason::NotFound);

        // Still exactly one report and one sold row
        let gw = ledger.gateway();
        assert_eq!(gw.saved_reports().len(), 1);
        assert_eq!(gw.sold_items().len(), 1);
    }

    #[tokio::test]
    async fn test_edit_of_missing_report_aborts() {
        let ledger = StockLedger::new(MockGateway::new());
        let ws = Worksheet::new(date());

        let err = ledger
            .save_report(&ws, SaveMode::Edit { report_id: "ghost".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Db(e) if e.is_not_found()));
    }
}
