//! # Stock Ledger Transitions
//!
//! The four device-lifecycle sagas. Each one is two independent storage
//! steps - insert the destination row, delete the source row - with a
//! defined compensating action when the delete fails:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  transition        insert          delete         compensation         │
//! │  ──────────        ──────          ──────         ────────────         │
//! │  sell              sold_stocks     stocks         delete sold row      │
//! │  return_from_sold  stocks          sold_stocks    NONE (see below)     │
//! │  issue_repair      repairs         stocks         delete repair row    │
//! │  receive_repair    stocks          repairs        delete stock row     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The sold→in-stock reversal performs no compensation on a failed delete:
//! removing the just-inserted stock row could leave the device in NEITHER
//! ledger if the sold row is then lost, so a visible duplicate is preferred
//! to silent loss. The failure still reports
//! [`CompensationOutcome::NotAttempted`] so the caller can flag the
//! duplicate for manual cleanup.
//!
//! Success of a compensating delete is reported but its failure is not
//! retried - every retry in this system is a manual user re-action.

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use teddy_core::money::Money;
use teddy_core::validation::require;
use teddy_core::{RepairRecord, ShopCode, SoldStockItem, StockItem, StockState};
use teddy_db::error::DbResult;

use crate::error::{CompensationOutcome, LedgerError, TransitionFailure, TransitionStep};
use crate::gateway::StockGateway;

// =============================================================================
// Transition Inputs
// =============================================================================

/// Sale context for the in-stock → sold transition.
#[derive(Debug, Clone)]
pub struct SaleTerms {
    /// Cost basis from the sale context (e.g. the report entry). Falls back
    /// to the stock row's own cost when absent.
    pub cost: Option<Money>,
    pub sell_price: Money,
    pub sell_date: NaiveDate,
}

/// Overrides for the sold → in-stock reversal.
///
/// Missing price overrides fall back to the sold snapshot: cost to its cost
/// basis, wholesale and retail to the last sell price.
#[derive(Debug, Clone, Default)]
pub struct ReturnTerms {
    pub cost: Option<Money>,
    pub wholesale: Option<Money>,
    pub retail: Option<Money>,
    pub return_date: Option<NaiveDate>,
}

/// Repair metadata for the in-stock → in-repair transition.
#[derive(Debug, Clone)]
pub struct RepairIntake {
    /// The repair person responsible. Required.
    pub person: String,
    /// What is wrong with the device. Required.
    pub repair_description: String,
    pub issue_date: NaiveDate,
}

// =============================================================================
// Stock Ledger
// =============================================================================

/// Executes the lifecycle sagas over a [`StockGateway`].
///
/// Cheap to clone when the gateway is (the production gateway is a pool
/// handle).
#[derive(Debug, Clone)]
pub struct StockLedger<G> {
    gateway: G,
}

impl<G: StockGateway> StockLedger<G> {
    pub fn new(gateway: G) -> Self {
        StockLedger { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    // =========================================================================
    // Lookup Policy
    // =========================================================================

    /// Locates an in-stock item: exact shop-code match first, IMEI fallback.
    ///
    /// A `None` result is a business outcome, not an error - the caller
    /// decides whether to skip or prompt.
    pub async fn locate_stock(
        &self,
        code: Option<&ShopCode>,
        imei: Option<&str>,
    ) -> DbResult<Option<StockItem>> {
        if let Some(code) = code {
            if let Some(item) = self.gateway.find_stock_by_code(code).await? {
                return Ok(Some(item));
            }
        }

        if let Some(imei) = imei.map(str::trim).filter(|s| !s.is_empty()) {
            if let Some(item) = self.gateway.find_stock_by_imei(imei).await? {
                return Ok(Some(item));
            }
        }

        Ok(None)
    }

    /// Locates a repair record with the same code-then-IMEI policy.
    pub async fn locate_repair(
        &self,
        code: Option<&ShopCode>,
        imei: Option<&str>,
    ) -> DbResult<Option<RepairRecord>> {
        if let Some(code) = code {
            if let Some(record) = self.gateway.find_repair_by_code(code).await? {
                return Ok(Some(record));
            }
        }

        if let Some(imei) = imei.map(str::trim).filter(|s| !s.is_empty()) {
            if let Some(record) = self.gateway.find_repair_by_imei(imei).await? {
                return Ok(Some(record));
            }
        }

        Ok(None)
    }

    // =========================================================================
    // in_stock → sold
    // =========================================================================

    /// Sells an in-stock item.
    ///
    /// Copies the device snapshot, takes the cost basis from the sale
    /// context (fallback: the stock row's cost), inserts the sold row, then
    /// deletes the stock row. A failed delete triggers a compensating
    /// delete of the just-inserted sold row.
    pub async fn sell(
        &self,
        item: &StockItem,
        terms: &SaleTerms,
    ) -> Result<SoldStockItem, TransitionFailure> {
        let sold = SoldStockItem {
            id: Uuid::new_v4().to_string(),
            original_id: item.id.clone(),
            code: item.code.clone(),
            phone: item.phone.clone(),
            imei: item.imei.clone(),
            storage: item.storage.clone(),
            colour: item.colour.clone(),
            description: item.description.clone(),
            buy_date: item.buy_date,
            cost_cents: terms.cost.unwrap_or_else(|| item.cost()).cents(),
            sell_price_cents: terms.sell_price.cents(),
            sell_date: terms.sell_date,
            created_at: Utc::now(),
        };

        // Step 1: insert the destination row
        if let Err(e) = self.gateway.insert_sold(&sold).await {
            return Err(TransitionFailure {
                transition: "sell",
                step: TransitionStep::InsertDestination,
                source: e,
                compensation: CompensationOutcome::NotAttempted,
            });
        }

        // Step 2: delete the source row; compensate on failure
        if let Err(e) = self.gateway.delete_stock(&item.id).await {
            let compensation = match self.gateway.delete_sold(&sold.id).await {
                Ok(()) => CompensationOutcome::Succeeded,
                Err(comp_err) => {
                    warn!(code = %item.code, error = %comp_err,
                        "sell compensation failed, device present in both ledgers");
                    CompensationOutcome::Failed(comp_err)
                }
            };
            return Err(TransitionFailure {
                transition: "sell",
                step: TransitionStep::DeleteSource,
                source: e,
                compensation,
            });
        }

        info!(code = %item.code, sell_date = %sold.sell_date, "Device moved to sold ledger");
        Ok(sold)
    }

    // =========================================================================
    // sold → in_stock
    // =========================================================================

    /// Reverses a sale, putting the device back in stock.
    ///
    /// No compensation runs if the sold-row delete fails after the stock
    /// insert succeeded: the duplicate is reported and left for manual
    /// cleanup (see the module docs for why).
    pub async fn return_from_sold(
        &self,
        sold: &SoldStockItem,
        terms: &ReturnTerms,
    ) -> Result<StockItem, TransitionFailure> {
        let now = Utc::now();
        let item = StockItem {
            id: Uuid::new_v4().to_string(),
            code: sold.code.clone(),
            phone: sold.phone.clone(),
            imei: sold.imei.clone(),
            storage: sold.storage.clone(),
            colour: sold.colour.clone(),
            description: sold.description.clone(),
            buy_date: sold.buy_date,
            cost_cents: terms.cost.unwrap_or_else(|| sold.cost()).cents(),
            wholesale_cents: terms.wholesale.unwrap_or_else(|| sold.sell_price()).cents(),
            retail_cents: terms.retail.unwrap_or_else(|| sold.sell_price()).cents(),
            state: StockState::InStock,
            return_date: terms.return_date,
            last_checked_at: None,
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = self.gateway.insert_stock(&item).await {
            return Err(TransitionFailure {
                transition: "return_from_sold",
                step: TransitionStep::InsertDestination,
                source: e,
                compensation: CompensationOutcome::NotAttempted,
            });
        }

        if let Err(e) = self.gateway.delete_sold(&sold.id).await {
            warn!(code = %sold.code, error = %e,
                "sold-row delete failed after reinsert, duplicate left for manual cleanup");
            return Err(TransitionFailure {
                transition: "return_from_sold",
                step: TransitionStep::DeleteSource,
                source: e,
                compensation: CompensationOutcome::NotAttempted,
            });
        }

        info!(code = %item.code, "Sale reversed, device back in stock");
        Ok(item)
    }

    // =========================================================================
    // in_stock → in_repair
    // =========================================================================

    /// Issues a device for repair.
    ///
    /// Requires a located stock item plus a non-empty person and repair
    /// description; validation refuses the operation before anything
    /// touches storage.
    pub async fn issue_repair(
        &self,
        item: &StockItem,
        intake: &RepairIntake,
    ) -> Result<RepairRecord, LedgerError> {
        let person = require("person", &intake.person)?;
        let repair_description = require("repair description", &intake.repair_description)?;

        let record = RepairRecord {
            id: Uuid::new_v4().to_string(),
            code: item.code.clone(),
            phone: item.phone.clone(),
            imei: item.imei.clone(),
            storage: item.storage.clone(),
            colour: item.colour.clone(),
            description: item.description.clone(),
            buy_date: item.buy_date,
            cost_cents: item.cost_cents,
            wholesale_cents: item.wholesale_cents,
            retail_cents: item.retail_cents,
            repair_description,
            issue_date: intake.issue_date,
            person,
            created_at: Utc::now(),
        };

        if let Err(e) = self.gateway.insert_repair(&record).await {
            return Err(TransitionFailure {
                transition: "issue_repair",
                step: TransitionStep::InsertDestination,
                source: e,
                compensation: CompensationOutcome::NotAttempted,
            }
            .into());
        }

        if let Err(e) = self.gateway.delete_stock(&item.id).await {
            let compensation = match self.gateway.delete_repair(&record.id).await {
                Ok(()) => CompensationOutcome::Succeeded,
                Err(comp_err) => {
                    warn!(code = %item.code, error = %comp_err,
                        "issue_repair compensation failed, device present in both ledgers");
                    CompensationOutcome::Failed(comp_err)
                }
            };
            return Err(TransitionFailure {
                transition: "issue_repair",
                step: TransitionStep::DeleteSource,
                source: e,
                compensation,
            }
            .into());
        }

        info!(code = %record.code, person = %record.person, "Device issued for repair");
        Ok(record)
    }

    // =========================================================================
    // in_repair → in_stock
    // =========================================================================

    /// Receives a repaired device back into stock.
    ///
    /// Reinserts a stock item from the repair snapshot (state forced to
    /// in-stock), then deletes the repair record; a failed delete
    /// compensates by removing the freshly inserted stock item.
    pub async fn receive_repair(
        &self,
        record: &RepairRecord,
    ) -> Result<StockItem, TransitionFailure> {
        let now = Utc::now();
        let item = StockItem {
            id: Uuid::new_v4().to_string(),
            code: record.code.clone(),
            phone: record.phone.clone(),
            imei: record.imei.clone(),
            storage: record.storage.clone(),
            colour: record.colour.clone(),
            description: record.description.clone(),
            buy_date: record.buy_date,
            cost_cents: record.cost_cents,
            wholesale_cents: record.wholesale_cents,
            retail_cents: record.retail_cents,
            state: StockState::InStock,
            return_date: None,
            last_checked_at: None,
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = self.gateway.insert_stock(&item).await {
            return Err(TransitionFailure {
                transition: "receive_repair",
                step: TransitionStep::InsertDestination,
                source: e,
                compensation: CompensationOutcome::NotAttempted,
            });
        }

        if let Err(e) = self.gateway.delete_repair(&record.id).await {
            let compensation = match self.gateway.delete_stock(&item.id).await {
                Ok(()) => CompensationOutcome::Succeeded,
                Err(comp_err) => {
                    warn!(code = %record.code, error = %comp_err,
                        "receive_repair compensation failed, device present in both ledgers");
                    CompensationOutcome::Failed(comp_err)
                }
            };
            return Err(TransitionFailure {
                transition: "receive_repair",
                step: TransitionStep::DeleteSource,
                source: e,
                compensation,
            });
        }

        info!(code = %item.code, "Device received from repair, back in stock");
        Ok(item)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::mock::fixtures::{repair_record, sold_item, stock_item};
    use crate::mock::MockGateway;

    fn terms() -> SaleTerms {
        SaleTerms {
            cost: Some(Money::from_rupees(80_000)),
            sell_price: Money::from_rupees(100_000),
            sell_date: NaiveDate::from_ymd_opt(2026, 7, 14).unwrap(),
        }
    }

    fn intake() -> RepairIntake {
        RepairIntake {
            person: "Sunil".to_string(),
            repair_description: "Cracked display".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2026, 7, 10).unwrap(),
        }
    }

    // --- lookup policy ---

    #[tokio::test]
    async fn test_locate_prefers_code_then_falls_back_to_imei() {
        let by_code = stock_item("1111", "111111111111111");
        let by_imei = stock_item("2222", "222222222222222");
        let ledger = StockLedger::new(
            MockGateway::new().with_stock(by_code.clone()).with_stock(by_imei.clone()),
        );

        let code = ShopCode::parse("1111").unwrap();
        let found = ledger
            .locate_stock(Some(&code), Some("222222222222222"))
            .await
            .unwrap()
            .unwrap();
        // Code match wins even though the IMEI points at another device
        assert_eq!(found.id, by_code.id);

        let missing_code = ShopCode::parse("9999").unwrap();
        let found = ledger
            .locate_stock(Some(&missing_code), Some("222222222222222"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, by_imei.id);

        assert!(ledger
            .locate_stock(Some(&missing_code), Some("000000000000000"))
            .await
            .unwrap()
            .is_none());
    }

    // --- sell ---

    #[tokio::test]
    async fn test_sell_moves_item_and_uses_sale_cost() {
        let item = stock_item("1234", "123456789012345");
        let ledger = StockLedger::new(MockGateway::new().with_stock(item.clone()));

        let sold = ledger
            .sell(
                &item,
                &SaleTerms {
                    cost: Some(Money::from_rupees(75_000)), // sale context, not the stored 80,000
                    ..terms()
                },
            )
            .await
            .unwrap();

        // Snapshot fields carried over, cost from the sale context
        assert_eq!(sold.code, item.code);
        assert_eq!(sold.original_id, item.id);
        assert_eq!(sold.cost_cents, Money::from_rupees(75_000).cents());

        let gw = ledger.gateway();
        assert!(gw.stocks().is_empty());
        assert_eq!(gw.sold_items().len(), 1);
    }

    #[tokio::test]
    async fn test_sell_cost_falls_back_to_item_cost() {
        let item = stock_item("1234", "123456789012345");
        let ledger = StockLedger::new(MockGateway::new().with_stock(item.clone()));

        let sold = ledger
            .sell(&item, &SaleTerms { cost: None, ..terms() })
            .await
            .unwrap();
        assert_eq!(sold.cost_cents, item.cost_cents);
    }

    #[tokio::test]
    async fn test_sell_delete_failure_compensates() {
        let item = stock_item("1234", "123456789012345");
        let gw = MockGateway::new().with_stock(item.clone());
        gw.fail("delete_stock", 1);
        let ledger = StockLedger::new(gw);

        let failure = ledger.sell(&item, &terms()).await.unwrap_err();
        assert_eq!(failure.transition, "sell");
        assert_eq!(failure.step, TransitionStep::DeleteSource);
        assert!(matches!(failure.compensation, CompensationOutcome::Succeeded));
        assert!(!failure.left_inconsistent());

        // Storage is back where it started
        let gw = ledger.gateway();
        assert_eq!(gw.stocks().len(), 1);
        assert!(gw.sold_items().is_empty());
    }

    #[tokio::test]
    async fn test_sell_compensation_itself_can_fail() {
        let item = stock_item("1234", "123456789012345");
        let gw = MockGateway::new().with_stock(item.clone());
        gw.fail("delete_stock", 1);
        gw.fail("delete_sold", 1);
        let ledger = StockLedger::new(gw);

        let failure = ledger.sell(&item, &terms()).await.unwrap_err();
        assert!(matches!(failure.compensation, CompensationOutcome::Failed(_)));
        assert!(failure.left_inconsistent());

        // The reachable partial state: device present in BOTH ledgers
        let gw = ledger.gateway();
        assert_eq!(gw.stocks().len(), 1);
        assert_eq!(gw.sold_items().len(), 1);
    }

    #[tokio::test]
    async fn test_sell_insert_failure_changes_nothing() {
        let item = stock_item("1234", "123456789012345");
        let gw = MockGateway::new().with_stock(item.clone());
        gw.fail("insert_sold", 1);
        let ledger = StockLedger::new(gw);

        let failure = ledger.sell(&item, &terms()).await.unwrap_err();
        assert_eq!(failure.step, TransitionStep::InsertDestination);
        assert!(matches!(failure.compensation, CompensationOutcome::NotAttempted));

        let gw = ledger.gateway();
        assert_eq!(gw.stocks().len(), 1);
        assert!(gw.sold_items().is_empty());
    }

    // --- return_from_sold ---

    #[tokio::test]
    async fn test_sell_then_return_roundtrip_restores_device_fields() {
        let item = stock_item("1234", "123456789012345");
        let ledger = StockLedger::new(MockGateway::new().with_stock(item.clone()));

        let sold = ledger.sell(&item, &terms()).await.unwrap();
        let returned = ledger
            .return_from_sold(
                &sold,
                &ReturnTerms {
                    cost: Some(Money::from_rupees(70_000)),
                    return_date: NaiveDate::from_ymd_opt(2026, 7, 20),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // Device-descriptive fields survive the round trip
        assert_eq!(returned.code, item.code);
        assert_eq!(returned.phone, item.phone);
        assert_eq!(returned.imei, item.imei);
        assert_eq!(returned.storage, item.storage);
        assert_eq!(returned.colour, item.colour);
        assert_eq!(returned.state, StockState::InStock);
        // Overridden cost and the return date stick
        assert_eq!(returned.cost_cents, Money::from_rupees(70_000).cents());
        assert!(returned.return_date.is_some());

        let gw = ledger.gateway();
        assert_eq!(gw.stocks().len(), 1);
        assert!(gw.sold_items().is_empty());
    }

    #[tokio::test]
    async fn test_return_delete_failure_leaves_duplicate_without_compensation() {
        let sold = sold_item("1234", "123456789012345");
        let gw = MockGateway::new().with_sold(sold.clone());
        gw.fail("delete_sold", 1);
        let ledger = StockLedger::new(gw);

        let failure = ledger
            .return_from_sold(&sold, &ReturnTerms::default())
            .await
            .unwrap_err();
        assert_eq!(failure.transition, "return_from_sold");
        assert_eq!(failure.step, TransitionStep::DeleteSource);
        // Deliberately no compensation: duplicate preferred to loss
        assert!(matches!(failure.compensation, CompensationOutcome::NotAttempted));
        assert!(failure.left_inconsistent());

        let gw = ledger.gateway();
        assert_eq!(gw.stocks().len(), 1);
        assert_eq!(gw.sold_items().len(), 1);
    }

    // --- issue_repair ---

    #[tokio::test]
    async fn test_issue_requires_person_and_description() {
        let item = stock_item("5678", "123456789012345");
        let ledger = StockLedger::new(MockGateway::new().with_stock(item.clone()));

        let blank_person = RepairIntake { person: "  ".into(), ..intake() };
        assert!(matches!(
            ledger.issue_repair(&item, &blank_person).await.unwrap_err(),
            LedgerError::Validation(_)
        ));

        let blank_desc = RepairIntake { repair_description: "".into(), ..intake() };
        assert!(matches!(
            ledger.issue_repair(&item, &blank_desc).await.unwrap_err(),
            LedgerError::Validation(_)
        ));

        // Nothing touched storage
        let gw = ledger.gateway();
        assert_eq!(gw.stocks().len(), 1);
        assert!(gw.repair_records().is_empty());
    }

    #[tokio::test]
    async fn test_issue_then_receive_roundtrip() {
        let item = stock_item("5678", "123456789012345");
        let ledger = StockLedger::new(MockGateway::new().with_stock(item.clone()));

        let record = ledger.issue_repair(&item, &intake()).await.unwrap();
        assert_eq!(record.person, "Sunil");
        assert_eq!(record.repair_description, "Cracked display");

        {
            let gw = ledger.gateway();
            assert!(gw.stocks().is_empty()); // out of the in-stock ledger
            assert_eq!(gw.repair_records().len(), 1);
        }

        let restored = ledger.receive_repair(&record).await.unwrap();
        // Identical in all device-descriptive fields
        assert_eq!(restored.code, item.code);
        assert_eq!(restored.phone, item.phone);
        assert_eq!(restored.imei, item.imei);
        assert_eq!(restored.storage, item.storage);
        assert_eq!(restored.colour, item.colour);
        assert_eq!(restored.description, item.description);
        assert_eq!(restored.cost_cents, item.cost_cents);
        assert_eq!(restored.state, StockState::InStock);

        let gw = ledger.gateway();
        assert_eq!(gw.stocks().len(), 1);
        assert!(gw.repair_records().is_empty());
    }

    #[tokio::test]
    async fn test_issue_delete_failure_compensates_by_removing_repair() {
        let item = stock_item("5678", "123456789012345");
        let gw = MockGateway::new().with_stock(item.clone());
        gw.fail("delete_stock", 1);
        let ledger = StockLedger::new(gw);

        let err = ledger.issue_repair(&item, &intake()).await.unwrap_err();
        let LedgerError::Transition(failure) = err else {
            panic!("expected transition failure, got {err:?}");
        };
        assert_eq!(failure.transition, "issue_repair");
        assert!(matches!(failure.compensation, CompensationOutcome::Succeeded));

        let gw = ledger.gateway();
        assert_eq!(gw.stocks().len(), 1);
        assert!(gw.repair_records().is_empty());
    }

    #[tokio::test]
    async fn test_receive_delete_failure_compensates_by_removing_stock() {
        let record = repair_record("5678", "123456789012345");
        let gw = MockGateway::new().with_repair(record.clone());
        gw.fail("delete_repair", 1);
        let ledger = StockLedger::new(gw);

        let failure = ledger.receive_repair(&record).await.unwrap_err();
        assert_eq!(failure.transition, "receive_repair");
        assert!(matches!(failure.compensation, CompensationOutcome::Succeeded));

        // Back to the pre-transition state: still in repair, not in stock
        let gw = ledger.gateway();
        assert!(gw.stocks().is_empty());
        assert_eq!(gw.repair_records().len(), 1);
    }
}
