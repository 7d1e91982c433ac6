//! # Scripted In-Memory Gateway
//!
//! Test double for [`crate::gateway::StockGateway`] with per-step fault
//! injection: arm a named operation to fail N times and every saga partial
//! state ("insert succeeded, delete failed") becomes reachable and
//! assertable without a database.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use teddy_core::{ProfitReport, RepairRecord, ShopCode, SoldStockItem, StockCheck, StockItem};
use teddy_db::error::DbResult;
use teddy_db::DbError;

use crate::gateway::StockGateway;

#[derive(Default)]
struct MockState {
    stocks: Vec<StockItem>,
    sold: Vec<SoldStockItem>,
    repairs: Vec<RepairRecord>,
    reports: Vec<ProfitReport>,
    checks: Vec<StockCheck>,
    /// Operation name → remaining injected failures.
    failures: HashMap<&'static str, u32>,
}

/// In-memory gateway with scripted failures.
#[derive(Default)]
pub(crate) struct MockGateway {
    state: Mutex<MockState>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-loads an in-stock item.
    pub fn with_stock(self, item: StockItem) -> Self {
        self.state.lock().unwrap().stocks.push(item);
        self
    }

    /// Pre-loads a sold item.
    pub fn with_sold(self, item: SoldStockItem) -> Self {
        self.state.lock().unwrap().sold.push(item);
        self
    }

    /// Pre-loads a repair record.
    pub fn with_repair(self, record: RepairRecord) -> Self {
        self.state.lock().unwrap().repairs.push(record);
        self
    }

    /// Arms `op` to fail the next `times` calls.
    pub fn fail(&self, op: &'static str, times: u32) {
        self.state.lock().unwrap().failures.insert(op, times);
    }

    fn trip(&self, op: &'static str) -> DbResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(remaining) = state.failures.get_mut(op) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(DbError::QueryFailed(format!("injected failure: {op}")));
            }
        }
        Ok(())
    }

    // --- state assertions ---

    pub fn stocks(&self) -> Vec<StockItem> {
        self.state.lock().unwrap().stocks.clone()
    }

    pub fn sold_items(&self) -> Vec<SoldStockItem> {
        self.state.lock().unwrap().sold.clone()
    }

    pub fn repair_records(&self) -> Vec<RepairRecord> {
        self.state.lock().unwrap().repairs.clone()
    }

    pub fn saved_reports(&self) -> Vec<ProfitReport> {
        self.state.lock().unwrap().reports.clone()
    }

    pub fn saved_checks(&self) -> Vec<StockCheck> {
        self.state.lock().unwrap().checks.clone()
    }
}

#[async_trait]
impl StockGateway for MockGateway {
    async fn find_stock_by_code(&self, code: &ShopCode) -> DbResult<Option<StockItem>> {
        self.trip("find_stock_by_code")?;
        let state = self.state.lock().unwrap();
        Ok(state.stocks.iter().find(|s| &s.code == code).cloned())
    }

    async fn find_stock_by_imei(&self, imei: &str) -> DbResult<Option<StockItem>> {
        self.trip("find_stock_by_imei")?;
        let state = self.state.lock().unwrap();
        Ok(state.stocks.iter().find(|s| s.imei == imei).cloned())
    }

    async fn insert_stock(&self, item: &StockItem) -> DbResult<()> {
        self.trip("insert_stock")?;
        self.state.lock().unwrap().stocks.push(item.clone());
        Ok(())
    }

    async fn delete_stock(&self, id: &str) -> DbResult<()> {
        self.trip("delete_stock")?;
        let mut state = self.state.lock().unwrap();
        let before = state.stocks.len();
        state.stocks.retain(|s| s.id != id);
        if state.stocks.len() == before {
            return Err(DbError::not_found("Stock item", id));
        }
        Ok(())
    }

    async fn touch_last_checked(&self, id: &str, at: DateTime<Utc>) -> DbResult<()> {
        self.trip("touch_last_checked")?;
        let mut state = self.state.lock().unwrap();
        match state.stocks.iter_mut().find(|s| s.id == id) {
            Some(item) => {
                item.last_checked_at = Some(at);
                Ok(())
            }
            None => Err(DbError::not_found("Stock item", id)),
        }
    }

    async fn in_stock_codes(&self) -> DbResult<Vec<ShopCode>> {
        self.trip("in_stock_codes")?;
        let state = self.state.lock().unwrap();
        let mut codes: Vec<ShopCode> = state.stocks.iter().map(|s| s.code.clone()).collect();
        codes.sort();
        Ok(codes)
    }

    async fn insert_sold(&self, item: &SoldStockItem) -> DbResult<()> {
        self.trip("insert_sold")?;
        self.state.lock().unwrap().sold.push(item.clone());
        Ok(())
    }

    async fn delete_sold(&self, id: &str) -> DbResult<()> {
        self.trip("delete_sold")?;
        let mut state = self.state.lock().unwrap();
        let before = state.sold.len();
        state.sold.retain(|s| s.id != id);
        if state.sold.len() == before {
            return Err(DbError::not_found("Sold item", id));
        }
        Ok(())
    }

    async fn find_repair_by_code(&self, code: &ShopCode) -> DbResult<Option<RepairRecord>> {
        self.trip("find_repair_by_code")?;
        let state = self.state.lock().unwrap();
        Ok(state.repairs.iter().find(|r| &r.code == code).cloned())
    }

    async fn find_repair_by_imei(&self, imei: &str) -> DbResult<Option<RepairRecord>> {
        self.trip("find_repair_by_imei")?;
        let state = self.state.lock().unwrap();
        Ok(state.repairs.iter().find(|r| r.imei == imei).cloned())
    }

    async fn insert_repair(&self, record: &RepairRecord) -> DbResult<()> {
        self.trip("insert_repair")?;
        self.state.lock().unwrap().repairs.push(record.clone());
        Ok(())
    }

    async fn delete_repair(&self, id: &str) -> DbResult<()> {
        self.trip("delete_repair")?;
        let mut state = self.state.lock().unwrap();
        let before = state.repairs.len();
        state.repairs.retain(|r| r.id != id);
        if state.repairs.len() == before {
            return Err(DbError::not_found("Repair record", id));
        }
        Ok(())
    }

    async fn insert_report(&self, report: &ProfitReport) -> DbResult<()> {
        self.trip("insert_report")?;
        self.state.lock().unwrap().reports.push(report.clone());
        Ok(())
    }

    async fn update_report(&self, report: &ProfitReport) -> DbResult<()> {
        self.trip("update_report")?;
        let mut state = self.state.lock().unwrap();
        match state.reports.iter_mut().find(|r| r.id == report.id) {
            Some(slot) => {
                *slot = report.clone();
                Ok(())
            }
            None => Err(DbError::not_found("Profit report", &report.id)),
        }
    }

    async fn insert_check(&self, check: &StockCheck) -> DbResult<()> {
        self.trip("insert_check")?;
        self.state.lock().unwrap().checks.push(check.clone());
        Ok(())
    }

    async fn update_check_progress(&self, check: &StockCheck) -> DbResult<()> {
        self.trip("update_check_progress")?;
        let mut state = self.state.lock().unwrap();
        match state.checks.iter_mut().find(|c| c.id == check.id) {
            Some(slot) => {
                slot.verified_codes = check.verified_codes.clone();
                Ok(())
            }
            None => Err(DbError::not_found("Stock check", &check.id)),
        }
    }

    async fn complete_check(&self, check: &StockCheck) -> DbResult<()> {
        self.trip("complete_check")?;
        let mut state = self.state.lock().unwrap();
        match state.checks.iter_mut().find(|c| c.id == check.id) {
            Some(slot) => {
                *slot = check.clone();
                Ok(())
            }
            None => Err(DbError::not_found("Stock check", &check.id)),
        }
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================

pub(crate) mod fixtures {
    use chrono::NaiveDate;
    use teddy_core::StockState;

    use super::*;

    pub fn stock_item(code: &str, imei: &str) -> StockItem {
        let now = Utc::now();
        StockItem {
            id: uuid::Uuid::new_v4().to_string(),
            code: ShopCode::parse(code).unwrap(),
            phone: "iPhone 14".to_string(),
            imei: imei.to_string(),
            storage: "128GB".to_string(),
            colour: "Black".to_string(),
            description: Some("Mint condition".to_string()),
            buy_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            cost_cents: 8_000_000,
            wholesale_cents: 9_000_000,
            retail_cents: 10_000_000,
            state: StockState::InStock,
            return_date: None,
            last_checked_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn sold_item(code: &str, imei: &str) -> SoldStockItem {
        SoldStockItem {
            id: uuid::Uuid::new_v4().to_string(),
            original_id: "orig-1".to_string(),
            code: ShopCode::parse(code).unwrap(),
            phone: "iPhone 14".to_string(),
            imei: imei.to_string(),
            storage: "128GB".to_string(),
            colour: "Black".to_string(),
            description: None,
            buy_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            cost_cents: 8_000_000,
            sell_price_cents: 10_000_000,
            sell_date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            created_at: Utc::now(),
        }
    }

    pub fn repair_record(code: &str, imei: &str) -> RepairRecord {
        RepairRecord {
            id: uuid::Uuid::new_v4().to_string(),
            code: ShopCode::parse(code).unwrap(),
            phone: "iPhone 14".to_string(),
            imei: imei.to_string(),
            storage: "128GB".to_string(),
            colour: "Black".to_string(),
            description: Some("Mint condition".to_string()),
            buy_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            cost_cents: 8_000_000,
            wholesale_cents: 9_000_000,
            retail_cents: 10_000_000,
            repair_description: "Battery swap".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2026, 7, 5).unwrap(),
            person: "Sunil".to_string(),
            created_at: Utc::now(),
        }
    }
}
