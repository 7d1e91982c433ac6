//! # Storage Gateway
//!
//! The narrow row-level contract the sagas depend on.
//!
//! Each method maps to exactly one repository statement - the gateway
//! deliberately exposes no transactions, batches, or joins, because the
//! whole point of the saga layer is that these steps are independent
//! network-visible operations with no atomicity between them.
//!
//! Production code uses the [`teddy_db::Database`] implementation; the test
//! suite swaps in a scripted in-memory gateway that can fail any step on
//! demand.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use teddy_core::{ProfitReport, RepairRecord, ShopCode, SoldStockItem, StockCheck, StockItem};
use teddy_db::error::DbResult;
use teddy_db::Database;

/// Row-level storage operations needed by the ledger sagas.
#[async_trait]
pub trait StockGateway: Send + Sync {
    // --- in-stock ledger ---
    async fn find_stock_by_code(&self, code: &ShopCode) -> DbResult<Option<StockItem>>;
    async fn find_stock_by_imei(&self, imei: &str) -> DbResult<Option<StockItem>>;
    async fn insert_stock(&self, item: &StockItem) -> DbResult<()>;
    async fn delete_stock(&self, id: &str) -> DbResult<()>;
    async fn touch_last_checked(&self, id: &str, at: DateTime<Utc>) -> DbResult<()>;
    async fn in_stock_codes(&self) -> DbResult<Vec<ShopCode>>;

    // --- sold ledger ---
    async fn insert_sold(&self, item: &SoldStockItem) -> DbResult<()>;
    async fn delete_sold(&self, id: &str) -> DbResult<()>;

    // --- repair ledger ---
    async fn find_repair_by_code(&self, code: &ShopCode) -> DbResult<Option<RepairRecord>>;
    async fn find_repair_by_imei(&self, imei: &str) -> DbResult<Option<RepairRecord>>;
    async fn insert_repair(&self, record: &RepairRecord) -> DbResult<()>;
    async fn delete_repair(&self, id: &str) -> DbResult<()>;

    // --- profit reports ---
    async fn insert_report(&self, report: &ProfitReport) -> DbResult<()>;
    async fn update_report(&self, report: &ProfitReport) -> DbResult<()>;

    // --- stock checks ---
    async fn insert_check(&self, check: &StockCheck) -> DbResult<()>;
    async fn update_check_progress(&self, check: &StockCheck) -> DbResult<()>;
    async fn complete_check(&self, check: &StockCheck) -> DbResult<()>;
}

/// The production gateway: straight delegation to the repositories.
#[async_trait]
impl StockGateway for Database {
    async fn find_stock_by_code(&self, code: &ShopCode) -> DbResult<Option<StockItem>> {
        self.stocks().get_by_code(code).await
    }

    async fn find_stock_by_imei(&self, imei: &str) -> DbResult<Option<StockItem>> {
        self.stocks().get_by_imei(imei).await
    }

    async fn insert_stock(&self, item: &StockItem) -> DbResult<()> {
        self.stocks().insert(item).await
    }

    async fn delete_stock(&self, id: &str) -> DbResult<()> {
        self.stocks().delete(id).await
    }

    async fn touch_last_checked(&self, id: &str, at: DateTime<Utc>) -> DbResult<()> {
        self.stocks().touch_last_checked(id, at).await
    }

    async fn in_stock_codes(&self) -> DbResult<Vec<ShopCode>> {
        self.stocks().in_stock_codes().await
    }

    async fn insert_sold(&self, item: &SoldStockItem) -> DbResult<()> {
        self.sold().insert(item).await
    }

    async fn delete_sold(&self, id: &str) -> DbResult<()> {
        self.sold().delete(id).await
    }

    async fn find_repair_by_code(&self, code: &ShopCode) -> DbResult<Option<RepairRecord>> {
        self.repairs().get_by_code(code).await
    }

    async fn find_repair_by_imei(&self, imei: &str) -> DbResult<Option<RepairRecord>> {
        self.repairs().get_by_imei(imei).await
    }

    async fn insert_repair(&self, record: &RepairRecord) -> DbResult<()> {
        self.repairs().insert(record).await
    }

    async fn delete_repair(&self, id: &str) -> DbResult<()> {
        self.repairs().delete(id).await
    }

    async fn insert_report(&self, report: &ProfitReport) -> DbResult<()> {
        self.reports().insert(report).await
    }

    async fn update_report(&self, report: &ProfitReport) -> DbResult<()> {
        self.reports().update(report).await
    }

    async fn insert_check(&self, check: &StockCheck) -> DbResult<()> {
        self.checks().insert(check).await
    }

    async fn update_check_progress(&self, check: &StockCheck) -> DbResult<()> {
        self.checks().update_progress(check).await
    }

    async fn complete_check(&self, check: &StockCheck) -> DbResult<()> {
        self.checks().complete(check).await
    }
}
