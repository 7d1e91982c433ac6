//! # Domain Types
//!
//! Core domain types for the Teddy Mobile inventory system.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   StockItem     │   │  SoldStockItem  │   │  RepairRecord   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  code TDY-####  │   │  snapshot +     │   │  snapshot +     │       │
//! │  │  imei (unique)  │   │  sell price/date│   │  issue metadata │       │
//! │  │  state          │   │  (terminal)     │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  One device lives in EXACTLY ONE of the three tables at a time.        │
//! │  Movement between them is owned by teddy-ledger's sagas.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every stock entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `code`: `TDY-####` - human-assigned, what staff actually type

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::code::ShopCode;
use crate::money::Money;

// =============================================================================
// Stock State
// =============================================================================

/// Lifecycle state of an inventory item.
///
/// Exactly one state at a time; the state is implied by which ledger table
/// holds the row, and this enum is stored redundantly on `stocks` rows so
/// queries can filter without joining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockState {
    /// On the shelf, available for sale.
    InStock,
    /// Sold; lives in the sold ledger.
    Sold,
    /// Handed to a repair person; lives in the repair ledger.
    InRepair,
}

impl Default for StockState {
    fn default() -> Self {
        StockState::InStock
    }
}

// =============================================================================
// Stock Item
// =============================================================================

/// A phone in the in-stock ledger.
///
/// ## Invariants
/// - IMEI is unique across the in-stock and in-repair ledgers (one physical
///   device cannot sit in two ledgers)
/// - `code` is unique within the in-stock ledger
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Shop code (`TDY-####`).
    pub code: ShopCode,

    /// Phone model, e.g. "iPhone 14".
    pub phone: String,

    /// IMEI - the device's globally unique hardware identifier.
    pub imei: String,

    /// Storage size, e.g. "128GB".
    pub storage: String,

    /// Colour, e.g. "Black".
    pub colour: String,

    /// Free-text notes about the device's condition.
    pub description: Option<String>,

    /// Date the device was acquired.
    #[ts(as = "String")]
    pub buy_date: NaiveDate,

    /// Acquisition cost in cents.
    pub cost_cents: i64,

    /// Wholesale price in cents.
    pub wholesale_cents: i64,

    /// Retail price in cents.
    pub retail_cents: i64,

    /// Lifecycle state (always `InStock` for rows in this ledger).
    pub state: StockState,

    /// Set when the item came back from a sale reversal.
    #[ts(as = "Option<String>")]
    pub return_date: Option<NaiveDate>,

    /// Updated each time a stock check verifies this item.
    #[ts(as = "Option<String>")]
    pub last_checked_at: Option<DateTime<Utc>>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl StockItem {
    /// Returns the acquisition cost as Money.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// Returns the wholesale price as Money.
    #[inline]
    pub fn wholesale(&self) -> Money {
        Money::from_cents(self.wholesale_cents)
    }

    /// Returns the retail price as Money.
    #[inline]
    pub fn retail(&self) -> Money {
        Money::from_cents(self.retail_cents)
    }
}

// =============================================================================
// Sold Stock Item
// =============================================================================

/// A device snapshot taken at the moment of sale.
///
/// Terminal state: owns no further lifecycle, but a sale can be undone,
/// which deletes this row and re-creates a [`StockItem`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SoldStockItem {
    pub id: String,

    /// The `stocks` row this snapshot was taken from.
    pub original_id: String,

    pub code: ShopCode,
    pub phone: String,
    pub imei: String,
    pub storage: String,
    pub colour: String,
    pub description: Option<String>,

    #[ts(as = "String")]
    pub buy_date: NaiveDate,

    /// Cost basis in cents. Taken from the sale context (the profit report
    /// entry), NOT necessarily the stock row's stored cost.
    pub cost_cents: i64,

    /// Price the customer paid, in cents.
    pub sell_price_cents: i64,

    #[ts(as = "String")]
    pub sell_date: NaiveDate,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl SoldStockItem {
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    #[inline]
    pub fn sell_price(&self) -> Money {
        Money::from_cents(self.sell_price_cents)
    }

    /// Profit realized on this sale.
    #[inline]
    pub fn profit(&self) -> Money {
        self.sell_price() - self.cost()
    }
}

// =============================================================================
// Repair Record
// =============================================================================

/// A device handed out for repair: the full stock snapshot plus repair
/// metadata. While this row exists the device does NOT appear in the
/// in-stock ledger.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct RepairRecord {
    pub id: String,

    pub code: ShopCode,
    pub phone: String,
    pub imei: String,
    pub storage: String,
    pub colour: String,
    pub description: Option<String>,

    #[ts(as = "String")]
    pub buy_date: NaiveDate,

    pub cost_cents: i64,
    pub wholesale_cents: i64,
    pub retail_cents: i64,

    /// What is wrong with the device.
    pub repair_description: String,

    /// Date the device was handed out.
    #[ts(as = "String")]
    pub issue_date: NaiveDate,

    /// The repair person responsible.
    pub person: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Kelan Payment
// =============================================================================

/// A payout to the minority stakeholder. Append-only: no edit or delete of
/// historical payments is supported.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct KelanPayment {
    pub id: String,

    #[ts(as = "String")]
    pub payment_date: NaiveDate,

    /// Amount paid out, in cents. Never negative.
    pub amount_cents: i64,

    pub description: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl KelanPayment {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Stock Check
// =============================================================================

/// Status of a stock audit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Codes are still being scanned/entered.
    InProgress,
    /// Frozen; only used for reporting and export.
    Completed,
}

/// A stock audit session: a bounded verification pass reconciling physical
/// presence against the recorded in-stock set.
///
/// State machine and invariants live in [`crate::audit`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockCheck {
    pub id: String,

    #[ts(as = "String")]
    pub check_date: NaiveDate,

    /// User id of whoever ran the check.
    pub checked_by: String,

    /// The in-stock codes captured when the session started.
    pub snapshot_codes: Vec<ShopCode>,

    /// Codes confirmed present, in scan order, no duplicates.
    pub verified_codes: Vec<ShopCode>,

    /// Computed only at completion: `snapshot − verified`.
    pub missing_codes: Vec<ShopCode>,

    pub status: CheckStatus,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl StockCheck {
    /// Snapshot size at session start.
    #[inline]
    pub fn total_items(&self) -> usize {
        self.snapshot_codes.len()
    }

    #[inline]
    pub fn verified_items(&self) -> usize {
        self.verified_codes.len()
    }

    #[inline]
    pub fn missing_items(&self) -> usize {
        self.missing_codes.len()
    }
}

// =============================================================================
// Report Summary
// =============================================================================

/// Row-shaped projection of a saved report's headline figures, used for
/// report lists, range statistics, payslips, and analytics without loading
/// the full entry lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ReportSummary {
    pub id: String,

    #[ts(as = "String")]
    pub report_date: NaiveDate,

    pub phone_profit_cents: i64,
    pub accessory_profit_cents: i64,
    pub thabrew_total_cents: i64,
    pub kelan_total_cents: i64,
}

impl ReportSummary {
    /// Combined phone and accessory profit for the day.
    #[inline]
    pub fn total_profit(&self) -> Money {
        Money::from_cents(self.phone_profit_cents + self.accessory_profit_cents)
    }
}

// =============================================================================
// Users
// =============================================================================

/// Access role. Destructive and financial-detail operations require `Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Cashier,
}

impl Role {
    #[inline]
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// A staff account. The password hash never leaves the API layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UserAccount {
    pub id: String,
    pub email: String,
    /// Argon2 PHC string; excluded from JSON responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_state_default() {
        assert_eq!(StockState::default(), StockState::InStock);
    }

    #[test]
    fn test_stock_state_serde_names() {
        assert_eq!(
            serde_json::to_string(&StockState::InRepair).unwrap(),
            "\"in_repair\""
        );
    }

    #[test]
    fn test_role_is_admin() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::Cashier.is_admin());
    }

    #[test]
    fn test_sold_item_profit() {
        let item = SoldStockItem {
            id: "s1".into(),
            original_id: "o1".into(),
            code: ShopCode::parse("1234").unwrap(),
            phone: "iPhone 14".into(),
            imei: "123456789012345".into(),
            storage: "128GB".into(),
            colour: "Black".into(),
            description: None,
            buy_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            cost_cents: 8_000_000,
            sell_price_cents: 10_000_000,
            sell_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            created_at: Utc::now(),
        };
        assert_eq!(item.profit().cents(), 2_000_000);
    }
}
