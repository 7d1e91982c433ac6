//! # Sale Lines and Split Ledger Lines
//!
//! Types for the profit tool's working data: individual sale entries
//! (phones and accessories), the per-stakeholder ledger lines derived from
//! them, and the saved report aggregate.
//!
//! ## The Two Entry Kinds
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleLine                                                               │
//! │  ├── Phone      model, IMEI, colour, owner, optional TDY code          │
//! │  └── Accessory  model only                                             │
//! │                                                                         │
//! │  Both carry the same derived figures:                                  │
//! │    profit  = revenue − cost                                            │
//! │    thabrew = profit × 80%                                              │
//! │    kelan   = profit × 20%                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Figures are computed once at construction from revenue and cost; they are
//! never entered by hand and never drift from their inputs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::code::ShopCode;
use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::require;

// =============================================================================
// Owner Tag
// =============================================================================

/// Who fronted the phone being sold.
///
/// `Tb` means shop-owned: the majority stakeholder fronted the acquisition
/// cost, so the phone's cost appears as a Thabrew ledger line. Anything else
/// is an external party's device sold on their behalf.
///
/// Serialized as the plain string (`"TB"` or the party name), matching how
/// report entries have always been stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Owner {
    /// Shop-owned (Teddy).
    Tb,
    /// External party, identified by name.
    Other(String),
}

impl Owner {
    #[inline]
    pub fn is_shop_owned(&self) -> bool {
        matches!(self, Owner::Tb)
    }

    /// The display string (`TB` or the party name).
    pub fn label(&self) -> &str {
        match self {
            Owner::Tb => "TB",
            Owner::Other(name) => name,
        }
    }
}

impl From<String> for Owner {
    fn from(raw: String) -> Self {
        if raw.trim().eq_ignore_ascii_case("TB") {
            Owner::Tb
        } else {
            Owner::Other(raw)
        }
    }
}

impl From<Owner> for String {
    fn from(owner: Owner) -> String {
        match owner {
            Owner::Tb => "TB".to_string(),
            Owner::Other(name) => name,
        }
    }
}

// =============================================================================
// Sale Figures (shared base)
// =============================================================================

/// The revenue/cost/profit/share figures every sale line carries.
///
/// Constructed only through [`SaleFigures::compute`] so the derived fields
/// can never disagree with revenue and cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleFigures {
    pub revenue_cents: i64,
    pub cost_cents: i64,
    pub profit_cents: i64,
    pub thabrew_cents: i64,
    pub kelan_cents: i64,
}

impl SaleFigures {
    /// Derives profit and the 80/20 shares from revenue and cost.
    pub fn compute(revenue: Money, cost: Money) -> Self {
        let profit = revenue - cost;
        let split = profit.split_shares();
        SaleFigures {
            revenue_cents: revenue.cents(),
            cost_cents: cost.cents(),
            profit_cents: profit.cents(),
            thabrew_cents: split.thabrew.cents(),
            kelan_cents: split.kelan.cents(),
        }
    }

    #[inline]
    pub fn revenue(&self) -> Money {
        Money::from_cents(self.revenue_cents)
    }

    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    #[inline]
    pub fn profit(&self) -> Money {
        Money::from_cents(self.profit_cents)
    }

    #[inline]
    pub fn thabrew(&self) -> Money {
        Money::from_cents(self.thabrew_cents)
    }

    #[inline]
    pub fn kelan(&self) -> Money {
        Money::from_cents(self.kelan_cents)
    }
}

// =============================================================================
// Phone Sale
// =============================================================================

/// Raw input for a phone sale line, straight from the form.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PhoneSaleInput {
    pub model: String,
    pub imei: String,
    pub colour: String,
    /// `"TB"` or an external party name.
    pub owner: String,
    /// Raw shop code entry; normalized to `TDY-####` when present.
    pub code: Option<String>,
    pub revenue_cents: i64,
    pub cost_cents: i64,
}

/// A phone sale line in a profit report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PhoneSale {
    pub model: String,
    pub imei: String,
    pub colour: String,
    #[ts(as = "String")]
    pub owner: Owner,
    /// Back-reference used to locate and settle the matching stock item.
    pub code: Option<ShopCode>,
    #[serde(flatten)]
    pub figures: SaleFigures,
}

impl PhoneSale {
    /// Validates the input and derives the split figures.
    ///
    /// Required: model, IMEI, colour, owner. A blank owner name (for
    /// non-shop-owned phones) is also refused. An unparsable code refuses
    /// the entry rather than silently dropping the back-reference.
    pub fn new(input: PhoneSaleInput) -> Result<Self, ValidationError> {
        let model = require("model", &input.model)?;
        let imei = require("imei", &input.imei)?;
        let colour = require("colour", &input.colour)?;
        let owner = Owner::from(require("owner", &input.owner)?);

        let code = match input.code.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(raw) => Some(ShopCode::parse(raw)?),
        };

        Ok(PhoneSale {
            model,
            imei,
            colour,
            owner,
            code,
            figures: SaleFigures::compute(
                Money::from_cents(input.revenue_cents),
                Money::from_cents(input.cost_cents),
            ),
        })
    }
}

// =============================================================================
// Accessory Sale
// =============================================================================

/// Raw input for an accessory sale line.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AccessorySaleInput {
    pub model: String,
    pub revenue_cents: i64,
    pub cost_cents: i64,
}

/// An accessory sale line in a profit report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AccessorySale {
    pub model: String,
    #[serde(flatten)]
    pub figures: SaleFigures,
}

impl AccessorySale {
    /// Validates the input (model required) and derives the split figures.
    pub fn new(input: AccessorySaleInput) -> Result<Self, ValidationError> {
        Ok(AccessorySale {
            model: require("model", &input.model)?,
            figures: SaleFigures::compute(
                Money::from_cents(input.revenue_cents),
                Money::from_cents(input.cost_cents),
            ),
        })
    }
}

// =============================================================================
// Sale Line (tagged variant)
// =============================================================================

/// Either kind of sale line, for callers that iterate both lists uniformly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SaleLine {
    Phone(PhoneSale),
    Accessory(AccessorySale),
}

impl SaleLine {
    /// The shared revenue/cost/profit/share figures.
    pub fn figures(&self) -> &SaleFigures {
        match self {
            SaleLine::Phone(p) => &p.figures,
            SaleLine::Accessory(a) => &a.figures,
        }
    }
}

// =============================================================================
// Split Ledger Line
// =============================================================================

/// One line in a stakeholder's ledger.
///
/// The computed subset is fully regenerated from the sale lines on every
/// change; only manual lines are independently stored and editable. The two
/// subsets are concatenated at read time, never merged into one mutable
/// structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SplitLine {
    pub description: String,
    pub amount_cents: i64,
    /// `false` for system-computed lines, `true` for manual adjustments.
    pub manual: bool,
}

impl SplitLine {
    pub fn computed(description: impl Into<String>, amount: Money) -> Self {
        SplitLine {
            description: description.into(),
            amount_cents: amount.cents(),
            manual: false,
        }
    }

    pub fn manual(description: impl Into<String>, amount: Money) -> Self {
        SplitLine {
            description: description.into(),
            amount_cents: amount.cents(),
            manual: true,
        }
    }

    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Report Totals
// =============================================================================

/// The precomputed aggregates stored on every saved report.
///
/// `thabrew_total_cents` and `kelan_total_cents` are the sums of the
/// respective ledger lines (computed + manual) - the single source formula
/// for stakeholder totals everywhere in the system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ReportTotals {
    pub phone_revenue_cents: i64,
    pub phone_cost_cents: i64,
    pub phone_profit_cents: i64,
    pub accessory_revenue_cents: i64,
    pub accessory_cost_cents: i64,
    pub accessory_profit_cents: i64,
    pub thabrew_phone_cents: i64,
    pub thabrew_accessory_cents: i64,
    pub thabrew_total_cents: i64,
    pub kelan_phone_cents: i64,
    pub kelan_accessory_cents: i64,
    pub kelan_total_cents: i64,
}

// =============================================================================
// Profit Report
// =============================================================================

/// A saved daily profit report.
///
/// Immutable once saved except through the explicit edit-and-resave flow,
/// which reloads the entries into a [`crate::worksheet::Worksheet`] and
/// overwrites this record.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfitReport {
    pub id: String,

    #[ts(as = "String")]
    pub report_date: NaiveDate,

    pub phone_entries: Vec<PhoneSale>,
    pub accessory_entries: Vec<AccessorySale>,

    /// Full Thabrew ledger as saved (computed lines + manual lines).
    pub thabrew_entries: Vec<SplitLine>,

    /// Full Kelan ledger as saved.
    pub kelan_entries: Vec<SplitLine>,

    pub totals: ReportTotals,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn phone_input() -> PhoneSaleInput {
        PhoneSaleInput {
            model: "iPhone 14".into(),
            imei: "123456789012345".into(),
            colour: "Black".into(),
            owner: "TB".into(),
            code: Some("1234".into()),
            revenue_cents: 10_000_000,
            cost_cents: 8_000_000,
        }
    }

    #[test]
    fn test_phone_sale_figures() {
        let sale = PhoneSale::new(phone_input()).unwrap();
        assert_eq!(sale.figures.profit_cents, 2_000_000);
        assert_eq!(sale.figures.thabrew_cents, 1_600_000);
        assert_eq!(sale.figures.kelan_cents, 400_000);
        assert!(sale.owner.is_shop_owned());
        assert_eq!(sale.code.as_ref().unwrap().as_str(), "TDY-1234");
    }

    #[test]
    fn test_phone_sale_requires_fields() {
        let mut input = phone_input();
        input.colour = "  ".into();
        assert!(PhoneSale::new(input).is_err());

        let mut input = phone_input();
        input.owner = "".into();
        assert!(PhoneSale::new(input).is_err());
    }

    #[test]
    fn test_phone_sale_blank_code_is_none() {
        let mut input = phone_input();
        input.code = Some("   ".into());
        let sale = PhoneSale::new(input).unwrap();
        assert!(sale.code.is_none());
    }

    #[test]
    fn test_accessory_requires_model() {
        let input = AccessorySaleInput {
            model: "".into(),
            revenue_cents: 100,
            cost_cents: 50,
        };
        assert!(AccessorySale::new(input).is_err());
    }

    #[test]
    fn test_owner_roundtrip() {
        assert_eq!(Owner::from("tb".to_string()), Owner::Tb);
        assert_eq!(Owner::from(" TB ".to_string()), Owner::Tb);
        let other = Owner::from("Nimal".to_string());
        assert_eq!(other.label(), "Nimal");
        assert!(!other.is_shop_owned());
        assert_eq!(String::from(Owner::Tb), "TB");
    }

    #[test]
    fn test_figures_never_disagree() {
        let figures = SaleFigures::compute(Money::from_cents(999), Money::from_cents(100));
        assert_eq!(figures.profit_cents, 899);
        assert_eq!(figures.thabrew_cents + figures.kelan_cents, 899);
    }

    #[test]
    fn test_sale_line_figures_accessor() {
        let line = SaleLine::Accessory(
            AccessorySale::new(AccessorySaleInput {
                model: "USB-C Cable".into(),
                revenue_cents: 1500,
                cost_cents: 900,
            })
            .unwrap(),
        );
        assert_eq!(line.figures().profit_cents, 600);
    }
}
