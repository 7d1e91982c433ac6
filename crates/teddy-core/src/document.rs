//! # Report Documents
//!
//! The data model handed to report renderers.
//!
//! The core produces a [`Document`] - a titled stack of tables, each with an
//! optional totals row - and the consumer (the React frontend's PDF export)
//! does the actual page layout. Nothing here knows about fonts, pages, or
//! PDF bytes; every cell is already a display string.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Document                                                               │
//! │  ├── title      "Sale Profit Report"                                   │
//! │  ├── subtitle   "2026-07-14"                                           │
//! │  └── tables                                                             │
//! │       ├── Table { heading, columns, rows, totals? }                    │
//! │       ├── Table { ... }                                                 │
//! │       └── ...                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::payout::Payslip;
use crate::sale::{ProfitReport, SplitLine};
use crate::types::StockCheck;

// =============================================================================
// Document Model
// =============================================================================

/// One table in a rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DocumentTable {
    pub heading: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Rendered bold under the body when present.
    pub totals: Option<Vec<String>>,
}

/// A paginated-document description: title, subtitle, tables in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Document {
    pub title: String,
    pub subtitle: Option<String>,
    pub tables: Vec<DocumentTable>,
}

fn strings(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

fn ledger_table(heading: &str, lines: &[SplitLine]) -> DocumentTable {
    let total: Money = lines.iter().map(SplitLine::amount).sum();
    DocumentTable {
        heading: heading.to_string(),
        columns: strings(&["Description", "Amount"]),
        rows: lines
            .iter()
            .map(|l| vec![l.description.clone(), l.amount().to_string()])
            .collect(),
        totals: Some(vec!["Total".to_string(), total.to_string()]),
    }
}

// =============================================================================
// Builders
// =============================================================================

impl Document {
    /// The daily sale profit report: phone sales, accessory sales, and both
    /// stakeholder charts, each with a totals row.
    pub fn profit_report(report: &ProfitReport) -> Document {
        let t = &report.totals;

        let phone_table = DocumentTable {
            heading: "Phone Sales".to_string(),
            columns: strings(&[
                "Model", "IMEI", "Colour", "Owner", "Revenue", "Cost", "Profit", "Thabrew",
                "Kelan",
            ]),
            rows: report
                .phone_entries
                .iter()
                .map(|p| {
                    vec![
                        p.model.clone(),
                        p.imei.clone(),
                        p.colour.clone(),
                        p.owner.label().to_string(),
                        p.figures.revenue().to_string(),
                        p.figures.cost().to_string(),
                        p.figures.profit().to_string(),
                        p.figures.thabrew().to_string(),
                        p.figures.kelan().to_string(),
                    ]
                })
                .collect(),
            totals: Some(vec![
                "Total".to_string(),
                String::new(),
                String::new(),
                String::new(),
                Money::from_cents(t.phone_revenue_cents).to_string(),
                Money::from_cents(t.phone_cost_cents).to_string(),
                Money::from_cents(t.phone_profit_cents).to_string(),
                Money::from_cents(t.thabrew_phone_cents).to_string(),
                Money::from_cents(t.kelan_phone_cents).to_string(),
            ]),
        };

        let accessory_table = DocumentTable {
            heading: "Accessories Chart".to_string(),
            columns: strings(&["Model", "Revenue", "Cost", "Profit", "Thabrew", "Kelan"]),
            rows: report
                .accessory_entries
                .iter()
                .map(|a| {
                    vec![
                        a.model.clone(),
                        a.figures.revenue().to_string(),
                        a.figures.cost().to_string(),
                        a.figures.profit().to_string(),
                        a.figures.thabrew().to_string(),
                        a.figures.kelan().to_string(),
                    ]
                })
                .collect(),
            totals: Some(vec![
                "Total".to_string(),
                Money::from_cents(t.accessory_revenue_cents).to_string(),
                Money::from_cents(t.accessory_cost_cents).to_string(),
                Money::from_cents(t.accessory_profit_cents).to_string(),
                Money::from_cents(t.thabrew_accessory_cents).to_string(),
                Money::from_cents(t.kelan_accessory_cents).to_string(),
            ]),
        };

        Document {
            title: "Sale Profit Report".to_string(),
            subtitle: Some(report.report_date.to_string()),
            tables: vec![
                phone_table,
                accessory_table,
                ledger_table("Thabrew Chart", &report.thabrew_entries),
                ledger_table("Kelan Chart", &report.kelan_entries),
            ],
        }
    }

    /// The stock check report: verified and missing code lists.
    pub fn stock_check(check: &StockCheck) -> Document {
        let code_table = |heading: &str, codes: &[crate::code::ShopCode]| DocumentTable {
            heading: heading.to_string(),
            columns: strings(&["#", "Code"]),
            rows: codes
                .iter()
                .enumerate()
                .map(|(i, c)| vec![(i + 1).to_string(), c.to_string()])
                .collect(),
            totals: None,
        };

        Document {
            title: "Stock Check Report".to_string(),
            subtitle: Some(format!(
                "{} - {} items, {} verified, {} missing",
                check.check_date,
                check.total_items(),
                check.verified_items(),
                check.missing_items()
            )),
            tables: vec![
                code_table("Verified Items", &check.verified_codes),
                code_table("Missing Items", &check.missing_codes),
            ],
        }
    }

    /// The Kelan payslip for a period: earnings, payments, and the net
    /// balance line.
    pub fn payslip(slip: &Payslip) -> Document {
        let earnings_table = DocumentTable {
            heading: "Earnings".to_string(),
            columns: strings(&["Report Date", "Amount"]),
            rows: slip
                .earnings
                .iter()
                .map(|e| vec![e.report_date.to_string(), e.amount().to_string()])
                .collect(),
            totals: Some(vec![
                "Total Earned".to_string(),
                slip.summary.earned().to_string(),
            ]),
        };

        let payments_table = DocumentTable {
            heading: "Payments".to_string(),
            columns: strings(&["Date", "Description", "Amount"]),
            rows: slip
                .payments
                .iter()
                .map(|p| {
                    vec![
                        p.payment_date.to_string(),
                        p.description.clone().unwrap_or_default(),
                        p.amount().to_string(),
                    ]
                })
                .collect(),
            totals: Some(vec![
                "Total Paid".to_string(),
                String::new(),
                slip.summary.paid().to_string(),
            ]),
        };

        let balance_table = DocumentTable {
            heading: "Summary".to_string(),
            columns: strings(&["", "Amount"]),
            rows: vec![
                vec!["Earned".to_string(), slip.summary.earned().to_string()],
                vec!["Paid".to_string(), slip.summary.paid().to_string()],
            ],
            totals: Some(vec![
                "Balance".to_string(),
                slip.summary.balance().to_string(),
            ]),
        };

        Document {
            title: "Payslip - Kelan".to_string(),
            subtitle: Some(format!("{} to {}", slip.period.start, slip.period.end)),
            tables: vec![earnings_table, payments_table, balance_table],
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
