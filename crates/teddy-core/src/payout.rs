//! # Kelan Payout Ledger
//!
//! Balance and payslip aggregation for the minority stakeholder.
//!
//! ## The Balance Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   balance = Σ report.kelan_total  −  Σ payment.amount                  │
//! │             (everything earned)      (everything paid out)             │
//! │                                                                         │
//! │  Computed on demand from the two collections - never stored.           │
//! │  Payments are append-only: no edit or delete of history.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The payslip is the same computation bounded to an inclusive date range,
//! with the contributing rows kept for rendering.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{KelanPayment, ReportSummary};
use crate::validation::validate_period;

// =============================================================================
// Payout Summary
// =============================================================================

/// Earned-versus-paid aggregate, either all-time or period-scoped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PayoutSummary {
    pub earned_cents: i64,
    pub paid_cents: i64,
}

impl PayoutSummary {
    #[inline]
    pub fn earned(&self) -> Money {
        Money::from_cents(self.earned_cents)
    }

    #[inline]
    pub fn paid(&self) -> Money {
        Money::from_cents(self.paid_cents)
    }

    /// Running balance still owed to Kelan.
    #[inline]
    pub fn balance(&self) -> Money {
        self.earned() - self.paid()
    }
}

/// Sums report earnings against payouts.
///
/// Order-independent: both inputs are plain sums.
pub fn summarize(
    kelan_totals: impl IntoIterator<Item = Money>,
    payments: impl IntoIterator<Item = Money>,
) -> PayoutSummary {
    PayoutSummary {
        earned_cents: kelan_totals.into_iter().sum::<Money>().cents(),
        paid_cents: payments.into_iter().sum::<Money>().cents(),
    }
}

// =============================================================================
// Payslip
// =============================================================================

/// An inclusive date range for payslip display and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PayslipPeriod {
    #[ts(as = "String")]
    pub start: NaiveDate,
    #[ts(as = "String")]
    pub end: NaiveDate,
}

impl PayslipPeriod {
    /// Builds a period, rejecting inverted ranges.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        validate_period(start, end)?;
        Ok(PayslipPeriod { start, end })
    }

    /// Inclusive on both ends.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// One earning row on a payslip: a report's Kelan total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PayslipEarning {
    #[ts(as = "String")]
    pub report_date: NaiveDate,
    pub amount_cents: i64,
}

impl PayslipEarning {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

/// A period-bounded payslip: the contributing rows plus their totals.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Payslip {
    pub period: PayslipPeriod,
    pub earnings: Vec<PayslipEarning>,
    pub payments: Vec<KelanPayment>,
    pub summary: PayoutSummary,
}

/// Builds a payslip by filtering both collections to the period and
/// summing what remains.
pub fn build_payslip(
    period: PayslipPeriod,
    reports: &[ReportSummary],
    payments: &[KelanPayment],
) -> Payslip {
    let earnings: Vec<PayslipEarning> = reports
        .iter()
        .filter(|r| period.contains(r.report_date))
        .map(|r| PayslipEarning {
            report_date: r.report_date,
            amount_cents: r.kelan_total_cents,
        })
        .collect();

    let payments: Vec<KelanPayment> = payments
        .iter()
        .filter(|p| period.contains(p.payment_date))
        .cloned()
        .collect();

    let summary = summarize(
        earnings.iter().map(PayslipEarning::amount),
        payments.iter().map(KelanPayment::amount),
    );

    Payslip {
        period,
        earnings,
        payments,
        summary,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
