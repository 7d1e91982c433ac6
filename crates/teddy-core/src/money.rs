//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely, and the
//! fixed 80/20 stakeholder split used throughout profit accounting.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In an 80/20 profit split over floats:                                  │
//! │    thabrew + kelan can drift away from profit by fractions of a cent   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    kelan  = round(profit × 20%)                                         │
//! │    thabrew = profit − kelan                                             │
//! │    The two shares ALWAYS sum to the profit, to the cent                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use teddy_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(1099); // Rs 10.99
//!
//! // Arithmetic operations
//! let total = price + Money::from_cents(500); // Rs 15.99
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::KELAN_SHARE_BPS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for losses and refunds
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// Every monetary value in the system flows through this type: stock cost,
/// wholesale and retail prices, sale revenue, split shares, payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use teddy_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents Rs 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// ## Example
    /// ```rust
    /// use teddy_core::money::Money;
    ///
    /// let price = Money::from_rupees(80_000); // Rs 80,000.00
    /// assert_eq!(price.cents(), 8_000_000);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (rupees) portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Applies a basis-point share with half-up rounding.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. The +5000 provides
    /// rounding (5000/10000 = 0.5). i128 intermediate prevents overflow on
    /// large amounts. Negative amounts round symmetrically (away from zero).
    ///
    /// ## Example
    /// ```rust
    /// use teddy_core::money::Money;
    ///
    /// let profit = Money::from_cents(2_000_000); // Rs 20,000.00
    /// let kelan = profit.share_bps(2_000);       // 20%
    /// assert_eq!(kelan.cents(), 400_000);
    /// ```
    pub fn share_bps(&self, bps: u32) -> Money {
        let raw = self.0 as i128 * bps as i128;
        let share = if raw >= 0 {
            (raw + 5_000) / 10_000
        } else {
            (raw - 5_000) / 10_000
        };
        Money::from_cents(share as i64)
    }

    /// Splits this amount (a profit) into the fixed 80/20 stakeholder shares.
    ///
    /// Kelan's share is the rounded 20%; Thabrew's is the remainder, so the
    /// two shares always sum back to the original amount exactly.
    ///
    /// ## Example
    /// ```rust
    /// use teddy_core::money::Money;
    ///
    /// let split = Money::from_cents(2_000_000).split_shares();
    /// assert_eq!(split.thabrew.cents(), 1_600_000);
    /// assert_eq!(split.kelan.cents(), 400_000);
    /// ```
    pub fn split_shares(&self) -> ProfitSplit {
        let kelan = self.share_bps(KELAN_SHARE_BPS);
        ProfitSplit {
            thabrew: *self - kelan,
            kelan,
        }
    }
}

// =============================================================================
// Profit Split
// =============================================================================

/// The fixed 80/20 division of a profit amount between the two stakeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfitSplit {
    /// Majority stakeholder's share (80%).
    pub thabrew: Money,
    /// Minority stakeholder's share (20%).
    pub kelan: Money,
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. Use frontend formatting for actual UI
/// display to handle digit grouping properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rs {}.{:02}", sign, self.rupees().abs(), self.cents_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Summing an iterator of Money values (ledger totals).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
