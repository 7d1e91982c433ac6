//! # teddy-core: Pure Business Logic for Teddy Mobile
//!
//! This crate is the **heart** of the Teddy Mobile inventory system. It
//! contains all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Teddy Mobile Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   Frontend (React)                              │   │
//! │  │    Stock UI ──► Profit Tool ──► Reports ──► Stock Check        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP JSON                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   apps/api (axum handlers)                      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ teddy-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │ worksheet │  │   audit   │  │  payout   │  │   │
//! │  │   │   Money   │  │ 80/20     │  │  session  │  │  balance  │  │   │
//! │  │   │   split   │  │ ledgers   │  │  machine  │  │  payslip  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        teddy-ledger (sagas) + teddy-db (SQLite gateway)         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (StockItem, RepairRecord, KelanPayment, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`code`] - Shop code (`TDY-####`) and audit query normalization
//! - [`sale`] - Sale line entries and the 80/20 split ledger lines
//! - [`worksheet`] - The profit split engine working state
//! - [`audit`] - Stock audit session state machine
//! - [`payout`] - Kelan payment balance and payslip aggregation
//! - [`analytics`] - Range statistics and weekday profit profiles
//! - [`document`] - Data model handed to report renderers
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use teddy_core::money::Money;
//!
//! // A phone sold for Rs 100,000.00 that cost Rs 80,000.00
//! let revenue = Money::from_cents(10_000_000);
//! let cost = Money::from_cents(8_000_000);
//!
//! let split = (revenue - cost).split_shares();
//! assert_eq!(split.thabrew.cents(), 1_600_000); // 80%
//! assert_eq!(split.kelan.cents(), 400_000);     // 20%
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod audit;
pub mod code;
pub mod document;
pub mod error;
pub mod money;
pub mod payout;
pub mod sale;
pub mod types;
pub mod validation;
pub mod worksheet;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use teddy_core::Money` instead of
// `use teddy_core::money::Money`

pub use audit::{AuditQuery, VerifyOutcome};
pub use code::ShopCode;
pub use error::{CoreError, ValidationError};
pub use money::{Money, ProfitSplit};
pub use sale::*;
pub use types::*;
pub use worksheet::Worksheet;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Thabrew's (majority stakeholder) share of net profit, in basis points.
pub const THABREW_SHARE_BPS: u32 = 8_000;

/// Kelan's (minority stakeholder) share of net profit, in basis points.
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so 2000 bps = 20%. Integer basis points
/// keep the split arithmetic exact (no floating point).
pub const KELAN_SHARE_BPS: u32 = 2_000;

/// Prefix for human-assigned shop inventory codes (`TDY-####`).
pub const SHOP_CODE_PREFIX: &str = "TDY";
