//! # Repository Module
//!
//! Database repository implementations for Teddy Mobile.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  API Handler                                                           │
//! │       │                                                                 │
//! │       │  db.stocks().get_by_code(&code)                                │
//! │       ▼                                                                 │
//! │  StockRepository                                                       │
//! │  ├── list(&self, query)                                                │
//! │  ├── get_by_code(&self, code)                                          │
//! │  ├── insert(&self, item)                                               │
//! │  └── delete(&self, id)                                                 │
//! │       │                                                                 │
//! │       │  SQL Statement                                                  │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every method here executes exactly one statement. The insert-then-delete
//! sequences that move a device between ledger tables are deliberately NOT
//! combined into transactions: the ledger crate sequences the steps and
//! performs the compensating delete when a later step fails.
//!
//! ## Available Repositories
//!
//! - [`stock::StockRepository`] - In-stock ledger
//! - [`sold::SoldStockRepository`] - Sold ledger
//! - [`repair::RepairRepository`] - Repair ledger
//! - [`report::ProfitReportRepository`] - Saved profit reports
//! - [`payment::KelanPaymentRepository`] - Append-only payout ledger
//! - [`check::StockCheckRepository`] - Stock audit sessions
//! - [`user::UserRepository`] - Staff accounts
//! - [`preference::PreferenceRepository`] - Per-user preference records

pub mod check;
pub mod payment;
pub mod preference;
pub mod repair;
pub mod report;
pub mod sold;
pub mod stock;
pub mod user;
