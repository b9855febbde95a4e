//! Tally Core Library
//!
//! Shared functionality for the Tally personal finance tracker:
//! - SQLite record store with optional SQLCipher encryption
//! - Ledger query contract used by every report
//! - Period windows for period-over-period comparison
//! - Trend, budget projection and financial health analytics
//! - Savings goal engine (contributions, milestones, auto-save)
//! - Keyword category suggestions and CSV export
//!
//! Nothing in this crate reads the clock: operations that depend on the
//! current time take `now` as a parameter.

pub mod analytics;
pub mod categorize;
pub mod db;
pub mod error;
pub mod export;
pub mod goals;
pub mod ledger;
pub mod models;
pub mod period;

pub use categorize::{suggest_category, CategorySuggester, CategorySuggestion};
pub use db::{Database, ExpenseFilter, IncomeFilter, SortField, SortOrder};
pub use error::{Error, Result};
pub use export::ExpenseExportOptions;
pub use ledger::LedgerStore;
pub use period::{DateRange, Period, PeriodWindows};
