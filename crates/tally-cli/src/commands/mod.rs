//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and status commands plus shared utilities (open_db, require_user)
//! - `users` - User profile and budget commands
//! - `records` - Expense and income commands
//! - `goals` - Savings goal commands
//! - `reports` - Analytics report commands
//! - `export` - CSV export
//! - `serve` - Web server command

pub mod core;
pub mod export;
pub mod goals;
pub mod records;
pub mod reports;
pub mod serve;
pub mod users;

// Re-export command functions for main.rs
pub use core::*;
pub use export::*;
pub use goals::*;
pub use records::*;
pub use reports::*;
pub use serve::*;
pub use users::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Parse an optional enum-like argument, naming the flag on failure
pub fn parse_arg<T>(value: Option<&str>, flag: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .map(|v| v.parse::<T>())
        .transpose()
        .map_err(|e| anyhow::anyhow!("Invalid --{}: {}", flag, e))
}
