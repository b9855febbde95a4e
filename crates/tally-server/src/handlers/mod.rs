//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod analytics;
pub mod expenses;
pub mod export;
pub mod goals;
pub mod incomes;
pub mod users;

// Re-export all handlers for use in router
pub use analytics::*;
pub use expenses::*;
pub use export::*;
pub use goals::*;
pub use incomes::*;
pub use users::*;
