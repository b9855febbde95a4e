//! Analytics engines over the ledger
//!
//! - `trends` - breakdowns, monthly trend, weekday pattern, period summary
//! - `budget` - current-month projection and category budget suggestion
//! - `health` - five-factor financial health score
//!
//! Store-backed entry points are generic over [`crate::ledger::LedgerStore`];
//! the projection and scoring math are plain functions of their inputs.

pub mod budget;
pub mod health;
pub mod trends;

pub use budget::{
    current_month_projection, project_budget, suggest_category_budgets, BudgetInputs,
    BudgetProjection, BudgetStatus, CategoryBudget,
};
pub use health::{
    gather_health_inputs, score_financial_health, EmergencyFund, HealthFactor, HealthInputs,
    HealthScore, HealthStatus,
};
pub use trends::{
    breakdown, monthly_trend, payment_method_breakdown, period_summary, transaction_sizes,
    weekday_pattern, PeriodSummary, WindowComparison, DEFAULT_TREND_MONTHS,
};
