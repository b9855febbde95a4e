//! Reports that combine ledger aggregates with the owner's profile and goals

use chrono::{DateTime, Utc};
use tracing::debug;

use super::Database;
use crate::analytics::{
    current_month_projection, gather_health_inputs, score_financial_health, BudgetProjection,
    HealthScore,
};
use crate::error::Result;

impl Database {
    /// Project this month's spend against the owner's monthly budget
    pub fn budget_projection(&self, owner: i64, now: DateTime<Utc>) -> Result<BudgetProjection> {
        let user = self.get_user(owner)?;
        current_month_projection(self, owner, user.monthly_budget, now)
    }

    /// Score the owner's financial health over the trailing window
    pub fn financial_health(&self, owner: i64, now: DateTime<Utc>) -> Result<HealthScore> {
        let user = self.get_user(owner)?;
        let goals = self.list_goals(owner, None)?;
        let inputs = gather_health_inputs(self, owner, user.monthly_budget, &goals, now)?;
        debug!(user_id = owner, ?inputs, "Scoring financial health");
        Ok(score_financial_health(&inputs))
    }
}
