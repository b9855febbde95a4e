//! Budget projection for the current month
//!
//! Linear extrapolation from the spend so far. No smoothing and no weighting
//! of recent days.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ledger::LedgerStore;
use crate::models::{days_in_month, EntryKind, ExpenseCategory};
use crate::period::Period;

/// Raw inputs for a projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetInputs {
    pub spend: f64,
    /// 0 means no budget is set
    pub budget: f64,
    /// Day of month, 1-based
    pub today: u32,
    pub days_in_month: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetStatus {
    OnTrack,
    Warning,
    ProjectedOverspend,
    OverBudget,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTrack => "on-track",
            Self::Warning => "warning",
            Self::ProjectedOverspend => "projected-overspend",
            Self::OverBudget => "over-budget",
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetProjection {
    pub monthly_budget: f64,
    pub current_spending: f64,
    pub budget_utilization: f64,
    pub remaining_budget: f64,
    pub daily_average: f64,
    pub projected_monthly_total: f64,
    pub projected_overspend: f64,
    pub recommended_daily_spending: f64,
    pub days_elapsed: u32,
    pub days_remaining: u32,
    pub status: BudgetStatus,
}

/// Project month-end spend and classify budget health
pub fn project_budget(inputs: &BudgetInputs) -> BudgetProjection {
    let BudgetInputs {
        spend,
        budget,
        today,
        days_in_month,
    } = *inputs;

    let utilization = if budget > 0.0 {
        spend / budget * 100.0
    } else {
        0.0
    };
    let remaining = budget - spend;
    let daily_average = if today > 0 {
        spend / f64::from(today)
    } else {
        0.0
    };
    let projected = daily_average * f64::from(days_in_month);
    let days_remaining = days_in_month.saturating_sub(today);
    let recommended_daily = if days_remaining > 0 {
        remaining / f64::from(days_remaining)
    } else {
        0.0
    };

    let status = if utilization > 100.0 {
        BudgetStatus::OverBudget
    } else if utilization > 80.0 {
        BudgetStatus::Warning
    } else if projected > budget {
        BudgetStatus::ProjectedOverspend
    } else {
        BudgetStatus::OnTrack
    };

    BudgetProjection {
        monthly_budget: budget,
        current_spending: spend,
        budget_utilization: utilization,
        remaining_budget: remaining,
        daily_average,
        projected_monthly_total: projected,
        projected_overspend: projected - budget,
        recommended_daily_spending: recommended_daily,
        days_elapsed: today,
        days_remaining,
        status,
    }
}

/// Gather this month's spend for `owner` and project it against `budget`
pub fn current_month_projection<L>(
    store: &L,
    owner: i64,
    budget: f64,
    now: DateTime<Utc>,
) -> Result<BudgetProjection>
where
    L: LedgerStore + ?Sized,
{
    let today = now.date_naive();
    let month = Period::Month.windows(now).current;
    let spend = store.sum_and_count(owner, EntryKind::Expense, month)?.total;

    Ok(project_budget(&BudgetInputs {
        spend,
        budget,
        today: today.day(),
        days_in_month: days_in_month(today),
    }))
}

/// Fixed split of a monthly budget across spending categories
pub const CATEGORY_ALLOCATION: [(ExpenseCategory, f64); 5] = [
    (ExpenseCategory::Food, 35.0),
    (ExpenseCategory::Transport, 15.0),
    (ExpenseCategory::Entertainment, 20.0),
    (ExpenseCategory::Education, 15.0),
    (ExpenseCategory::Other, 15.0),
];

/// One line of a category budget suggestion. Advisory entries carry no
/// category and a message instead of an amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBudget {
    pub category: Option<ExpenseCategory>,
    pub percentage: f64,
    pub suggested_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub fn suggest_category_budgets(budget: f64) -> Vec<CategoryBudget> {
    if budget <= 0.0 {
        return vec![CategoryBudget {
            category: None,
            percentage: 0.0,
            suggested_amount: 0.0,
            message: Some("Set a monthly budget to get category suggestions".to_string()),
        }];
    }

    CATEGORY_ALLOCATION
        .iter()
        .map(|&(category, pct)| CategoryBudget {
            category: Some(category),
            percentage: pct,
            suggested_amount: budget * pct / 100.0,
            message: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(spend: f64, budget: f64, today: u32) -> BudgetInputs {
        BudgetInputs {
            spend,
            budget,
            today,
            days_in_month: 30,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_on_track_at_half_utilization() {
        // 500 spent by day 20 of 30 projects to 750
        let p = project_budget(&inputs(500.0, 1000.0, 20));
        assert!(approx(p.budget_utilization, 50.0));
        assert!(approx(p.projected_monthly_total, 750.0));
        assert_eq!(p.status, BudgetStatus::OnTrack);
    }

    #[test]
    fn test_warning_above_eighty() {
        let p = project_budget(&inputs(850.0, 1000.0, 28));
        assert!(approx(p.budget_utilization, 85.0));
        assert_eq!(p.status, BudgetStatus::Warning);
    }

    #[test]
    fn test_over_budget() {
        let p = project_budget(&inputs(1050.0, 1000.0, 29));
        assert_eq!(p.status, BudgetStatus::OverBudget);
        assert_eq!(p.remaining_budget, -50.0);
    }

    #[test]
    fn test_projected_overspend_at_sixty() {
        // 600 by day 10 projects to 1800
        let p = project_budget(&inputs(600.0, 1000.0, 10));
        assert!(approx(p.budget_utilization, 60.0));
        assert!(approx(p.projected_monthly_total, 1800.0));
        assert!(approx(p.projected_overspend, 800.0));
        assert_eq!(p.status, BudgetStatus::ProjectedOverspend);
    }

    #[test]
    fn test_recommended_daily_and_last_day() {
        let p = project_budget(&inputs(400.0, 1000.0, 10));
        assert_eq!(p.days_remaining, 20);
        assert_eq!(p.recommended_daily_spending, 30.0);

        let p = project_budget(&inputs(400.0, 1000.0, 30));
        assert_eq!(p.days_remaining, 0);
        assert_eq!(p.recommended_daily_spending, 0.0);
    }

    #[test]
    fn test_unset_budget() {
        let p = project_budget(&inputs(120.0, 0.0, 12));
        assert_eq!(p.budget_utilization, 0.0);
        assert_eq!(p.daily_average, 10.0);
        // Any spend projects past a zero budget
        assert_eq!(p.status, BudgetStatus::ProjectedOverspend);

        let p = project_budget(&inputs(0.0, 0.0, 12));
        assert_eq!(p.status, BudgetStatus::OnTrack);
    }

    #[test]
    fn test_category_suggestions() {
        let s = suggest_category_budgets(2000.0);
        assert_eq!(s.len(), 5);
        assert_eq!(s[0].category, Some(ExpenseCategory::Food));
        assert_eq!(s[0].suggested_amount, 700.0);
        let total: f64 = s.iter().map(|c| c.percentage).sum();
        assert_eq!(total, 100.0);

        let advisory = suggest_category_budgets(0.0);
        assert_eq!(advisory.len(), 1);
        assert!(advisory[0].category.is_none());
        assert!(advisory[0].message.is_some());
    }
}
