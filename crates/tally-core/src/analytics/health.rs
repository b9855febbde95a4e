//! Financial health score
//!
//! Five independently capped factors summed into a 0-100 score:
//!
//! | Factor              | Max |
//! |---------------------|-----|
//! | Savings rate        | 30  |
//! | Budget adherence    | 25  |
//! | Goal progress       | 20  |
//! | Expense consistency | 15  |
//! | Emergency fund      | 10  |
//!
//! [`score_financial_health`] is pure; [`gather_health_inputs`] reads the
//! store and goal list to build its input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ledger::LedgerStore;
use crate::models::{EntryKind, Goal, GoalCategory, GoalStatus};
use crate::period::{months_back, DateRange};

use super::budget::current_month_projection;

/// Months of history feeding the score, including the current one
pub const TRAILING_MONTHS: u32 = 3;

/// Emergency fund progress of at least this share of target earns full points
const EMERGENCY_FUND_THRESHOLD: f64 = 50.0;

/// Aggregated figures the scorer needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthInputs {
    /// Income over the trailing window
    pub income: f64,
    /// Expenses over the trailing window
    pub expenses: f64,
    /// Current-month budget utilization percentage
    pub budget_utilization: f64,
    pub active_goals: usize,
    pub completed_goals: usize,
    pub active_target_total: f64,
    pub active_current_total: f64,
    /// Per-month expense totals for months that have records
    pub monthly_expenses: Vec<f64>,
    /// Progress of the emergency-fund goal, if one exists
    pub emergency_fund: Option<EmergencyFund>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmergencyFund {
    pub current: f64,
    pub target: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthStatus {
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::Fair,
            _ => Self::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One scored factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthFactor {
    pub name: String,
    pub points: u32,
    pub max_points: u32,
    pub status: HealthStatus,
    /// The measured value that drove the points, e.g. the savings rate
    pub value: f64,
}

impl HealthFactor {
    fn new(name: &str, points: u32, max_points: u32, value: f64) -> Self {
        let ratio = f64::from(points) / f64::from(max_points);
        let status = if points == max_points {
            HealthStatus::Excellent
        } else if ratio >= 0.6 {
            HealthStatus::Good
        } else if points > 0 {
            HealthStatus::Fair
        } else {
            HealthStatus::Poor
        };
        Self {
            name: name.to_string(),
            points,
            max_points,
            status,
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthScore {
    /// Integer in [0, 100]
    pub score: u32,
    pub status: HealthStatus,
    pub factors: Vec<HealthFactor>,
    pub recommendations: Vec<String>,
    pub savings_rate: f64,
    pub budget_utilization: f64,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// (income - expenses) / income as a percentage; 0 without income
pub fn savings_rate(income: f64, expenses: f64) -> f64 {
    if income > 0.0 {
        (income - expenses) / income * 100.0
    } else {
        0.0
    }
}

/// Population standard deviation over mean, as a percentage.
/// `None` with fewer than two values or a zero mean.
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean == 0.0 {
        return None;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt() / mean * 100.0)
}

/// Score the inputs
pub fn score_financial_health(inputs: &HealthInputs) -> HealthScore {
    let mut factors = Vec::with_capacity(5);
    let mut recommendations = Vec::new();

    let rate = round2(savings_rate(inputs.income, inputs.expenses));
    let points = if rate >= 20.0 {
        30
    } else if rate >= 10.0 {
        20
    } else if rate >= 0.0 {
        10
    } else {
        0
    };
    factors.push(HealthFactor::new("Savings rate", points, 30, rate));
    if rate < 10.0 {
        recommendations.push(
            "Aim to save at least 10% of your income; review discretionary spending".to_string(),
        );
    }

    let utilization = inputs.budget_utilization;
    let points = if utilization <= 80.0 {
        25
    } else if utilization <= 100.0 {
        15
    } else if utilization <= 120.0 {
        5
    } else {
        0
    };
    factors.push(HealthFactor::new("Budget adherence", points, 25, utilization));
    if utilization > 100.0 {
        recommendations.push(
            "You are over this month's budget; cut back or revisit the budget".to_string(),
        );
    }

    let goal_progress = if inputs.active_goals > 0 && inputs.active_target_total > 0.0 {
        inputs.active_current_total / inputs.active_target_total * 100.0
    } else {
        0.0
    };
    let points = if inputs.completed_goals > 0 && goal_progress >= 50.0 {
        20
    } else if goal_progress >= 25.0 {
        15
    } else if inputs.active_goals > 0 {
        10
    } else {
        0
    };
    factors.push(HealthFactor::new("Goal progress", points, 20, goal_progress));
    if inputs.active_goals == 0 {
        recommendations.push("Set a savings goal to give your money a purpose".to_string());
    }

    if let Some(cv) = coefficient_of_variation(&inputs.monthly_expenses).map(round2) {
        let points = if cv <= 20.0 {
            15
        } else if cv <= 40.0 {
            10
        } else {
            5
        };
        factors.push(HealthFactor::new("Expense consistency", points, 15, cv));
    }

    let (points, value) = match inputs.emergency_fund {
        Some(fund) => {
            let pct = if fund.target > 0.0 {
                fund.current / fund.target * 100.0
            } else {
                0.0
            };
            (if pct >= EMERGENCY_FUND_THRESHOLD { 10 } else { 5 }, pct)
        }
        None => (0, 0.0),
    };
    factors.push(HealthFactor::new("Emergency fund", points, 10, value));
    if inputs.emergency_fund.is_none() {
        recommendations
            .push("Start an emergency fund goal covering a few months of expenses".to_string());
    }

    let score = factors.iter().map(|f| f.points).sum::<u32>().min(100);

    HealthScore {
        score,
        status: HealthStatus::from_score(score),
        factors,
        recommendations,
        savings_rate: rate,
        budget_utilization: utilization,
    }
}

/// Pick the goal representing the emergency fund: an active one if any,
/// otherwise the first in any status
pub fn find_emergency_fund(goals: &[Goal]) -> Option<&Goal> {
    let mut funds = goals
        .iter()
        .filter(|g| g.category == GoalCategory::EmergencyFund);
    let first = funds.clone().next();
    funds.find(|g| g.status == GoalStatus::Active).or(first)
}

/// Build scorer inputs from the trailing window, this month's budget
/// utilization and the owner's goals
pub fn gather_health_inputs<L>(
    store: &L,
    owner: i64,
    monthly_budget: f64,
    goals: &[Goal],
    now: DateTime<Utc>,
) -> Result<HealthInputs>
where
    L: LedgerStore + ?Sized,
{
    let today = now.date_naive();
    let window = DateRange::new(months_back(today, TRAILING_MONTHS - 1), today)?;

    let income = store.sum_and_count(owner, EntryKind::Income, window)?.total;
    let expenses = store.sum_and_count(owner, EntryKind::Expense, window)?.total;
    let monthly_expenses = store
        .group_by_month(owner, EntryKind::Expense, window.start, window.end)?
        .into_iter()
        .map(|b| b.total_amount)
        .collect();
    let budget_utilization =
        current_month_projection(store, owner, monthly_budget, now)?.budget_utilization;

    let active: Vec<&Goal> = goals
        .iter()
        .filter(|g| g.status == GoalStatus::Active)
        .collect();

    Ok(HealthInputs {
        income,
        expenses,
        budget_utilization,
        active_goals: active.len(),
        completed_goals: goals
            .iter()
            .filter(|g| g.status == GoalStatus::Completed)
            .count(),
        active_target_total: active.iter().map(|g| g.target_amount).sum(),
        active_current_total: active.iter().map(|g| g.current_amount).sum(),
        monthly_expenses,
        emergency_fund: find_emergency_fund(goals).map(|g| EmergencyFund {
            current: g.current_amount,
            target: g.target_amount,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> HealthInputs {
        HealthInputs {
            income: 1000.0,
            expenses: 700.0,
            budget_utilization: 70.0,
            active_goals: 1,
            completed_goals: 0,
            active_target_total: 1000.0,
            active_current_total: 300.0,
            monthly_expenses: vec![700.0],
            emergency_fund: None,
        }
    }

    #[test]
    fn test_reference_score_is_seventy_good() {
        let result = score_financial_health(&baseline());
        assert_eq!(result.score, 70);
        assert_eq!(result.status, HealthStatus::Good);

        let names: Vec<&str> = result.factors.iter().map(|f| f.name.as_str()).collect();
        // Consistency omitted with a single month of data
        assert_eq!(
            names,
            vec!["Savings rate", "Budget adherence", "Goal progress", "Emergency fund"]
        );
        let points: Vec<u32> = result.factors.iter().map(|f| f.points).collect();
        assert_eq!(points, vec![30, 25, 15, 0]);
        assert_eq!(result.recommendations.len(), 1);
    }

    #[test]
    fn test_perfect_score() {
        let inputs = HealthInputs {
            income: 2000.0,
            expenses: 1000.0,
            budget_utilization: 50.0,
            active_goals: 1,
            completed_goals: 1,
            active_target_total: 1000.0,
            active_current_total: 600.0,
            monthly_expenses: vec![500.0, 500.0],
            emergency_fund: Some(EmergencyFund {
                current: 600.0,
                target: 1000.0,
            }),
        };
        let result = score_financial_health(&inputs);
        assert_eq!(result.score, 100);
        assert_eq!(result.status, HealthStatus::Excellent);
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_empty_ledger_is_poor() {
        let result = score_financial_health(&HealthInputs::default());
        // Zero income gives a 0% rate (10 points), zero utilization 25 points
        assert_eq!(result.score, 35);
        assert_eq!(result.status, HealthStatus::Poor);
        assert_eq!(result.recommendations.len(), 3);
    }

    #[test]
    fn test_negative_savings_and_overspend() {
        let inputs = HealthInputs {
            income: 1000.0,
            expenses: 1300.0,
            budget_utilization: 130.0,
            ..baseline()
        };
        let result = score_financial_health(&inputs);
        assert_eq!(result.factors[0].points, 0);
        assert_eq!(result.factors[1].points, 0);
        assert_eq!(result.savings_rate, -30.0);
        assert!(result.recommendations.len() >= 2);
    }

    #[test]
    fn test_consistency_bands() {
        let mut inputs = baseline();
        inputs.monthly_expenses = vec![100.0, 100.0, 100.0];
        let f = score_financial_health(&inputs);
        assert_eq!(f.factors[3].name, "Expense consistency");
        assert_eq!(f.factors[3].points, 15);

        // mean 100, population stddev 50 -> CV 50
        inputs.monthly_expenses = vec![50.0, 150.0];
        let f = score_financial_health(&inputs);
        assert_eq!(f.factors[3].points, 5);
    }

    #[test]
    fn test_emergency_fund_below_half() {
        let mut inputs = baseline();
        inputs.emergency_fund = Some(EmergencyFund {
            current: 100.0,
            target: 1000.0,
        });
        let result = score_financial_health(&inputs);
        assert_eq!(result.factors.last().unwrap().points, 5);
        assert_eq!(result.score, 75);
    }

    #[test]
    fn test_coefficient_of_variation() {
        assert_eq!(coefficient_of_variation(&[100.0]), None);
        assert_eq!(coefficient_of_variation(&[0.0, 0.0]), None);
        assert_eq!(coefficient_of_variation(&[50.0, 150.0]), Some(50.0));
    }
}
