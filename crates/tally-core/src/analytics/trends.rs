//! Aggregation and trend reports over the ledger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ledger::LedgerStore;
use crate::models::{
    AmountStats, EntryKind, GroupKey, GroupTotal, MonthBucket, Totals, WeekdayBucket,
};
use crate::period::{months_back, DateRange, Period};

/// Months covered by a trend report when none are requested
pub const DEFAULT_TREND_MONTHS: u32 = 6;

/// Category breakdown for expenses, source breakdown for income
pub fn breakdown<L>(store: &L, owner: i64, kind: EntryKind, range: DateRange) -> Result<Vec<GroupTotal>>
where
    L: LedgerStore + ?Sized,
{
    let key = match kind {
        EntryKind::Expense => GroupKey::Category,
        EntryKind::Income => GroupKey::Source,
    };
    store.group_by(owner, kind, range, key)
}

pub fn payment_method_breakdown<L>(store: &L, owner: i64, range: DateRange) -> Result<Vec<GroupTotal>>
where
    L: LedgerStore + ?Sized,
{
    store.group_by(owner, EntryKind::Expense, range, GroupKey::PaymentMethod)
}

/// Per-month totals from the first day of the month `months` back through
/// today, oldest first. Months without records are left out.
pub fn monthly_trend<L>(
    store: &L,
    owner: i64,
    kind: EntryKind,
    months: u32,
    now: DateTime<Utc>,
) -> Result<Vec<MonthBucket>>
where
    L: LedgerStore + ?Sized,
{
    let today = now.date_naive();
    store.group_by_month(owner, kind, months_back(today, months), today)
}

/// Spending per day of week, Sunday first; empty days are left out
pub fn weekday_pattern<L>(store: &L, owner: i64, range: DateRange) -> Result<Vec<WeekdayBucket>>
where
    L: LedgerStore + ?Sized,
{
    store.group_by_weekday(owner, range)
}

pub fn transaction_sizes<L>(store: &L, owner: i64, range: DateRange) -> Result<Vec<AmountStats>>
where
    L: LedgerStore + ?Sized,
{
    store.amount_stats_by_category(owner, range)
}

/// One ledger side compared across two windows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowComparison {
    pub current: Totals,
    pub previous: Totals,
    /// Percent change of the total; `None` when the previous total is 0
    pub change_percentage: Option<f64>,
}

impl WindowComparison {
    fn new(current: Totals, previous: Totals) -> Self {
        let change_percentage = if previous.total > 0.0 {
            Some((current.total - previous.total) / previous.total * 100.0)
        } else {
            None
        };
        Self {
            current,
            previous,
            change_percentage,
        }
    }
}

/// Dashboard summary for one period against the period before it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub period: Period,
    pub current: DateRange,
    pub previous: DateRange,
    pub expenses: WindowComparison,
    pub income: WindowComparison,
    /// Current income minus current expenses
    pub net_savings: f64,
    /// Net savings as a percentage of current income; 0 without income
    pub savings_rate: f64,
}

pub fn period_summary<L>(store: &L, owner: i64, period: Period, now: DateTime<Utc>) -> Result<PeriodSummary>
where
    L: LedgerStore + ?Sized,
{
    let windows = period.windows(now);

    let expenses = WindowComparison::new(
        store.sum_and_count(owner, EntryKind::Expense, windows.current)?,
        store.sum_and_count(owner, EntryKind::Expense, windows.previous)?,
    );
    let income = WindowComparison::new(
        store.sum_and_count(owner, EntryKind::Income, windows.current)?,
        store.sum_and_count(owner, EntryKind::Income, windows.previous)?,
    );

    let net_savings = income.current.total - expenses.current.total;
    let savings_rate = if income.current.total > 0.0 {
        net_savings / income.current.total * 100.0
    } else {
        0.0
    };

    Ok(PeriodSummary {
        period,
        current: windows.current,
        previous: windows.previous,
        expenses,
        income,
        net_savings,
        savings_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_percentage_without_previous() {
        let cmp = WindowComparison::new(
            Totals {
                total: 50.0,
                count: 1,
            },
            Totals::default(),
        );
        assert_eq!(cmp.change_percentage, None);

        let cmp = WindowComparison::new(
            Totals {
                total: 150.0,
                count: 3,
            },
            Totals {
                total: 100.0,
                count: 2,
            },
        );
        assert_eq!(cmp.change_percentage, Some(50.0));
    }
}
