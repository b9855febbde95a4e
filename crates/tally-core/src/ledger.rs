//! Ledger query contract
//!
//! Owner- and date-scoped aggregate reads over the record store. Every
//! analytics engine is written against this trait; [`crate::Database`] is the
//! production implementation.

use chrono::NaiveDate;

use crate::db::{ExpenseFilter, IncomeFilter};
use crate::error::Result;
use crate::models::{
    AmountStats, EntryKind, Expense, GroupKey, GroupTotal, Income, MonthBucket, Totals,
    WeekdayBucket,
};
use crate::period::DateRange;

pub trait LedgerStore {
    /// Sum and count of `kind` records dated within `range`
    fn sum_and_count(&self, owner: i64, kind: EntryKind, range: DateRange) -> Result<Totals>;

    /// Records partitioned by `key`, ordered by total descending.
    /// Fails with a validation error when `key` does not exist on `kind`.
    fn group_by(
        &self,
        owner: i64,
        kind: EntryKind,
        range: DateRange,
        key: GroupKey,
    ) -> Result<Vec<GroupTotal>>;

    /// Calendar-month buckets from `since` through `until`, ascending.
    /// Months with no records are omitted.
    fn group_by_month(
        &self,
        owner: i64,
        kind: EntryKind,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<MonthBucket>>;

    /// Expense buckets per day of week, Sunday first, empty days omitted
    fn group_by_weekday(&self, owner: i64, range: DateRange) -> Result<Vec<WeekdayBucket>>;

    /// Per-category expense amount distribution, ordered by total descending
    fn amount_stats_by_category(&self, owner: i64, range: DateRange) -> Result<Vec<AmountStats>>;

    fn find_expenses(
        &self,
        owner: i64,
        filter: &ExpenseFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Expense>>;

    fn count_expenses(&self, owner: i64, filter: &ExpenseFilter) -> Result<i64>;

    fn find_incomes(
        &self,
        owner: i64,
        filter: &IncomeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Income>>;

    fn count_incomes(&self, owner: i64, filter: &IncomeFilter) -> Result<i64>;
}
