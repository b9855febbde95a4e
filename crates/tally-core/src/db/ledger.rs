//! Aggregate ledger queries

use chrono::NaiveDate;
use rusqlite::params;

use super::{Database, ExpenseFilter, IncomeFilter};
use crate::error::{Error, Result};
use crate::ledger::LedgerStore;
use crate::models::{
    weekday_name, AmountStats, EntryKind, Expense, GroupKey, GroupTotal, Income, MonthBucket,
    Totals, WeekdayBucket,
};
use crate::period::DateRange;

impl LedgerStore for Database {
    fn sum_and_count(&self, owner: i64, kind: EntryKind, range: DateRange) -> Result<Totals> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT COALESCE(SUM(amount), 0), COUNT(*) FROM {} \
             WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3",
            kind.table()
        );
        let totals = conn.query_row(
            &sql,
            params![owner, range.start.to_string(), range.end.to_string()],
            |row| {
                Ok(Totals {
                    total: row.get(0)?,
                    count: row.get(1)?,
                })
            },
        )?;
        Ok(totals)
    }

    fn group_by(
        &self,
        owner: i64,
        kind: EntryKind,
        range: DateRange,
        key: GroupKey,
    ) -> Result<Vec<GroupTotal>> {
        if !key.applies_to(kind) {
            return Err(Error::Validation(format!(
                "Cannot group {} records by {:?}",
                kind.as_str(),
                key
            )));
        }

        let conn = self.conn()?;
        let sql = format!(
            r#"
            SELECT {col}, SUM(amount) AS total, COUNT(*), AVG(amount)
            FROM {table}
            WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3
            GROUP BY {col}
            ORDER BY total DESC, {col} ASC
            "#,
            col = key.column(),
            table = kind.table()
        );
        let mut stmt = conn.prepare(&sql)?;
        let groups = stmt
            .query_map(
                params![owner, range.start.to_string(), range.end.to_string()],
                |row| {
                    Ok(GroupTotal {
                        key: row.get(0)?,
                        total_amount: row.get(1)?,
                        count: row.get(2)?,
                        avg_amount: row.get(3)?,
                    })
                },
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(groups)
    }

    fn group_by_month(
        &self,
        owner: i64,
        kind: EntryKind,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<MonthBucket>> {
        let conn = self.conn()?;
        let sql = format!(
            r#"
            SELECT CAST(strftime('%Y', date) AS INTEGER) AS y,
                   CAST(strftime('%m', date) AS INTEGER) AS m,
                   SUM(amount), COUNT(*)
            FROM {}
            WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3
            GROUP BY y, m
            ORDER BY y ASC, m ASC
            "#,
            kind.table()
        );
        let mut stmt = conn.prepare(&sql)?;
        let buckets = stmt
            .query_map(
                params![owner, since.to_string(), until.to_string()],
                |row| {
                    Ok(MonthBucket {
                        year: row.get(0)?,
                        month: row.get(1)?,
                        total_amount: row.get(2)?,
                        count: row.get(3)?,
                    })
                },
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(buckets)
    }

    fn group_by_weekday(&self, owner: i64, range: DateRange) -> Result<Vec<WeekdayBucket>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT CAST(strftime('%w', date) AS INTEGER) AS dow,
                   SUM(amount), COUNT(*), AVG(amount)
            FROM expenses
            WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3
            GROUP BY dow
            ORDER BY dow ASC
            "#,
        )?;
        let buckets = stmt
            .query_map(
                params![owner, range.start.to_string(), range.end.to_string()],
                |row| {
                    let day_index: u32 = row.get(0)?;
                    Ok(WeekdayBucket {
                        day_index,
                        day_name: weekday_name(day_index).to_string(),
                        total_amount: row.get(1)?,
                        count: row.get(2)?,
                        avg_amount: row.get(3)?,
                    })
                },
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(buckets)
    }

    fn amount_stats_by_category(&self, owner: i64, range: DateRange) -> Result<Vec<AmountStats>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT category, SUM(amount) AS total, AVG(amount), MIN(amount), MAX(amount), COUNT(*)
            FROM expenses
            WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3
            GROUP BY category
            ORDER BY total DESC, category ASC
            "#,
        )?;
        let stats = stmt
            .query_map(
                params![owner, range.start.to_string(), range.end.to_string()],
                |row| {
                    Ok(AmountStats {
                        category: row.get(0)?,
                        total_amount: row.get(1)?,
                        avg_amount: row.get(2)?,
                        min_amount: row.get(3)?,
                        max_amount: row.get(4)?,
                        count: row.get(5)?,
                    })
                },
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(stats)
    }

    fn find_expenses(
        &self,
        owner: i64,
        filter: &ExpenseFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Expense>> {
        self.list_expenses(owner, filter, limit, offset)
    }

    fn count_expenses(&self, owner: i64, filter: &ExpenseFilter) -> Result<i64> {
        Database::count_expenses(self, owner, filter)
    }

    fn find_incomes(
        &self,
        owner: i64,
        filter: &IncomeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Income>> {
        self.list_incomes(owner, filter, limit, offset)
    }

    fn count_incomes(&self, owner: i64, filter: &IncomeFilter) -> Result<i64> {
        Database::count_incomes(self, owner, filter)
    }
}
