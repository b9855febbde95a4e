//! Income operations

use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::record_filter::IncomeFilter;
use super::{parse_date_column, parse_datetime, parse_enum, Database};
use crate::error::{Error, Result};
use crate::models::{Income, NewIncome};

const INCOME_COLUMNS: &str = "id, user_id, amount, source, description, date, is_recurring, \
     recurring_frequency, next_expected_date, created_at";

fn row_to_income(row: &Row) -> rusqlite::Result<Income> {
    let source: String = row.get(3)?;
    let date: String = row.get(5)?;
    let frequency: Option<String> = row.get(7)?;
    let next_expected: Option<String> = row.get(8)?;
    let created_at: String = row.get(9)?;

    Ok(Income {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        source: parse_enum(&source)?,
        description: row.get(4)?,
        date: parse_date_column(&date)?,
        is_recurring: row.get(6)?,
        recurring_frequency: frequency.as_deref().map(parse_enum).transpose()?,
        next_expected_date: next_expected.as_deref().map(parse_date_column).transpose()?,
        created_at: parse_datetime(&created_at)?,
    })
}

impl NewIncome {
    pub fn validate(&self) -> Result<()> {
        if !(self.amount > 0.0) || !self.amount.is_finite() {
            return Err(Error::Validation(
                "Income amount must be greater than 0".into(),
            ));
        }
        if self.is_recurring && self.recurring_frequency.is_none() {
            return Err(Error::Validation("Recurring income needs a frequency".into()));
        }
        Ok(())
    }
}

impl Database {
    /// Record an income event for `owner`, deriving the next expected date
    /// for recurring income
    pub fn create_income(&self, owner: i64, income: &NewIncome) -> Result<Income> {
        income.validate()?;
        let mut income = income.clone();
        income.derive_next_expected_date();

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO incomes (user_id, amount, source, description, date, is_recurring,
                                 recurring_frequency, next_expected_date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                owner,
                income.amount,
                income.source.as_str(),
                income.description,
                income.date.to_string(),
                income.is_recurring,
                income.recurring_frequency.map(|f| f.as_str()),
                income.next_expected_date.map(|d| d.to_string()),
            ],
        )?;
        let id = conn.last_insert_rowid();
        info!(user_id = owner, income_id = id, amount = income.amount, source = %income.source, "Recorded income");

        self.get_income(owner, id)
    }

    pub fn get_income(&self, owner: i64, id: i64) -> Result<Income> {
        let conn = self.conn()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM incomes WHERE id = ? AND user_id = ?",
                INCOME_COLUMNS
            ),
            params![id, owner],
            row_to_income,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Income {}", id)))
    }

    pub fn list_incomes(
        &self,
        owner: i64,
        filter: &IncomeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Income>> {
        let conn = self.conn()?;
        let clauses = filter.build(owner);
        let sql = format!(
            "SELECT {} FROM incomes {} {} LIMIT ? OFFSET ?",
            INCOME_COLUMNS,
            clauses.where_clause(),
            clauses.order_clause()
        );
        let params = clauses.into_paged_params(limit, offset);
        let refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let incomes = stmt
            .query_map(refs.as_slice(), row_to_income)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(incomes)
    }

    pub fn count_incomes(&self, owner: i64, filter: &IncomeFilter) -> Result<i64> {
        let conn = self.conn()?;
        let clauses = filter.build(owner);
        let sql = format!("SELECT COUNT(*) FROM incomes {}", clauses.where_clause());
        let count = conn.query_row(&sql, clauses.params_refs().as_slice(), |row| row.get(0))?;
        Ok(count)
    }

    pub fn delete_income(&self, owner: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM incomes WHERE id = ? AND user_id = ?",
            params![id, owner],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Income {}", id)));
        }
        info!(user_id = owner, income_id = id, "Deleted income");
        Ok(())
    }
}
