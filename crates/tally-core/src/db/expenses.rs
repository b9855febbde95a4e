//! Expense operations

use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::record_filter::ExpenseFilter;
use super::{parse_date_column, parse_datetime, parse_enum, parse_tags, tags_to_json, Database};
use crate::categorize::suggest_category;
use crate::error::{Error, Result};
use crate::models::{Expense, NewExpense};

pub(crate) const EXPENSE_COLUMNS: &str = "id, user_id, amount, description, category, subcategory, \
     tags, location, notes, date, payment_method, is_recurring, recurring_frequency, \
     ai_generated, ai_confidence, created_at";

pub(crate) fn row_to_expense(row: &Row) -> rusqlite::Result<Expense> {
    let category: String = row.get(4)?;
    let date: String = row.get(9)?;
    let payment_method: String = row.get(10)?;
    let frequency: Option<String> = row.get(12)?;
    let created_at: String = row.get(15)?;

    Ok(Expense {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        description: row.get(3)?,
        category: parse_enum(&category)?,
        subcategory: row.get(5)?,
        tags: parse_tags(row.get(6)?)?,
        location: row.get(7)?,
        notes: row.get(8)?,
        date: parse_date_column(&date)?,
        payment_method: parse_enum(&payment_method)?,
        is_recurring: row.get(11)?,
        recurring_frequency: frequency.as_deref().map(parse_enum).transpose()?,
        ai_generated: row.get(13)?,
        ai_confidence: row.get(14)?,
        created_at: parse_datetime(&created_at)?,
    })
}

impl NewExpense {
    pub fn validate(&self) -> Result<()> {
        if !(self.amount > 0.0) || !self.amount.is_finite() {
            return Err(Error::Validation(
                "Expense amount must be greater than 0".into(),
            ));
        }
        if self.description.trim().is_empty() {
            return Err(Error::Validation("Expense description is required".into()));
        }
        if self.is_recurring && self.recurring_frequency.is_none() {
            return Err(Error::Validation(
                "Recurring expenses need a frequency".into(),
            ));
        }
        Ok(())
    }
}

impl Database {
    /// Record an expense for `owner`
    ///
    /// When no category is given, one is suggested from the description and
    /// the record is flagged as inferred.
    pub fn create_expense(&self, owner: i64, expense: &NewExpense) -> Result<Expense> {
        expense.validate()?;

        let (category, ai_generated, ai_confidence) = match expense.category {
            Some(category) => (category, false, None),
            None => {
                let suggestion = suggest_category(&expense.description)?;
                (suggestion.category, true, Some(suggestion.confidence))
            }
        };

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO expenses (user_id, amount, description, category, subcategory, tags, location,
                                  notes, date, payment_method, is_recurring, recurring_frequency,
                                  ai_generated, ai_confidence)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                owner,
                expense.amount,
                expense.description.trim(),
                category.as_str(),
                expense.subcategory,
                tags_to_json(&expense.tags)?,
                expense.location,
                expense.notes,
                expense.date.to_string(),
                expense.payment_method.as_str(),
                expense.is_recurring,
                expense.recurring_frequency.map(|f| f.as_str()),
                ai_generated,
                ai_confidence,
            ],
        )?;
        let id = conn.last_insert_rowid();
        info!(user_id = owner, expense_id = id, amount = expense.amount, category = %category, "Recorded expense");

        self.get_expense(owner, id)
    }

    /// Get one of `owner`'s expenses
    pub fn get_expense(&self, owner: i64, id: i64) -> Result<Expense> {
        let conn = self.conn()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM expenses WHERE id = ? AND user_id = ?",
                EXPENSE_COLUMNS
            ),
            params![id, owner],
            row_to_expense,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Expense {}", id)))
    }

    /// List `owner`'s expenses matching a filter, one page at a time
    pub fn list_expenses(
        &self,
        owner: i64,
        filter: &ExpenseFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let clauses = filter.build(owner);
        let sql = format!(
            "SELECT {} FROM expenses {} {} LIMIT ? OFFSET ?",
            EXPENSE_COLUMNS,
            clauses.where_clause(),
            clauses.order_clause()
        );
        let params = clauses.into_paged_params(limit, offset);
        let refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let expenses = stmt
            .query_map(refs.as_slice(), row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(expenses)
    }

    /// Count `owner`'s expenses matching a filter
    pub fn count_expenses(&self, owner: i64, filter: &ExpenseFilter) -> Result<i64> {
        let conn = self.conn()?;
        let clauses = filter.build(owner);
        let sql = format!("SELECT COUNT(*) FROM expenses {}", clauses.where_clause());
        let count = conn.query_row(&sql, clauses.params_refs().as_slice(), |row| row.get(0))?;
        Ok(count)
    }

    /// Delete one of `owner`'s expenses
    pub fn delete_expense(&self, owner: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM expenses WHERE id = ? AND user_id = ?",
            params![id, owner],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Expense {}", id)));
        }
        info!(user_id = owner, expense_id = id, "Deleted expense");
        Ok(())
    }
}
