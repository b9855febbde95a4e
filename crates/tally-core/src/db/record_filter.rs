//! Filter builders for listing ledger records
//!
//! Each builder produces a WHERE clause, ORDER BY clause and boxed params so
//! the list and count queries share one definition of "matching".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{ExpenseCategory, IncomeSource, PaymentMethod};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Date,
    Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "amount" => Ok(Self::Amount),
            _ => Err(format!("Unknown sort field: {} (valid: date, amount)", s)),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(format!("Unknown sort order: {} (valid: asc, desc)", s)),
        }
    }
}

/// Builder for expense list queries
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter<'query> {
    pub category: Option<ExpenseCategory>,
    pub payment_method: Option<PaymentMethod>,
    pub search: Option<&'query str>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub recurring_only: bool,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

impl<'query> ExpenseFilter<'query> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: Option<ExpenseCategory>) -> Self {
        self.category = category;
        self
    }

    pub fn payment_method(mut self, method: Option<PaymentMethod>) -> Self {
        self.payment_method = method;
        self
    }

    /// Case-insensitive substring match on description and notes
    pub fn search(mut self, query: Option<&'query str>) -> Self {
        self.search = query;
        self
    }

    pub fn date_range(mut self, range: Option<(NaiveDate, NaiveDate)>) -> Self {
        self.date_range = range;
        self
    }

    pub fn recurring_only(mut self, value: bool) -> Self {
        self.recurring_only = value;
        self
    }

    pub fn sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_field = field;
        self.sort_order = order;
        self
    }

    pub(crate) fn build(&self, owner: i64) -> FilterClauses {
        let mut clauses = FilterClauses::owned_by(owner);

        if let Some(category) = self.category {
            clauses.push("category = ?", category.as_str().to_string());
        }
        if let Some(method) = self.payment_method {
            clauses.push("payment_method = ?", method.as_str().to_string());
        }
        if let Some(q) = self.search.map(str::trim).filter(|q| !q.is_empty()) {
            let pattern = format!("%{}%", q);
            clauses.conditions.push(
                "(description LIKE ? COLLATE NOCASE OR COALESCE(notes, '') LIKE ? COLLATE NOCASE)"
                    .to_string(),
            );
            clauses.params.push(Box::new(pattern.clone()));
            clauses.params.push(Box::new(pattern));
        }
        if let Some(range) = self.date_range {
            clauses.push_date_range(range);
        }
        if self.recurring_only {
            clauses.conditions.push("is_recurring = 1".to_string());
        }

        clauses.order(self.sort_field, self.sort_order);
        clauses
    }
}

/// Builder for income list queries
#[derive(Debug, Clone, Default)]
pub struct IncomeFilter {
    pub source: Option<IncomeSource>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub recurring_only: bool,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

impl IncomeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, source: Option<IncomeSource>) -> Self {
        self.source = source;
        self
    }

    pub fn date_range(mut self, range: Option<(NaiveDate, NaiveDate)>) -> Self {
        self.date_range = range;
        self
    }

    pub fn recurring_only(mut self, value: bool) -> Self {
        self.recurring_only = value;
        self
    }

    pub fn sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_field = field;
        self.sort_order = order;
        self
    }

    pub(crate) fn build(&self, owner: i64) -> FilterClauses {
        let mut clauses = FilterClauses::owned_by(owner);

        if let Some(source) = self.source {
            clauses.push("source = ?", source.as_str().to_string());
        }
        if let Some(range) = self.date_range {
            clauses.push_date_range(range);
        }
        if self.recurring_only {
            clauses.conditions.push("is_recurring = 1".to_string());
        }

        clauses.order(self.sort_field, self.sort_order);
        clauses
    }
}

/// SQL fragments produced by a filter builder
pub(crate) struct FilterClauses {
    conditions: Vec<String>,
    params: Vec<Box<dyn rusqlite::ToSql>>,
    order_clause: String,
}

impl FilterClauses {
    fn owned_by(owner: i64) -> Self {
        Self {
            conditions: vec!["user_id = ?".to_string()],
            params: vec![Box::new(owner)],
            order_clause: String::new(),
        }
    }

    fn push(&mut self, condition: &str, value: String) {
        self.conditions.push(condition.to_string());
        self.params.push(Box::new(value));
    }

    fn push_date_range(&mut self, (from, to): (NaiveDate, NaiveDate)) {
        self.conditions.push("date >= ? AND date <= ?".to_string());
        self.params.push(Box::new(from.to_string()));
        self.params.push(Box::new(to.to_string()));
    }

    fn order(&mut self, field: SortField, order: SortOrder) {
        let column = match field {
            SortField::Date => "date",
            SortField::Amount => "amount",
        };
        let dir = match order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        self.order_clause = format!("ORDER BY {} {}, id DESC", column, dir);
    }

    pub fn where_clause(&self) -> String {
        format!("WHERE {}", self.conditions.join(" AND "))
    }

    pub fn order_clause(&self) -> &str {
        &self.order_clause
    }

    pub fn params_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }

    /// Consume into params followed by LIMIT and OFFSET values
    pub fn into_paged_params(self, limit: i64, offset: i64) -> Vec<Box<dyn rusqlite::ToSql>> {
        let mut params = self.params;
        params.push(Box::new(limit));
        params.push(Box::new(offset));
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expense_filter_builds_owner_scoped_clause() {
        let filter = ExpenseFilter::new()
            .category(Some(ExpenseCategory::Food))
            .search(Some("  pizza "))
            .sort(SortField::Amount, SortOrder::Asc);
        let clauses = filter.build(7);

        assert_eq!(
            clauses.where_clause(),
            "WHERE user_id = ? AND category = ? AND (description LIKE ? COLLATE NOCASE OR COALESCE(notes, '') LIKE ? COLLATE NOCASE)"
        );
        assert_eq!(clauses.order_clause(), "ORDER BY amount ASC, id DESC");
        assert_eq!(clauses.params_refs().len(), 4);
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let clauses = ExpenseFilter::new().search(Some("   ")).build(1);
        assert_eq!(clauses.where_clause(), "WHERE user_id = ?");
    }

    #[test]
    fn test_income_filter_date_range() {
        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let clauses = IncomeFilter::new().date_range(Some((from, to))).build(1);
        assert_eq!(
            clauses.where_clause(),
            "WHERE user_id = ? AND date >= ? AND date <= ?"
        );
        assert_eq!(clauses.order_clause(), "ORDER BY date DESC, id DESC");
    }
}
