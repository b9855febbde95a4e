//! CSV export of expense records

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::{Database, ExpenseFilter, SortField, SortOrder};
use crate::error::{Error, Result};
use crate::models::{Expense, ExpenseCategory};

/// Rows fetched per page while exporting
const EXPORT_PAGE_SIZE: i64 = 500;

/// Options for expense export
#[derive(Debug, Clone, Default)]
pub struct ExpenseExportOptions {
    /// Start date filter (inclusive)
    pub from: Option<NaiveDate>,
    /// End date filter (inclusive)
    pub to: Option<NaiveDate>,
    pub category: Option<ExpenseCategory>,
}

impl ExpenseExportOptions {
    fn date_range(&self) -> Result<Option<(NaiveDate, NaiveDate)>> {
        match (self.from, self.to) {
            (None, None) => Ok(None),
            (from, to) => {
                // Open ends are bounded by four-digit years so text comparison holds
                let from = from
                    .or_else(|| NaiveDate::from_ymd_opt(1, 1, 1))
                    .unwrap_or(NaiveDate::MIN);
                let to = to
                    .or_else(|| NaiveDate::from_ymd_opt(9999, 12, 31))
                    .unwrap_or(NaiveDate::MAX);
                if to < from {
                    return Err(Error::Validation(format!(
                        "Export range end {} is before start {}",
                        to, from
                    )));
                }
                Ok(Some((from, to)))
            }
        }
    }
}

/// One exported CSV row
#[derive(Debug, Serialize)]
struct ExpenseRow<'a> {
    date: String,
    description: &'a str,
    amount: String,
    category: &'a str,
    subcategory: &'a str,
    payment_method: &'a str,
    tags: String,
    location: &'a str,
    notes: &'a str,
    recurring: bool,
}

impl<'a> From<&'a Expense> for ExpenseRow<'a> {
    fn from(e: &'a Expense) -> Self {
        Self {
            date: e.date.to_string(),
            description: &e.description,
            amount: format!("{:.2}", e.amount),
            category: e.category.as_str(),
            subcategory: e.subcategory.as_deref().unwrap_or(""),
            payment_method: e.payment_method.as_str(),
            tags: e.tags.join(";"),
            location: e.location.as_deref().unwrap_or(""),
            notes: e.notes.as_deref().unwrap_or(""),
            recurring: e.is_recurring,
        }
    }
}

impl Database {
    /// All of `owner`'s expenses matching the options, oldest first
    pub fn export_expenses(&self, owner: i64, opts: &ExpenseExportOptions) -> Result<Vec<Expense>> {
        let filter = ExpenseFilter::new()
            .category(opts.category)
            .date_range(opts.date_range()?)
            .sort(SortField::Date, SortOrder::Asc);

        let mut expenses = Vec::new();
        let mut offset = 0;
        loop {
            let page = self.list_expenses(owner, &filter, EXPORT_PAGE_SIZE, offset)?;
            let fetched = page.len() as i64;
            expenses.extend(page);
            if fetched < EXPORT_PAGE_SIZE {
                break;
            }
            offset += fetched;
        }
        Ok(expenses)
    }

    /// Export `owner`'s expenses as CSV text with a header row
    pub fn export_expenses_csv(&self, owner: i64, opts: &ExpenseExportOptions) -> Result<String> {
        let expenses = self.export_expenses(owner, opts)?;
        expenses_to_csv(&expenses)
    }
}

/// Render expenses as CSV with a header row
pub fn expenses_to_csv(expenses: &[Expense]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if expenses.is_empty() {
        writer.write_record([
            "date",
            "description",
            "amount",
            "category",
            "subcategory",
            "payment_method",
            "tags",
            "location",
            "notes",
            "recurring",
        ])?;
    }
    for expense in expenses {
        writer.serialize(ExpenseRow::from(expense))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::Validation(format!("Export is not UTF-8: {}", e)))
}
