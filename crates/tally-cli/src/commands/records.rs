//! Expense and income command implementations

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use tally_core::db::Database;
use tally_core::models::{
    ExpenseCategory, Frequency, IncomeSource, NewExpense, NewIncome, PaymentMethod,
};
use tally_core::period::parse_date;
use tally_core::{suggest_category, ExpenseFilter, IncomeFilter, Period};

use super::{parse_arg, truncate};

/// Options for recording an expense from the command line
#[derive(Debug, Default)]
pub struct ExpenseArgs<'a> {
    pub amount: f64,
    pub description: &'a str,
    pub category: Option<&'a str>,
    pub date: Option<&'a str>,
    pub method: &'a str,
    pub tags: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub recurring: Option<&'a str>,
}

fn date_or_today(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(d) => Ok(parse_date(d)?),
        None => Ok(Utc::now().date_naive()),
    }
}

fn split_tags(tags: Option<&str>) -> Vec<String> {
    tags.map(|t| {
        t.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

pub fn cmd_expense_add(db: &Database, owner: i64, args: &ExpenseArgs) -> Result<i64> {
    let recurring_frequency = parse_arg::<Frequency>(args.recurring, "recurring")?;
    let new_expense = NewExpense {
        amount: args.amount,
        description: args.description.to_string(),
        category: parse_arg::<ExpenseCategory>(args.category, "category")?,
        tags: split_tags(args.tags),
        notes: args.notes.map(String::from),
        date: date_or_today(args.date)?,
        payment_method: parse_arg::<PaymentMethod>(Some(args.method), "method")?
            .unwrap_or_default(),
        is_recurring: recurring_frequency.is_some(),
        recurring_frequency,
        ..Default::default()
    };

    let expense = db
        .create_expense(owner, &new_expense)
        .context("Failed to record expense")?;

    println!(
        "✅ Recorded expense #{}: {:.2} for {}",
        expense.id, expense.amount, expense.description
    );
    if expense.ai_generated {
        println!(
            "   Category: {} (suggested, {:.0}% confidence)",
            expense.category,
            expense.ai_confidence.unwrap_or(0.0) * 100.0
        );
    } else {
        println!("   Category: {}", expense.category);
    }

    Ok(expense.id)
}

pub fn cmd_expense_list(
    db: &Database,
    owner: i64,
    limit: i64,
    category: Option<&str>,
    search: Option<&str>,
    period: Option<&str>,
) -> Result<()> {
    let date_range = period
        .map(|p| p.parse::<Period>())
        .transpose()?
        .map(|p| {
            let window = p.windows(Utc::now()).current;
            (window.start, window.end)
        });

    let filter = ExpenseFilter::new()
        .category(parse_arg::<ExpenseCategory>(category, "category")?)
        .search(search)
        .date_range(date_range);

    let expenses = db.list_expenses(owner, &filter, limit, 0)?;

    if expenses.is_empty() {
        println!("No expenses found. Record one with:");
        println!("  tally expense add <amount> <description>");
        return Ok(());
    }

    let total = db.count_expenses(owner, &filter)?;

    println!();
    println!("📝 Expenses ({} of {})", expenses.len(), total);
    println!("   ─────────────────────────────────────────────────────────────");

    for expense in expenses {
        println!(
            "   [{}] {} │ \x1b[31m{:>10.2}\x1b[0m │ {:<13} │ {}",
            expense.id,
            expense.date,
            expense.amount,
            expense.category.as_str(),
            truncate(&expense.description, 35)
        );
    }

    Ok(())
}

pub fn cmd_expense_delete(db: &Database, owner: i64, id: i64) -> Result<()> {
    let expense = db.get_expense(owner, id)?;
    db.delete_expense(owner, id)?;
    println!(
        "🗑️  Deleted expense #{} ({:.2} for {})",
        id, expense.amount, expense.description
    );
    Ok(())
}

pub fn cmd_expense_suggest(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        anyhow::bail!("Description is required");
    }
    let suggestion = suggest_category(description)?;

    println!("🏷️  Suggested category: {}", suggestion.category);
    println!(
        "   Confidence: {:.0}% ({} keyword{} matched)",
        suggestion.confidence * 100.0,
        suggestion.matched_keywords,
        if suggestion.matched_keywords == 1 { "" } else { "s" }
    );

    Ok(())
}

pub fn cmd_income_add(
    db: &Database,
    owner: i64,
    amount: f64,
    source: &str,
    description: Option<&str>,
    date: Option<&str>,
    recurring: Option<&str>,
) -> Result<i64> {
    let recurring_frequency = parse_arg::<Frequency>(recurring, "recurring")?;
    let new_income = NewIncome {
        amount,
        source: parse_arg::<IncomeSource>(Some(source), "source")?.unwrap_or_default(),
        description: description.map(String::from),
        date: date_or_today(date)?,
        is_recurring: recurring_frequency.is_some(),
        recurring_frequency,
        next_expected_date: None,
    };

    let income = db
        .create_income(owner, &new_income)
        .context("Failed to record income")?;

    println!(
        "✅ Recorded income #{}: {:.2} from {}",
        income.id, income.amount, income.source
    );
    if let Some(next) = income.next_expected_date {
        println!("   Next expected: {}", next);
    }

    Ok(income.id)
}

pub fn cmd_income_list(db: &Database, owner: i64, limit: i64, source: Option<&str>) -> Result<()> {
    let filter = IncomeFilter::new().source(parse_arg::<IncomeSource>(source, "source")?);
    let incomes = db.list_incomes(owner, &filter, limit, 0)?;

    if incomes.is_empty() {
        println!("No incomes found. Record one with:");
        println!("  tally income add <amount> --source job");
        return Ok(());
    }

    println!();
    println!("💰 Incomes");
    println!("   ─────────────────────────────────────────────────────────────");

    for income in incomes {
        let next = income
            .next_expected_date
            .map(|d| format!(" (next {})", d))
            .unwrap_or_default();
        println!(
            "   [{}] {} │ \x1b[32m{:>10.2}\x1b[0m │ {:<12} │ {}{}",
            income.id,
            income.date,
            income.amount,
            income.source.as_str(),
            truncate(income.description.as_deref().unwrap_or(""), 30),
            next
        );
    }

    Ok(())
}

pub fn cmd_income_delete(db: &Database, owner: i64, id: i64) -> Result<()> {
    let income = db.get_income(owner, id)?;
    db.delete_income(owner, id)?;
    println!(
        "🗑️  Deleted income #{} ({:.2} from {})",
        id, income.amount, income.source
    );
    Ok(())
}
