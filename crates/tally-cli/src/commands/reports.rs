//! Report command implementations

use anyhow::Result;
use chrono::Utc;
use tally_core::analytics::{self, suggest_category_budgets, BudgetStatus, WindowComparison};
use tally_core::db::Database;
use tally_core::models::{EntryKind, GroupTotal};
use tally_core::{DateRange, Period};

/// Resolve a period token, or a custom `--from`/`--to` pair, to a date range
pub fn resolve_range(period: &str, from: Option<&str>, to: Option<&str>) -> Result<DateRange> {
    match (from, to) {
        (Some(from), Some(to)) => Ok(DateRange::parse(from, to)?),
        (None, None) => Ok(period.parse::<Period>()?.windows(Utc::now()).current),
        _ => anyhow::bail!("--from and --to must be given together"),
    }
}

fn format_change(comparison: &WindowComparison) -> String {
    match comparison.change_percentage {
        Some(pct) if pct > 0.0 => format!("▲ {:.1}%", pct),
        Some(pct) if pct < 0.0 => format!("▼ {:.1}%", pct.abs()),
        Some(_) => "─ 0.0%".to_string(),
        None => "new".to_string(),
    }
}

fn print_group_totals(rows: &[GroupTotal]) {
    let grand_total: f64 = rows.iter().map(|r| r.total_amount).sum();
    for row in rows {
        let share = if grand_total > 0.0 {
            row.total_amount / grand_total * 100.0
        } else {
            0.0
        };
        println!(
            "   {:<16} {:>10.2} │ {:>5.1}% │ {:>4} × avg {:.2}",
            row.key, row.total_amount, share, row.count, row.avg_amount
        );
    }
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {:<16} {:>10.2}", "Total", grand_total);
}

pub fn cmd_report_summary(db: &Database, owner: i64, period: &str, json: bool) -> Result<()> {
    let period = period.parse::<Period>()?;
    let summary = analytics::period_summary(db, owner, period, Utc::now())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    println!("📊 {} Summary", capitalize(period.as_str()));
    println!(
        "   Current:  {} to {}",
        summary.current.start, summary.current.end
    );
    println!(
        "   Previous: {} to {}",
        summary.previous.start, summary.previous.end
    );
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Spent:    {:>10.2} ({} expenses) {}",
        summary.expenses.current.total,
        summary.expenses.current.count,
        format_change(&summary.expenses)
    );
    println!(
        "   Earned:   {:>10.2} ({} incomes) {}",
        summary.income.current.total,
        summary.income.current.count,
        format_change(&summary.income)
    );
    println!("   Saved:    {:>10.2}", summary.net_savings);
    println!("   Savings rate: {:.1}%", summary.savings_rate);

    Ok(())
}

pub fn cmd_report_categories(
    db: &Database,
    owner: i64,
    range: DateRange,
    kind: &str,
) -> Result<()> {
    let kind = kind
        .parse::<EntryKind>()
        .map_err(|e| anyhow::anyhow!(e))?;
    let rows = analytics::breakdown(db, owner, kind, range)?;

    println!();
    match kind {
        EntryKind::Expense => println!("📊 Spending by Category"),
        EntryKind::Income => println!("📊 Income by Source"),
    }
    println!("   Period: {} to {}", range.start, range.end);
    println!("   ─────────────────────────────────────────────────────────────");

    if rows.is_empty() {
        println!("   No records in this period");
        return Ok(());
    }
    print_group_totals(&rows);
    Ok(())
}

pub fn cmd_report_trends(db: &Database, owner: i64, months: u32, kind: &str) -> Result<()> {
    let kind = kind
        .parse::<EntryKind>()
        .map_err(|e| anyhow::anyhow!(e))?;
    let buckets = analytics::monthly_trend(db, owner, kind, months, Utc::now())?;

    println!();
    println!("📈 Monthly {} Trend (last {} months)", capitalize(kind.as_str()), months);
    println!("   ─────────────────────────────────────────────────────────────");

    if buckets.is_empty() {
        println!("   No records in this window");
        return Ok(());
    }

    let max = buckets
        .iter()
        .map(|b| b.total_amount)
        .fold(0.0_f64, f64::max);
    for bucket in &buckets {
        let bar_len = if max > 0.0 {
            ((bucket.total_amount / max) * 30.0).round() as usize
        } else {
            0
        };
        println!(
            "   {}-{:02} │ {:>10.2} │ {}",
            bucket.year,
            bucket.month,
            bucket.total_amount,
            "█".repeat(bar_len)
        );
    }
    Ok(())
}

pub fn cmd_report_weekly(db: &Database, owner: i64, range: DateRange) -> Result<()> {
    let days = analytics::weekday_pattern(db, owner, range)?;

    println!();
    println!("📅 Spending by Day of Week");
    println!("   Period: {} to {}", range.start, range.end);
    println!("   ─────────────────────────────────────────────────────────────");

    if days.is_empty() {
        println!("   No expenses in this period");
        return Ok(());
    }
    for day in days {
        println!(
            "   {:<10} {:>10.2} │ {:>4} × avg {:.2}",
            day.day_name, day.total_amount, day.count, day.avg_amount
        );
    }
    Ok(())
}

pub fn cmd_report_payment_methods(db: &Database, owner: i64, range: DateRange) -> Result<()> {
    let rows = analytics::payment_method_breakdown(db, owner, range)?;

    println!();
    println!("💳 Spending by Payment Method");
    println!("   Period: {} to {}", range.start, range.end);
    println!("   ─────────────────────────────────────────────────────────────");

    if rows.is_empty() {
        println!("   No expenses in this period");
        return Ok(());
    }
    print_group_totals(&rows);
    Ok(())
}

pub fn cmd_report_sizes(db: &Database, owner: i64, range: DateRange) -> Result<()> {
    let stats = analytics::transaction_sizes(db, owner, range)?;

    println!();
    println!("📏 Expense Sizes by Category");
    println!("   Period: {} to {}", range.start, range.end);
    println!("   ─────────────────────────────────────────────────────────────");

    if stats.is_empty() {
        println!("   No expenses in this period");
        return Ok(());
    }
    println!(
        "   {:<14} {:>10} {:>10} {:>10} {:>6}",
        "Category", "Min", "Avg", "Max", "Count"
    );
    for row in stats {
        println!(
            "   {:<14} {:>10.2} {:>10.2} {:>10.2} {:>6}",
            row.category, row.min_amount, row.avg_amount, row.max_amount, row.count
        );
    }
    Ok(())
}

pub fn cmd_report_budget(db: &Database, owner: i64, suggest: bool, json: bool) -> Result<()> {
    let projection = db.budget_projection(owner, Utc::now())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&projection)?);
        return Ok(());
    }

    println!();
    println!("💰 Budget Projection");
    println!("   ─────────────────────────────────────────────────────────────");
    if projection.monthly_budget <= 0.0 {
        println!("   No monthly budget set. Set one with:");
        println!("     tally user budget <amount>");
    } else {
        let icon = match projection.status {
            BudgetStatus::OnTrack => "✅",
            BudgetStatus::Warning => "⚠️ ",
            BudgetStatus::ProjectedOverspend => "📈",
            BudgetStatus::OverBudget => "🚨",
        };
        println!("   Status:       {} {}", icon, projection.status);
        println!(
            "   Spent:        {:.2} of {:.2} ({:.1}%)",
            projection.current_spending, projection.monthly_budget, projection.budget_utilization
        );
        println!("   Remaining:    {:.2}", projection.remaining_budget);
        println!(
            "   Daily avg:    {:.2} over {} days",
            projection.daily_average, projection.days_elapsed
        );
        println!(
            "   Projected:    {:.2} by month end",
            projection.projected_monthly_total
        );
        if projection.projected_overspend > 0.0 {
            println!("   Overspend:    {:.2}", projection.projected_overspend);
        }
        println!(
            "   Daily limit:  {:.2} for the remaining {} days",
            projection.recommended_daily_spending, projection.days_remaining
        );
    }

    if suggest {
        println!();
        println!("   Suggested category budgets");
        for line in suggest_category_budgets(projection.monthly_budget) {
            match (line.category, line.message) {
                (Some(category), _) => println!(
                    "   {:<14} {:>5.1}% │ {:>10.2}",
                    category.as_str(),
                    line.percentage,
                    line.suggested_amount
                ),
                (None, Some(message)) => println!("   {}", message),
                (None, None) => {}
            }
        }
    }

    Ok(())
}

pub fn cmd_report_health(db: &Database, owner: i64, json: bool) -> Result<()> {
    let health = db.financial_health(owner, Utc::now())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&health)?);
        return Ok(());
    }

    println!();
    println!("🩺 Financial Health: {}/100 ({})", health.score, health.status);
    println!("   ─────────────────────────────────────────────────────────────");
    for factor in &health.factors {
        println!(
            "   {:<22} {:>3}/{:<3} │ {:<9} │ {:.1}",
            factor.name,
            factor.points,
            factor.max_points,
            factor.status.as_str(),
            factor.value
        );
    }
    println!();
    println!("   Savings rate:       {:.1}%", health.savings_rate);
    println!("   Budget utilization: {:.1}%", health.budget_utilization);

    if !health.recommendations.is_empty() {
        println!();
        println!("   Recommendations");
        for rec in &health.recommendations {
            println!("   • {}", rec);
        }
    }

    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
