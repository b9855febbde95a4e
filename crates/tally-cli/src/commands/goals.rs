//! Savings goal command implementations

use anyhow::{Context, Result};
use chrono::Utc;
use tally_core::db::Database;
use tally_core::goals::{overdue_goals, prioritized_goals, summarize_by_status};
use tally_core::models::{
    AutoSave, AutoSaveFrequency, ContributionSource, Goal, GoalCategory, GoalPriority,
    GoalStatus, GoalUpdate, NewGoal,
};
use tally_core::period::parse_date;
use tally_core::Error;

use super::{parse_arg, truncate};

/// Options for creating a goal from the command line
#[derive(Debug, Default)]
pub struct GoalArgs<'a> {
    pub title: &'a str,
    pub target: f64,
    pub by: &'a str,
    pub category: &'a str,
    pub priority: &'a str,
    pub description: Option<&'a str>,
    pub auto_save: Option<f64>,
    pub auto_save_frequency: &'a str,
}

/// Field edits from `tally goal edit`
#[derive(Debug, Default)]
pub struct GoalEditArgs<'a> {
    pub title: Option<&'a str>,
    pub target: Option<f64>,
    pub by: Option<&'a str>,
    pub priority: Option<&'a str>,
    pub status: Option<&'a str>,
    pub auto_save_enabled: Option<bool>,
    pub auto_save_amount: Option<f64>,
    pub auto_save_frequency: Option<&'a str>,
}

/// Text progress bar, `width` cells wide
fn progress_bar(percentage: f64, width: usize) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled.min(width)))
}

fn print_goal_line(goal: &Goal) {
    let now = Utc::now();
    let progress = goal.progress(now);
    let pace = match goal.status {
        GoalStatus::Active if progress.on_track => "on track".to_string(),
        GoalStatus::Active => format!("needs {:.2}/day", progress.required_daily_savings),
        status => status.to_string(),
    };
    println!(
        "   [{}] {:<24} {} {:>5.1}% │ {:>10.2} / {:<10.2} │ {} │ {}",
        goal.id,
        truncate(&goal.title, 24),
        progress_bar(progress.progress_percentage, 10),
        progress.progress_percentage,
        goal.current_amount,
        goal.target_amount,
        goal.target_date,
        pace
    );
}

pub fn cmd_goal_add(db: &Database, owner: i64, args: &GoalArgs) -> Result<i64> {
    let auto_save = match args.auto_save {
        Some(amount) => Some(AutoSave {
            enabled: true,
            amount,
            frequency: parse_arg::<AutoSaveFrequency>(
                Some(args.auto_save_frequency),
                "auto-save-frequency",
            )?
            .unwrap_or_default(),
            last_auto_save: None,
        }),
        None => None,
    };

    let new_goal = NewGoal {
        title: args.title.to_string(),
        description: args.description.map(String::from),
        target_amount: args.target,
        category: parse_arg::<GoalCategory>(Some(args.category), "category")?.unwrap_or_default(),
        priority: parse_arg::<GoalPriority>(Some(args.priority), "priority")?.unwrap_or_default(),
        target_date: parse_date(args.by)?,
        auto_save,
        tags: Vec::new(),
    };

    let goal = db
        .create_goal(owner, new_goal, Utc::now())
        .context("Failed to create goal")?;

    println!("🎯 Created goal #{}: {}", goal.id, goal.title);
    println!(
        "   Target: {:.2} by {} ({} priority)",
        goal.target_amount, goal.target_date, goal.priority
    );
    let progress = goal.progress(Utc::now());
    println!(
        "   Save {:.2}/day over {} days to get there",
        progress.required_daily_savings, progress.days_remaining
    );
    if goal.auto_save.enabled {
        println!(
            "   Auto-save: {:.2} {}",
            goal.auto_save.amount,
            goal.auto_save.frequency.as_str()
        );
    }

    Ok(goal.id)
}

pub fn cmd_goal_list(db: &Database, owner: i64, status: Option<&str>) -> Result<()> {
    let status = parse_arg::<GoalStatus>(status, "status")?;
    let goals = db.list_goals(owner, status)?;

    if goals.is_empty() {
        println!("No goals found. Create one with:");
        println!("  tally goal add \"Emergency fund\" --target 5000 --by 2030-12-31");
        return Ok(());
    }

    println!();
    println!("🎯 Savings Goals");
    println!("   ─────────────────────────────────────────────────────────────");
    for goal in &goals {
        print_goal_line(goal);
    }

    Ok(())
}

pub fn cmd_goal_show(db: &Database, owner: i64, id: i64) -> Result<()> {
    let goal = db.get_goal(owner, id)?;
    let now = Utc::now();
    let progress = goal.progress(now);

    println!();
    println!("🎯 {} (#{})", goal.title, goal.id);
    if let Some(description) = &goal.description {
        println!("   {}", description);
    }
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Status:   {} │ {} │ {} priority",
        goal.status, goal.category, goal.priority
    );
    println!(
        "   Progress: {} {:.1}% ({:.2} of {:.2})",
        progress_bar(progress.progress_percentage, 20),
        progress.progress_percentage,
        goal.current_amount,
        goal.target_amount
    );
    println!(
        "   Target:   {} ({} days left, {:.2}/day needed)",
        goal.target_date, progress.days_remaining, progress.required_daily_savings
    );
    println!(
        "   Pace:     {}",
        if progress.on_track { "on track" } else { "behind" }
    );
    if let Some(completed_at) = goal.completed_at {
        println!("   Completed: {}", completed_at.format("%Y-%m-%d"));
    }
    if goal.auto_save.enabled {
        let last = goal
            .auto_save
            .last_auto_save
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "   Auto-save: {:.2} {} (last run {})",
            goal.auto_save.amount,
            goal.auto_save.frequency.as_str(),
            last
        );
    }

    println!();
    println!("   Milestones");
    for milestone in &goal.milestones {
        let mark = if milestone.achieved { "✅" } else { "⬜" };
        let when = milestone
            .achieved_date
            .map(|d| format!(" on {}", d.format("%Y-%m-%d")))
            .unwrap_or_default();
        println!(
            "   {} {:>3}% ({:.2}){}",
            mark, milestone.percentage, milestone.amount, when
        );
    }

    if !goal.contributions.is_empty() {
        println!();
        println!("   Contributions");
        for contribution in goal.contributions.iter().rev() {
            println!(
                "   {} │ {:>10.2} │ {:<9} │ {}",
                contribution.date.format("%Y-%m-%d"),
                contribution.amount,
                contribution.source.as_str(),
                truncate(contribution.note.as_deref().unwrap_or(""), 30)
            );
        }
    }

    Ok(())
}

pub fn cmd_goal_contribute(
    db: &Database,
    owner: i64,
    id: i64,
    amount: f64,
    note: Option<&str>,
    source: &str,
) -> Result<()> {
    let source = parse_arg::<ContributionSource>(Some(source), "source")?.unwrap_or_default();
    let before = db.get_goal(owner, id)?;
    let goal = db.add_goal_contribution(
        owner,
        id,
        amount,
        note.map(String::from),
        source,
        Utc::now(),
    )?;

    println!(
        "✅ Added {:.2} to {} ({:.2} of {:.2})",
        amount, goal.title, goal.current_amount, goal.target_amount
    );
    for milestone in goal.milestones.iter().filter(|m| m.achieved) {
        let was_achieved = before
            .milestones
            .iter()
            .any(|m| m.percentage == milestone.percentage && m.achieved);
        if !was_achieved {
            println!("   🏁 Reached the {}% milestone", milestone.percentage);
        }
    }
    if goal.status == GoalStatus::Completed {
        println!("   🎉 Goal completed!");
    }

    Ok(())
}

/// Run auto-save for one goal, or sweep every due goal
pub fn cmd_goal_auto_save(db: &Database, owner: i64, id: Option<i64>) -> Result<()> {
    let now = Utc::now();

    let Some(id) = id else {
        let sweep = db.run_due_auto_saves(owner, now)?;
        if sweep.applied.is_empty() {
            println!("No auto-saves due ({} goals not due yet)", sweep.not_due);
            return Ok(());
        }
        println!("💸 Auto-save");
        for applied in &sweep.applied {
            println!(
                "   [{}] {:<24} +{:.2}{}",
                applied.goal_id,
                truncate(&applied.title, 24),
                applied.amount,
                if applied.completed { " 🎉 completed" } else { "" }
            );
        }
        println!("   Total saved: {:.2}", sweep.total_saved());
        if sweep.conflicts > 0 {
            println!(
                "   ⚠️  {} goals changed concurrently and were skipped",
                sweep.conflicts
            );
        }
        return Ok(());
    };

    match db.run_goal_auto_save(owner, id, now) {
        Ok((goal, amount)) => {
            println!(
                "💸 Auto-saved {:.2} to {} ({:.2} of {:.2})",
                amount, goal.title, goal.current_amount, goal.target_amount
            );
            Ok(())
        }
        Err(Error::NotDue(msg)) | Err(Error::Disabled(msg)) => {
            println!("⏭️  {}", msg);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn cmd_goal_edit(db: &Database, owner: i64, id: i64, args: &GoalEditArgs) -> Result<()> {
    let update = GoalUpdate {
        title: args.title.map(String::from),
        target_amount: args.target,
        target_date: args.by.map(parse_date).transpose()?,
        priority: parse_arg::<GoalPriority>(args.priority, "priority")?,
        status: parse_arg::<GoalStatus>(args.status, "status")?,
        auto_save_enabled: args.auto_save_enabled,
        auto_save_amount: args.auto_save_amount,
        auto_save_frequency: parse_arg::<AutoSaveFrequency>(
            args.auto_save_frequency,
            "auto-save-frequency",
        )?,
        ..Default::default()
    };

    let goal = db.update_goal(owner, id, update, Utc::now())?;
    println!("✅ Updated goal #{}", goal.id);
    print_goal_line(&goal);
    Ok(())
}

pub fn cmd_goal_delete(db: &Database, owner: i64, id: i64) -> Result<()> {
    let goal = db.get_goal(owner, id)?;
    db.delete_goal(owner, id)?;
    println!(
        "🗑️  Deleted goal #{} ({}) and {} contributions",
        id,
        goal.title,
        goal.contributions.len()
    );
    Ok(())
}

pub fn cmd_goal_overdue(db: &Database, owner: i64) -> Result<()> {
    let goals = db.list_goals(owner, Some(GoalStatus::Active))?;
    let overdue = overdue_goals(&goals, Utc::now());

    if overdue.is_empty() {
        println!("✅ No overdue goals");
        return Ok(());
    }

    println!();
    println!("⏰ Overdue Goals");
    println!("   ─────────────────────────────────────────────────────────────");
    for goal in overdue {
        print_goal_line(goal);
    }
    Ok(())
}

pub fn cmd_goal_prioritized(db: &Database, owner: i64) -> Result<()> {
    let goals = db.list_goals(owner, Some(GoalStatus::Active))?;

    if goals.is_empty() {
        println!("No active goals.");
        return Ok(());
    }

    println!();
    println!("📌 Active Goals by Priority");
    println!("   ─────────────────────────────────────────────────────────────");
    for goal in prioritized_goals(&goals) {
        print!("   {:<7}", goal.priority.as_str());
        print_goal_line(goal);
    }
    Ok(())
}

pub fn cmd_goal_summary(db: &Database, owner: i64) -> Result<()> {
    let goals = db.list_goals(owner, None)?;

    println!();
    println!("📊 Goals by Status");
    println!("   ─────────────────────────────");
    if goals.is_empty() {
        println!("   No goals yet");
        return Ok(());
    }
    for row in summarize_by_status(&goals) {
        println!(
            "   {:<10} {:>3} goals │ {:>10.2} of {:>10.2}",
            row.status, row.count, row.total_current, row.total_target
        );
    }
    Ok(())
}
