//! Tally CLI - Personal finance tracker and goal engine
//!
//! Usage:
//!   tally init                              Initialize database
//!   tally user add --name N --email E       Create a user
//!   tally --user 1 expense add 12.5 Lunch   Record an expense
//!   tally --user 1 goal list                Show savings goals
//!   tally --user 1 report health            Score financial health
//!   tally serve --port 3000                 Start the REST API

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use commands::{ExpenseArgs, GoalArgs, GoalEditArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Status => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_status(&db)
        }
        Commands::Serve {
            port,
            host,
            no_auth,
        } => commands::cmd_serve(&cli.db, &host, port, no_auth, cli.no_encrypt).await,
        Commands::User { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                UserAction::Add {
                    name,
                    email,
                    budget,
                    currency,
                } => commands::cmd_user_add(&db, &name, &email, budget, currency).map(|_| ()),
                UserAction::List => commands::cmd_user_list(&db),
                UserAction::Budget { amount } => {
                    let user = commands::require_user(&db, cli.user)?;
                    commands::cmd_user_budget(&db, user.id, amount)
                }
            }
        }
        Commands::Expense { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            // `suggest` runs without a selected user
            let owner = || commands::require_user(&db, cli.user).map(|u| u.id);
            match action {
                ExpenseAction::Add {
                    amount,
                    description,
                    category,
                    date,
                    method,
                    tags,
                    notes,
                    recurring,
                } => commands::cmd_expense_add(
                    &db,
                    owner()?,
                    &ExpenseArgs {
                        amount,
                        description: &description,
                        category: category.as_deref(),
                        date: date.as_deref(),
                        method: &method,
                        tags: tags.as_deref(),
                        notes: notes.as_deref(),
                        recurring: recurring.as_deref(),
                    },
                )
                .map(|_| ()),
                ExpenseAction::List {
                    limit,
                    category,
                    search,
                    period,
                } => commands::cmd_expense_list(
                    &db,
                    owner()?,
                    limit,
                    category.as_deref(),
                    search.as_deref(),
                    period.as_deref(),
                ),
                ExpenseAction::Delete { id } => commands::cmd_expense_delete(&db, owner()?, id),
                ExpenseAction::Suggest { description } => {
                    commands::cmd_expense_suggest(&description)
                }
            }
        }
        Commands::Income { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let owner = commands::require_user(&db, cli.user)?.id;
            match action {
                IncomeAction::Add {
                    amount,
                    source,
                    description,
                    date,
                    recurring,
                } => commands::cmd_income_add(
                    &db,
                    owner,
                    amount,
                    &source,
                    description.as_deref(),
                    date.as_deref(),
                    recurring.as_deref(),
                )
                .map(|_| ()),
                IncomeAction::List { limit, source } => {
                    commands::cmd_income_list(&db, owner, limit, source.as_deref())
                }
                IncomeAction::Delete { id } => commands::cmd_income_delete(&db, owner, id),
            }
        }
        Commands::Goal { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let owner = commands::require_user(&db, cli.user)?.id;
            match action {
                GoalAction::Add {
                    title,
                    target,
                    by,
                    category,
                    priority,
                    description,
                    auto_save,
                    auto_save_frequency,
                } => commands::cmd_goal_add(
                    &db,
                    owner,
                    &GoalArgs {
                        title: &title,
                        target,
                        by: &by,
                        category: &category,
                        priority: &priority,
                        description: description.as_deref(),
                        auto_save,
                        auto_save_frequency: &auto_save_frequency,
                    },
                )
                .map(|_| ()),
                GoalAction::List { status } => {
                    commands::cmd_goal_list(&db, owner, status.as_deref())
                }
                GoalAction::Show { id } => commands::cmd_goal_show(&db, owner, id),
                GoalAction::Contribute {
                    id,
                    amount,
                    note,
                    source,
                } => commands::cmd_goal_contribute(&db, owner, id, amount, note.as_deref(), &source),
                GoalAction::AutoSave { id } => commands::cmd_goal_auto_save(&db, owner, id),
                GoalAction::Edit {
                    id,
                    title,
                    target,
                    by,
                    priority,
                    status,
                    auto_save_enabled,
                    auto_save_amount,
                    auto_save_frequency,
                } => commands::cmd_goal_edit(
                    &db,
                    owner,
                    id,
                    &GoalEditArgs {
                        title: title.as_deref(),
                        target,
                        by: by.as_deref(),
                        priority: priority.as_deref(),
                        status: status.as_deref(),
                        auto_save_enabled,
                        auto_save_amount,
                        auto_save_frequency: auto_save_frequency.as_deref(),
                    },
                ),
                GoalAction::Delete { id } => commands::cmd_goal_delete(&db, owner, id),
                GoalAction::Overdue => commands::cmd_goal_overdue(&db, owner),
                GoalAction::Prioritized => commands::cmd_goal_prioritized(&db, owner),
                GoalAction::Summary => commands::cmd_goal_summary(&db, owner),
            }
        }
        Commands::Report { report_type } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let owner = commands::require_user(&db, cli.user)?.id;
            match report_type {
                ReportType::Summary { period, json } => {
                    commands::cmd_report_summary(&db, owner, &period, json)
                }
                ReportType::Categories {
                    period,
                    from,
                    to,
                    kind,
                } => {
                    let range = commands::resolve_range(&period, from.as_deref(), to.as_deref())?;
                    commands::cmd_report_categories(&db, owner, range, &kind)
                }
                ReportType::Trends { months, kind } => {
                    commands::cmd_report_trends(&db, owner, months, &kind)
                }
                ReportType::Weekly { period } => {
                    let range = commands::resolve_range(&period, None, None)?;
                    commands::cmd_report_weekly(&db, owner, range)
                }
                ReportType::PaymentMethods { period } => {
                    let range = commands::resolve_range(&period, None, None)?;
                    commands::cmd_report_payment_methods(&db, owner, range)
                }
                ReportType::Sizes { period } => {
                    let range = commands::resolve_range(&period, None, None)?;
                    commands::cmd_report_sizes(&db, owner, range)
                }
                ReportType::Budget { suggest, json } => {
                    commands::cmd_report_budget(&db, owner, suggest, json)
                }
                ReportType::Health { json } => commands::cmd_report_health(&db, owner, json),
            }
        }
        Commands::Export { export_type } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let owner = commands::require_user(&db, cli.user)?.id;
            match export_type {
                ExportType::Expenses {
                    output,
                    from,
                    to,
                    category,
                } => commands::cmd_export_expenses(&db, owner, output, from, to, category),
            }
        }
    }
}
