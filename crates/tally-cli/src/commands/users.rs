//! User command implementations

use anyhow::{Context, Result};
use tally_core::db::Database;
use tally_core::models::NewUser;

pub fn cmd_user_add(
    db: &Database,
    name: &str,
    email: &str,
    budget: f64,
    currency: Option<String>,
) -> Result<i64> {
    let user = db
        .create_user(&NewUser {
            name: name.to_string(),
            email: email.to_string(),
            monthly_budget: budget,
            currency,
        })
        .context("Failed to create user")?;

    println!("✅ Created user {} ({})", user.name, user.email);
    println!("   ID: {}", user.id);
    if user.monthly_budget > 0.0 {
        println!(
            "   Monthly budget: {:.2} {}",
            user.monthly_budget, user.currency
        );
    }
    println!();
    println!("   Select this user with --user {} or TALLY_USER={}", user.id, user.id);

    Ok(user.id)
}

pub fn cmd_user_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    if users.is_empty() {
        println!("No users yet. Create one with:");
        println!("  tally user add --name <name> --email <email>");
        return Ok(());
    }

    println!();
    println!("👤 Users");
    println!("   ─────────────────────────────────────────────────────────────");
    for user in users {
        let budget = if user.monthly_budget > 0.0 {
            format!("{:.2} {}", user.monthly_budget, user.currency)
        } else {
            "no budget".to_string()
        };
        println!(
            "   [{}] {:<20} │ {:<28} │ {}",
            user.id,
            super::truncate(&user.name, 20),
            super::truncate(&user.email, 28),
            budget
        );
    }

    Ok(())
}

pub fn cmd_user_budget(db: &Database, owner: i64, amount: f64) -> Result<()> {
    let user = db.set_monthly_budget(owner, amount)?;
    if user.monthly_budget > 0.0 {
        println!(
            "✅ Monthly budget for {} set to {:.2} {}",
            user.name, user.monthly_budget, user.currency
        );
    } else {
        println!("✅ Monthly budget for {} cleared", user.name);
    }
    Ok(())
}
