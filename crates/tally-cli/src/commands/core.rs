//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `require_user` - Resolve the `--user` selection to a stored user
//! - `cmd_init` - Initialize the database
//! - `cmd_status` - Show database status

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::db::Database;
use tally_core::models::User;
use tally_core::{ExpenseFilter, IncomeFilter};

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Look up the user selected with `--user` / `TALLY_USER`
pub fn require_user(db: &Database, user: Option<i64>) -> Result<User> {
    let id = user.context(
        "No user selected. Pass --user <id> or set TALLY_USER (see 'tally user list')",
    )?;
    db.get_user(id)
        .with_context(|| format!("Failed to load user {}", id))
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;
    let users = db.list_users().context("Failed to read users")?;
    println!("   Schema ready ({} users)", users.len());

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Create a user: tally user add --name Asha --email asha@example.com");
    println!("  2. Record spending: tally --user 1 expense add 12.50 \"Lunch at cafe\"");
    println!("  3. Start the API: tally serve");

    Ok(())
}

pub fn cmd_status(db: &Database) -> Result<()> {
    let encrypted = db.is_encrypted()?;
    let size = std::fs::metadata(db.path()).map(|m| m.len()).unwrap_or(0);
    let users = db.list_users()?;

    println!();
    println!("🗄️  Database Status");
    println!("   ─────────────────────────────");
    println!("   Path:       {}", db.path());
    println!("   Size:       {:.1} KB", size as f64 / 1024.0);
    println!(
        "   Encryption: {}",
        if encrypted { "🔒 enabled" } else { "⚠️  disabled" }
    );
    println!("   Users:      {}", users.len());

    for user in &users {
        let expenses = db.count_expenses(user.id, &ExpenseFilter::new())?;
        let incomes = db.count_incomes(user.id, &IncomeFilter::new())?;
        let goals = db.list_goals(user.id, None)?.len();
        println!(
            "   [{}] {:<20} {} expenses, {} incomes, {} goals",
            user.id,
            super::truncate(&user.name, 20),
            expenses,
            incomes,
            goals
        );
    }

    Ok(())
}
