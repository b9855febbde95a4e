//! User operations

use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewUser, User};

const USER_COLUMNS: &str = "id, name, email, monthly_budget, currency, created_at";

fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let created_at: String = row.get(5)?;
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        monthly_budget: row.get(3)?,
        currency: row.get(4)?,
        created_at: parse_datetime(&created_at)?,
    })
}

impl Database {
    /// Create a user; email must be unique
    pub fn create_user(&self, user: &NewUser) -> Result<User> {
        let name = user.name.trim();
        let email = user.email.trim().to_lowercase();
        if name.is_empty() {
            return Err(Error::Validation("User name is required".into()));
        }
        if !email.contains('@') {
            return Err(Error::Validation(format!("Invalid email: {}", user.email)));
        }
        validate_budget(user.monthly_budget)?;
        let currency = user
            .currency
            .as_deref()
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "USD".to_string());

        let conn = self.conn()?;
        let taken: Option<i64> = conn
            .query_row(
                "SELECT id FROM users WHERE email = ?",
                params![email],
                |row| row.get(0),
            )
            .optional()?;
        if taken.is_some() {
            return Err(Error::Validation(format!(
                "A user with email {} already exists",
                email
            )));
        }

        conn.execute(
            "INSERT INTO users (name, email, monthly_budget, currency) VALUES (?, ?, ?, ?)",
            params![name, email, user.monthly_budget, currency],
        )?;
        let id = conn.last_insert_rowid();
        info!(user_id = id, "Created user");

        self.get_user(id)
    }

    /// Get a user by id
    pub fn get_user(&self, id: i64) -> Result<User> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
            params![id],
            row_to_user,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("User {}", id)))
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))?;
        let users = stmt
            .query_map([], row_to_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Set a user's monthly budget (0 clears it)
    pub fn set_monthly_budget(&self, id: i64, budget: f64) -> Result<User> {
        validate_budget(budget)?;
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE users SET monthly_budget = ? WHERE id = ?",
            params![budget, id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("User {}", id)));
        }
        info!(user_id = id, budget, "Updated monthly budget");
        self.get_user(id)
    }
}

fn validate_budget(budget: f64) -> Result<()> {
    if budget < 0.0 || !budget.is_finite() {
        return Err(Error::Validation(
            "Monthly budget cannot be negative".into(),
        ));
    }
    Ok(())
}
