//! Goal persistence
//!
//! A goal spans three tables (`goals`, `goal_milestones`,
//! `goal_contributions`). Every mutation after creation goes through
//! [`Database::mutate_goal`]: load, apply an engine transition in memory,
//! write back under `BEGIN IMMEDIATE` with a version compare-and-swap.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info, warn};

use super::{
    commit_or_rollback, format_datetime, parse_date_column, parse_datetime, parse_enum,
    parse_optional_datetime, parse_tags, tags_to_json, Database,
};
use crate::error::{Error, Result};
use crate::models::{
    AutoSave, AutoSaveApplied, AutoSaveSweep, Contribution, ContributionSource, Goal, GoalStatus,
    GoalUpdate, Milestone, NewGoal,
};

const GOAL_COLUMNS: &str = "id, user_id, title, description, target_amount, current_amount, \
     category, priority, target_date, status, completed_at, auto_save_enabled, auto_save_amount, \
     auto_save_frequency, last_auto_save, tags, version, created_at, updated_at";

fn row_to_goal(row: &Row) -> rusqlite::Result<Goal> {
    let category: String = row.get(6)?;
    let priority: String = row.get(7)?;
    let target_date: String = row.get(8)?;
    let status: String = row.get(9)?;
    let frequency: String = row.get(13)?;
    let created_at: String = row.get(17)?;
    let updated_at: String = row.get(18)?;

    Ok(Goal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        target_amount: row.get(4)?,
        current_amount: row.get(5)?,
        category: parse_enum(&category)?,
        priority: parse_enum(&priority)?,
        target_date: parse_date_column(&target_date)?,
        status: parse_enum(&status)?,
        completed_at: parse_optional_datetime(row.get(10)?)?,
        auto_save: AutoSave {
            enabled: row.get(11)?,
            amount: row.get(12)?,
            frequency: parse_enum(&frequency)?,
            last_auto_save: parse_optional_datetime(row.get(14)?)?,
        },
        milestones: Vec::new(),
        contributions: Vec::new(),
        tags: parse_tags(row.get(15)?)?,
        version: row.get(16)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Load a goal with its milestones and contributions
pub(super) fn load_goal(conn: &Connection, owner: i64, id: i64) -> Result<Goal> {
    let mut goal = conn
        .query_row(
            &format!(
                "SELECT {} FROM goals WHERE id = ? AND user_id = ?",
                GOAL_COLUMNS
            ),
            params![id, owner],
            row_to_goal,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Goal {}", id)))?;

    load_children(conn, &mut goal)?;
    Ok(goal)
}

fn load_children(conn: &Connection, goal: &mut Goal) -> Result<()> {
    let mut stmt = conn.prepare(
        "SELECT percentage, amount, achieved, achieved_date FROM goal_milestones \
         WHERE goal_id = ? ORDER BY position",
    )?;
    goal.milestones = stmt
        .query_map(params![goal.id], |row| {
            Ok(Milestone {
                percentage: row.get(0)?,
                amount: row.get(1)?,
                achieved: row.get(2)?,
                achieved_date: parse_optional_datetime(row.get(3)?)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT amount, date, note, source FROM goal_contributions \
         WHERE goal_id = ? ORDER BY id",
    )?;
    goal.contributions = stmt
        .query_map(params![goal.id], |row| {
            let date: String = row.get(1)?;
            let source: String = row.get(3)?;
            Ok(Contribution {
                amount: row.get(0)?,
                date: parse_datetime(&date)?,
                note: row.get(2)?,
                source: parse_enum(&source)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(())
}

fn write_milestones(conn: &Connection, goal: &Goal) -> Result<()> {
    conn.execute(
        "DELETE FROM goal_milestones WHERE goal_id = ?",
        params![goal.id],
    )?;
    let mut stmt = conn.prepare(
        "INSERT INTO goal_milestones (goal_id, position, percentage, amount, achieved, achieved_date) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )?;
    for (position, m) in goal.milestones.iter().enumerate() {
        stmt.execute(params![
            goal.id,
            position as i64,
            m.percentage,
            m.amount,
            m.achieved,
            m.achieved_date.map(format_datetime),
        ])?;
    }
    Ok(())
}

fn write_contributions(conn: &Connection, goal_id: i64, new: &[Contribution]) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO goal_contributions (goal_id, amount, date, note, source) VALUES (?, ?, ?, ?, ?)",
    )?;
    for c in new {
        stmt.execute(params![
            goal_id,
            c.amount,
            format_datetime(c.date),
            c.note,
            c.source.as_str(),
        ])?;
    }
    Ok(())
}

/// Write a mutated goal back, failing with `Conflict` if the stored version
/// moved since it was loaded
pub(super) fn save_goal(
    conn: &Connection,
    goal: &Goal,
    loaded_version: i64,
    loaded_contributions: usize,
) -> Result<()> {
    let updated = conn.execute(
        r#"
        UPDATE goals SET
            title = ?, description = ?, target_amount = ?, current_amount = ?,
            category = ?, priority = ?, target_date = ?, status = ?, completed_at = ?,
            auto_save_enabled = ?, auto_save_amount = ?, auto_save_frequency = ?, last_auto_save = ?,
            tags = ?, updated_at = ?, version = version + 1
        WHERE id = ? AND user_id = ? AND version = ?
        "#,
        params![
            goal.title,
            goal.description,
            goal.target_amount,
            goal.current_amount,
            goal.category.as_str(),
            goal.priority.as_str(),
            goal.target_date.to_string(),
            goal.status.as_str(),
            goal.completed_at.map(format_datetime),
            goal.auto_save.enabled,
            goal.auto_save.amount,
            goal.auto_save.frequency.as_str(),
            goal.auto_save.last_auto_save.map(format_datetime),
            tags_to_json(&goal.tags)?,
            format_datetime(goal.updated_at),
            goal.id,
            goal.user_id,
            loaded_version,
        ],
    )?;
    if updated == 0 {
        return Err(Error::Conflict(format!(
            "Goal {} was modified concurrently",
            goal.id
        )));
    }

    write_milestones(conn, goal)?;
    write_contributions(
        conn,
        goal.id,
        goal.contributions.get(loaded_contributions..).unwrap_or(&[]),
    )?;
    Ok(())
}

impl Database {
    /// Create a goal for `owner` with default milestones
    pub fn create_goal(&self, owner: i64, new_goal: NewGoal, now: DateTime<Utc>) -> Result<Goal> {
        let mut goal = new_goal.into_goal(owner, now)?;
        let conn = self.conn()?;

        conn.execute("BEGIN IMMEDIATE", [])?;
        let result = (|| -> Result<i64> {
            conn.execute(
                r#"
                INSERT INTO goals (user_id, title, description, target_amount, current_amount,
                                   category, priority, target_date, status, auto_save_enabled,
                                   auto_save_amount, auto_save_frequency, last_auto_save, tags,
                                   version, created_at, updated_at)
                VALUES (?, ?, ?, ?, 0, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
                "#,
                params![
                    owner,
                    goal.title,
                    goal.description,
                    goal.target_amount,
                    goal.category.as_str(),
                    goal.priority.as_str(),
                    goal.target_date.to_string(),
                    goal.status.as_str(),
                    goal.auto_save.enabled,
                    goal.auto_save.amount,
                    goal.auto_save.frequency.as_str(),
                    goal.auto_save.last_auto_save.map(format_datetime),
                    tags_to_json(&goal.tags)?,
                    format_datetime(goal.created_at),
                    format_datetime(goal.updated_at),
                ],
            )?;
            goal.id = conn.last_insert_rowid();
            write_milestones(&conn, &goal)?;
            Ok(goal.id)
        })();

        match result {
            Ok(id) => {
                commit_or_rollback(&conn)?;
                info!(user_id = owner, goal_id = id, target = goal.target_amount, "Created goal");
                self.get_goal(owner, id)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }

    /// Get one of `owner`'s goals with milestones and contributions
    pub fn get_goal(&self, owner: i64, id: i64) -> Result<Goal> {
        let conn = self.conn()?;
        load_goal(&conn, owner, id)
    }

    /// List `owner`'s goals, optionally restricted to one status
    pub fn list_goals(&self, owner: i64, status: Option<GoalStatus>) -> Result<Vec<Goal>> {
        let conn = self.conn()?;
        let mut goals = match status {
            Some(status) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM goals WHERE user_id = ? AND status = ? ORDER BY target_date, id",
                    GOAL_COLUMNS
                ))?;
                let rows = stmt
                    .query_map(params![owner, status.as_str()], row_to_goal)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM goals WHERE user_id = ? ORDER BY target_date, id",
                    GOAL_COLUMNS
                ))?;
                let rows = stmt
                    .query_map(params![owner], row_to_goal)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
        };

        for goal in &mut goals {
            load_children(&conn, goal)?;
        }
        Ok(goals)
    }

    /// Delete one of `owner`'s goals and its history
    pub fn delete_goal(&self, owner: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM goals WHERE id = ? AND user_id = ?",
            params![id, owner],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Goal {}", id)));
        }
        info!(user_id = owner, goal_id = id, "Deleted goal");
        Ok(())
    }

    /// Apply a transition to a stored goal as a single writer.
    ///
    /// The goal is read and written inside one `BEGIN IMMEDIATE` transaction;
    /// when `apply` fails nothing is written.
    pub fn mutate_goal<T, F>(&self, owner: i64, id: i64, apply: F) -> Result<(Goal, T)>
    where
        F: FnOnce(&mut Goal) -> Result<T>,
    {
        let conn = self.conn()?;

        conn.execute("BEGIN IMMEDIATE", [])?;
        let result = (|| -> Result<(Goal, T)> {
            let mut goal = load_goal(&conn, owner, id)?;
            let loaded_version = goal.version;
            let loaded_contributions = goal.contributions.len();

            let out = apply(&mut goal)?;

            save_goal(&conn, &goal, loaded_version, loaded_contributions)?;
            goal.version = loaded_version + 1;
            Ok((goal, out))
        })();

        match result {
            Ok(done) => {
                commit_or_rollback(&conn)?;
                Ok(done)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }

    /// Apply field edits to a goal
    pub fn update_goal(
        &self,
        owner: i64,
        id: i64,
        update: GoalUpdate,
        now: DateTime<Utc>,
    ) -> Result<Goal> {
        let (goal, ()) = self.mutate_goal(owner, id, |goal| goal.apply_update(update, now))?;
        info!(user_id = owner, goal_id = id, "Updated goal");
        Ok(goal)
    }

    /// Add a contribution to a goal
    pub fn add_goal_contribution(
        &self,
        owner: i64,
        id: i64,
        amount: f64,
        note: Option<String>,
        source: ContributionSource,
        now: DateTime<Utc>,
    ) -> Result<Goal> {
        let (goal, ()) = self.mutate_goal(owner, id, |goal| {
            goal.add_contribution(amount, note, source, now)
        })?;
        info!(
            user_id = owner,
            goal_id = id,
            amount,
            source = source.as_str(),
            current = goal.current_amount,
            status = goal.status.as_str(),
            "Recorded goal contribution"
        );
        Ok(goal)
    }

    /// Run a goal's auto-save if enabled and due; returns the goal and amount saved
    pub fn run_goal_auto_save(
        &self,
        owner: i64,
        id: i64,
        now: DateTime<Utc>,
    ) -> Result<(Goal, f64)> {
        let (goal, amount) = self.mutate_goal(owner, id, |goal| goal.run_auto_save(now))?;
        info!(user_id = owner, goal_id = id, amount, "Ran auto-save");
        Ok((goal, amount))
    }

    /// Apply every due auto-save across `owner`'s active goals
    pub fn run_due_auto_saves(&self, owner: i64, now: DateTime<Utc>) -> Result<AutoSaveSweep> {
        let candidates = {
            let conn = self.conn()?;
            let mut stmt = conn.prepare(
                "SELECT id FROM goals WHERE user_id = ? AND status = 'active' \
                 AND auto_save_enabled = 1 AND auto_save_amount > 0 ORDER BY id",
            )?;
            let ids = stmt
                .query_map(params![owner], |row| row.get::<_, i64>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            ids
        };

        let mut sweep = AutoSaveSweep::default();
        for id in candidates {
            match self.mutate_goal(owner, id, |goal| goal.run_auto_save(now)) {
                Ok((goal, amount)) => sweep.applied.push(AutoSaveApplied {
                    goal_id: id,
                    title: goal.title,
                    amount,
                    completed: goal.status == GoalStatus::Completed,
                }),
                Err(Error::NotDue(_)) => sweep.not_due += 1,
                // Paused, disabled or deleted between listing and locking
                Err(Error::InvalidState(_)) | Err(Error::Disabled(_)) | Err(Error::NotFound(_)) => {
                    debug!(goal_id = id, "Goal no longer eligible for auto-save");
                }
                Err(Error::Conflict(msg)) => {
                    warn!(goal_id = id, "{}", msg);
                    sweep.conflicts += 1;
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            user_id = owner,
            applied = sweep.applied.len(),
            not_due = sweep.not_due,
            total = sweep.total_saved(),
            "Auto-save sweep complete"
        );
        Ok(sweep)
    }
}
