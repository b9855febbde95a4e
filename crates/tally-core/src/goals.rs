//! Goal engine: contributions, milestones, auto-save scheduling
//!
//! All state transitions live on [`Goal`] as plain methods over owned data;
//! persistence wraps them in a single-writer transaction (see `db::goals`).
//! "Now" is always passed in by the caller.

use chrono::{DateTime, NaiveTime, Utc};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{
    AutoSave, Contribution, ContributionSource, Goal, GoalProgress, GoalStatus, GoalStatusSummary,
    GoalUpdate, GoalWithProgress, Milestone, NewGoal,
};

/// Milestone checkpoints seeded on every goal, in percent of target
pub const DEFAULT_MILESTONES: [u8; 4] = [25, 50, 75, 100];

/// Build the default milestone list for a target amount
pub fn default_milestones(target_amount: f64) -> Vec<Milestone> {
    DEFAULT_MILESTONES
        .iter()
        .map(|&pct| Milestone {
            percentage: pct,
            amount: target_amount * f64::from(pct) / 100.0,
            achieved: false,
            achieved_date: None,
        })
        .collect()
}

impl NewGoal {
    /// Check required fields and that the target date lies in the future
    pub fn validate(&self, now: DateTime<Utc>) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("Goal title is required".into()));
        }
        if !(self.target_amount > 0.0) {
            return Err(Error::Validation(
                "Goal target amount must be greater than 0".into(),
            ));
        }
        if start_of_day(self.target_date) <= now {
            return Err(Error::Validation(format!(
                "Goal target date {} must be in the future",
                self.target_date
            )));
        }
        if let Some(auto) = &self.auto_save {
            validate_auto_save_amount(auto.amount)?;
        }
        Ok(())
    }

    /// Materialize a fresh, unsaved goal (id 0)
    pub fn into_goal(self, user_id: i64, now: DateTime<Utc>) -> Result<Goal> {
        self.validate(now)?;
        let milestones = default_milestones(self.target_amount);
        Ok(Goal {
            id: 0,
            user_id,
            title: self.title.trim().to_string(),
            description: self.description,
            target_amount: self.target_amount,
            current_amount: 0.0,
            category: self.category,
            priority: self.priority,
            target_date: self.target_date,
            status: GoalStatus::Active,
            completed_at: None,
            auto_save: self.auto_save.unwrap_or_default(),
            milestones,
            contributions: Vec::new(),
            tags: self.tags,
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }
}

impl Goal {
    /// min(current / target, 100) as a percentage; 0 when target is not positive
    pub fn progress_percentage(&self) -> f64 {
        if self.target_amount > 0.0 {
            (self.current_amount / self.target_amount * 100.0).min(100.0)
        } else {
            0.0
        }
    }

    /// Whole days until the target date, rounded up
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        let secs = (start_of_day(self.target_date) - now).num_seconds();
        (secs + 86_399).div_euclid(86_400)
    }

    /// Amount to save per day to reach the target on time
    pub fn required_daily_savings(&self, now: DateTime<Utc>) -> f64 {
        let days = self.days_remaining(now);
        if days > 0 {
            ((self.target_amount - self.current_amount) / days as f64).max(0.0)
        } else {
            0.0
        }
    }

    /// Actual progress is at least the share of the schedule already elapsed
    pub fn is_on_track(&self, now: DateTime<Utc>) -> bool {
        if self.status == GoalStatus::Completed || self.current_amount >= self.target_amount {
            return true;
        }
        let total = (start_of_day(self.target_date) - self.created_at).num_seconds();
        if total <= 0 {
            return false;
        }
        let elapsed = (now - self.created_at).num_seconds().clamp(0, total);
        let expected = elapsed as f64 / total as f64 * 100.0;
        self.progress_percentage() >= expected
    }

    pub fn progress(&self, now: DateTime<Utc>) -> GoalProgress {
        GoalProgress {
            progress_percentage: self.progress_percentage(),
            days_remaining: self.days_remaining(now),
            required_daily_savings: self.required_daily_savings(now),
            remaining_amount: (self.target_amount - self.current_amount).max(0.0),
            on_track: self.is_on_track(now),
        }
    }

    pub fn with_progress(self, now: DateTime<Utc>) -> GoalWithProgress {
        let progress = self.progress(now);
        GoalWithProgress {
            goal: self,
            progress,
        }
    }

    /// Record a contribution and re-evaluate completion and milestones.
    ///
    /// Fails without touching any field when the goal is not active or the
    /// amount is not positive.
    pub fn add_contribution(
        &mut self,
        amount: f64,
        note: Option<String>,
        source: ContributionSource,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if !(amount > 0.0) {
            return Err(Error::Validation(
                "Contribution amount must be greater than 0".into(),
            ));
        }
        if self.status != GoalStatus::Active {
            return Err(Error::InvalidState(format!(
                "Cannot contribute to goal {} with status {}",
                self.id, self.status
            )));
        }

        self.contributions.push(Contribution {
            amount,
            date: now,
            note: note.filter(|n| !n.trim().is_empty()),
            source,
        });
        self.current_amount += amount;
        self.updated_at = now;

        if self.current_amount >= self.target_amount {
            self.status = GoalStatus::Completed;
            if self.completed_at.is_none() {
                self.completed_at = Some(now);
            }
            debug!(goal_id = self.id, "Goal reached its target");
        }

        for milestone in self.milestones.iter_mut().filter(|m| !m.achieved) {
            if self.current_amount >= milestone.amount {
                milestone.achieved = true;
                milestone.achieved_date = Some(now);
                debug!(
                    goal_id = self.id,
                    percentage = milestone.percentage,
                    "Milestone achieved"
                );
            }
        }

        Ok(())
    }

    /// Due when auto-save never ran, or a full period has elapsed since it did
    pub fn auto_save_due(&self, now: DateTime<Utc>) -> bool {
        match self.auto_save.last_auto_save {
            None => true,
            Some(last) => now - last >= self.auto_save.frequency.period(),
        }
    }

    /// Run one auto-save contribution if enabled and due; returns the amount saved
    pub fn run_auto_save(&mut self, now: DateTime<Utc>) -> Result<f64> {
        let AutoSave {
            enabled, amount, ..
        } = self.auto_save;
        if !enabled || !(amount > 0.0) {
            return Err(Error::Disabled(format!(
                "Auto-save is not enabled for goal {}",
                self.id
            )));
        }
        if !self.auto_save_due(now) {
            return Err(Error::NotDue(format!(
                "Next {} auto-save for goal {} is not due yet",
                self.auto_save.frequency.as_str(),
                self.id
            )));
        }

        self.add_contribution(amount, None, ContributionSource::AutoSave, now)?;
        self.auto_save.last_auto_save = Some(now);
        Ok(amount)
    }

    /// Apply caller-directed field edits.
    ///
    /// A new target recomputes milestone amounts but keeps achieved flags as
    /// they are, even when a raised threshold now exceeds the current amount.
    /// A completed goal is never reopened by a target change alone, and an
    /// active goal whose target drops to the current amount completes.
    pub fn apply_update(&mut self, update: GoalUpdate, now: DateTime<Utc>) -> Result<()> {
        if let Some(title) = &update.title {
            if title.trim().is_empty() {
                return Err(Error::Validation("Goal title cannot be empty".into()));
            }
        }
        if let Some(target) = update.target_amount {
            if !(target > 0.0) {
                return Err(Error::Validation(
                    "Goal target amount must be greater than 0".into(),
                ));
            }
        }
        if let Some(amount) = update.auto_save_amount {
            validate_auto_save_amount(amount)?;
        }

        if let Some(title) = update.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = Some(description).filter(|d| !d.trim().is_empty());
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(date) = update.target_date {
            self.target_date = date;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        if let Some(enabled) = update.auto_save_enabled {
            self.auto_save.enabled = enabled;
        }
        if let Some(amount) = update.auto_save_amount {
            self.auto_save.amount = amount;
        }
        if let Some(frequency) = update.auto_save_frequency {
            self.auto_save.frequency = frequency;
        }
        if let Some(target) = update.target_amount {
            self.target_amount = target;
            for milestone in &mut self.milestones {
                milestone.amount = target * f64::from(milestone.percentage) / 100.0;
            }
        }
        if let Some(status) = update.status {
            if status == GoalStatus::Completed && self.completed_at.is_none() {
                self.completed_at = Some(now);
            }
            self.status = status;
        }
        if self.status == GoalStatus::Active && self.current_amount >= self.target_amount {
            self.status = GoalStatus::Completed;
            self.completed_at.get_or_insert(now);
        }

        self.updated_at = now;
        Ok(())
    }
}

/// Per-status counts and sums, always reporting all four statuses
pub fn summarize_by_status(goals: &[Goal]) -> Vec<GoalStatusSummary> {
    GoalStatus::ALL
        .iter()
        .map(|status| {
            let matching = goals.iter().filter(|g| g.status == *status);
            let mut summary = GoalStatusSummary {
                status: status.as_str().to_string(),
                ..Default::default()
            };
            for goal in matching {
                summary.count += 1;
                summary.total_target += goal.target_amount;
                summary.total_current += goal.current_amount;
            }
            summary
        })
        .collect()
}

/// Active goals whose target date has passed
pub fn overdue_goals(goals: &[Goal], now: DateTime<Utc>) -> Vec<&Goal> {
    goals
        .iter()
        .filter(|g| g.status == GoalStatus::Active && start_of_day(g.target_date) < now)
        .collect()
}

/// Active goals ordered by priority rank, then by target date ascending
pub fn prioritized_goals(goals: &[Goal]) -> Vec<&Goal> {
    let mut active: Vec<&Goal> = goals
        .iter()
        .filter(|g| g.status == GoalStatus::Active)
        .collect();
    active.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then(a.target_date.cmp(&b.target_date))
    });
    active
}

fn validate_auto_save_amount(amount: f64) -> Result<()> {
    if amount < 0.0 || !amount.is_finite() {
        return Err(Error::Validation(
            "Auto-save amount cannot be negative".into(),
        ));
    }
    Ok(())
}

/// Midnight UTC at the start of `date`
pub(crate) fn start_of_day(date: chrono::NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AutoSaveFrequency, GoalCategory, GoalPriority};
    use chrono::{Duration, NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    }

    fn new_goal(target: f64) -> Goal {
        NewGoal {
            title: "Laptop".into(),
            description: None,
            target_amount: target,
            category: GoalCategory::Gadget,
            priority: GoalPriority::Medium,
            target_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            auto_save: None,
            tags: vec![],
        }
        .into_goal(1, now())
        .unwrap()
    }

    fn contributed_sum(goal: &Goal) -> f64 {
        goal.contributions.iter().map(|c| c.amount).sum()
    }

    #[test]
    fn test_new_goal_seeds_milestones() {
        let goal = new_goal(1000.0);
        let amounts: Vec<f64> = goal.milestones.iter().map(|m| m.amount).collect();
        assert_eq!(amounts, vec![250.0, 500.0, 750.0, 1000.0]);
        assert_eq!(goal.status, GoalStatus::Active);
        assert_eq!(goal.current_amount, 0.0);
    }

    #[test]
    fn test_new_goal_rejects_past_date() {
        let mut new = NewGoal {
            title: "Trip".into(),
            description: None,
            target_amount: 100.0,
            category: GoalCategory::Travel,
            priority: GoalPriority::Low,
            target_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            auto_save: None,
            tags: vec![],
        };
        assert!(matches!(new.validate(now()), Err(Error::Validation(_))));

        new.target_date = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        assert!(new.validate(now()).is_ok());

        new.target_amount = 0.0;
        assert!(matches!(new.validate(now()), Err(Error::Validation(_))));
    }

    #[test]
    fn test_contributions_sum_to_current_amount() {
        let mut goal = new_goal(1000.0);
        for amount in [10.0, 25.5, 100.0, 0.25] {
            goal.add_contribution(amount, None, ContributionSource::Manual, now())
                .unwrap();
        }
        assert!((contributed_sum(&goal) - goal.current_amount).abs() < 1e-9);
        assert_eq!(goal.contributions.len(), 4);
    }

    #[test]
    fn test_contribution_rejects_non_positive_amount() {
        let mut goal = new_goal(1000.0);
        let err = goal
            .add_contribution(0.0, None, ContributionSource::Manual, now())
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(goal.contributions.is_empty());
    }

    #[test]
    fn test_milestones_achieved_once() {
        let mut goal = new_goal(1000.0);
        goal.add_contribution(300.0, None, ContributionSource::Manual, now())
            .unwrap();
        assert!(goal.milestones[0].achieved);
        assert!(!goal.milestones[1].achieved);
        let first_date = goal.milestones[0].achieved_date;

        let later = now() + Duration::days(3);
        goal.add_contribution(300.0, None, ContributionSource::Bonus, later)
            .unwrap();
        assert!(goal.milestones[1].achieved);
        assert_eq!(goal.milestones[1].achieved_date, Some(later));
        // Earlier achievement date is untouched
        assert_eq!(goal.milestones[0].achieved_date, first_date);
    }

    #[test]
    fn test_completion_on_reaching_target() {
        let mut goal = new_goal(500.0);
        goal.add_contribution(600.0, Some("windfall".into()), ContributionSource::Bonus, now())
            .unwrap();
        assert_eq!(goal.status, GoalStatus::Completed);
        assert_eq!(goal.completed_at, Some(now()));
        assert!(goal.milestones.iter().all(|m| m.achieved));
        assert_eq!(goal.progress_percentage(), 100.0);
    }

    #[test]
    fn test_contribution_rejected_when_not_active() {
        for status in [GoalStatus::Paused, GoalStatus::Completed, GoalStatus::Cancelled] {
            let mut goal = new_goal(1000.0);
            goal.add_contribution(100.0, None, ContributionSource::Manual, now())
                .unwrap();
            goal.status = status;
            let before_amount = goal.current_amount;
            let before_milestones = goal.milestones.clone();

            let err = goal
                .add_contribution(500.0, None, ContributionSource::Manual, now())
                .unwrap_err();
            assert!(matches!(err, Error::InvalidState(_)));
            assert_eq!(goal.current_amount, before_amount);
            assert_eq!(goal.milestones, before_milestones);
            assert_eq!(goal.contributions.len(), 1);
        }
    }

    #[test]
    fn test_target_edit_keeps_achieved_milestones() {
        let mut goal = new_goal(1000.0);
        goal.add_contribution(300.0, None, ContributionSource::Manual, now())
            .unwrap();
        assert!(goal.milestones[0].achieved);

        goal.apply_update(
            GoalUpdate {
                target_amount: Some(4000.0),
                ..Default::default()
            },
            now(),
        )
        .unwrap();

        // 25% of 4000 is 1000, above the current 300, yet stays achieved
        assert_eq!(goal.milestones[0].amount, 1000.0);
        assert!(goal.milestones[0].achieved);
        assert_eq!(goal.milestones[3].amount, 4000.0);
    }

    #[test]
    fn test_target_edit_does_not_reopen_completed_goal() {
        let mut goal = new_goal(100.0);
        goal.add_contribution(100.0, None, ContributionSource::Manual, now())
            .unwrap();
        assert_eq!(goal.status, GoalStatus::Completed);

        goal.apply_update(
            GoalUpdate {
                target_amount: Some(500.0),
                ..Default::default()
            },
            now(),
        )
        .unwrap();
        assert_eq!(goal.status, GoalStatus::Completed);
    }

    #[test]
    fn test_lowered_target_completes_funded_goal() {
        let mut goal = new_goal(1000.0);
        goal.add_contribution(600.0, None, ContributionSource::Manual, now())
            .unwrap();
        let milestones_before: Vec<_> = goal
            .milestones
            .iter()
            .map(|m| (m.achieved, m.achieved_date))
            .collect();

        let later = now() + Duration::days(1);
        goal.apply_update(
            GoalUpdate {
                target_amount: Some(500.0),
                ..Default::default()
            },
            later,
        )
        .unwrap();

        assert_eq!(goal.status, GoalStatus::Completed);
        assert_eq!(goal.completed_at, Some(later));
        let milestones_after: Vec<_> = goal
            .milestones
            .iter()
            .map(|m| (m.achieved, m.achieved_date))
            .collect();
        assert_eq!(milestones_after, milestones_before);
        assert!(overdue_goals(std::slice::from_ref(&goal), later + Duration::days(365)).is_empty());
    }

    #[test]
    fn test_lowered_target_leaves_paused_goal_paused() {
        let mut goal = new_goal(1000.0);
        goal.add_contribution(600.0, None, ContributionSource::Manual, now())
            .unwrap();
        goal.apply_update(
            GoalUpdate {
                status: Some(GoalStatus::Paused),
                target_amount: Some(500.0),
                ..Default::default()
            },
            now(),
        )
        .unwrap();

        assert_eq!(goal.status, GoalStatus::Paused);
        assert_eq!(goal.completed_at, None);
    }

    #[test]
    fn test_achieved_milestones_survive_status_changes() {
        let mut goal = new_goal(1000.0);
        goal.add_contribution(300.0, None, ContributionSource::Manual, now())
            .unwrap();
        let flags = |g: &Goal| -> Vec<_> {
            g.milestones
                .iter()
                .map(|m| (m.percentage, m.achieved, m.achieved_date))
                .collect()
        };
        let before = flags(&goal);
        assert!(before[0].1);

        let edits = [
            GoalUpdate {
                status: Some(GoalStatus::Paused),
                ..Default::default()
            },
            GoalUpdate {
                status: Some(GoalStatus::Active),
                ..Default::default()
            },
            GoalUpdate {
                target_amount: Some(800.0),
                ..Default::default()
            },
            GoalUpdate {
                status: Some(GoalStatus::Cancelled),
                ..Default::default()
            },
        ];
        for (i, edit) in edits.into_iter().enumerate() {
            goal.apply_update(edit, now() + Duration::days(i as i64 + 1))
                .unwrap();
            assert_eq!(flags(&goal), before);
        }
        assert_eq!(goal.status, GoalStatus::Cancelled);
        assert_eq!(goal.milestones[0].amount, 200.0);
    }

    #[test]
    fn test_update_validation_leaves_goal_untouched() {
        let mut goal = new_goal(1000.0);
        let err = goal
            .apply_update(
                GoalUpdate {
                    title: Some("New".into()),
                    target_amount: Some(-5.0),
                    ..Default::default()
                },
                now(),
            )
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(goal.title, "Laptop");
    }

    fn auto_saving_goal(last: Option<DateTime<Utc>>) -> Goal {
        let mut goal = new_goal(1000.0);
        goal.auto_save = AutoSave {
            enabled: true,
            amount: 50.0,
            frequency: AutoSaveFrequency::Weekly,
            last_auto_save: last,
        };
        goal
    }

    #[test]
    fn test_weekly_auto_save_due_after_seven_days() {
        let goal = auto_saving_goal(Some(now() - Duration::days(6)));
        assert!(!goal.auto_save_due(now()));

        let goal = auto_saving_goal(Some(now() - Duration::days(7)));
        assert!(goal.auto_save_due(now()));

        let goal = auto_saving_goal(None);
        assert!(goal.auto_save_due(now()));
    }

    #[test]
    fn test_run_auto_save_adds_one_contribution() {
        let mut goal = auto_saving_goal(Some(now() - Duration::days(7)));
        let saved = goal.run_auto_save(now()).unwrap();
        assert_eq!(saved, 50.0);
        assert_eq!(goal.contributions.len(), 1);
        assert_eq!(goal.contributions[0].source, ContributionSource::AutoSave);
        assert_eq!(goal.auto_save.last_auto_save, Some(now()));
        assert_eq!(goal.current_amount, 50.0);

        // Immediately running again is not due
        let err = goal.run_auto_save(now()).unwrap_err();
        assert!(matches!(err, Error::NotDue(_)));
        assert_eq!(goal.contributions.len(), 1);
    }

    #[test]
    fn test_run_auto_save_not_due() {
        let mut goal = auto_saving_goal(Some(now() - Duration::days(6)));
        assert!(matches!(goal.run_auto_save(now()), Err(Error::NotDue(_))));
        assert!(goal.contributions.is_empty());
    }

    #[test]
    fn test_run_auto_save_disabled() {
        let mut goal = auto_saving_goal(None);
        goal.auto_save.enabled = false;
        assert!(matches!(goal.run_auto_save(now()), Err(Error::Disabled(_))));

        goal.auto_save.enabled = true;
        goal.auto_save.amount = 0.0;
        assert!(matches!(goal.run_auto_save(now()), Err(Error::Disabled(_))));
    }

    #[test]
    fn test_monthly_auto_save_uses_thirty_days() {
        let mut goal = auto_saving_goal(Some(now() - Duration::days(29)));
        goal.auto_save.frequency = AutoSaveFrequency::Monthly;
        assert!(!goal.auto_save_due(now()));
        goal.auto_save.last_auto_save = Some(now() - Duration::days(30));
        assert!(goal.auto_save_due(now()));
    }

    #[test]
    fn test_derived_fields() {
        let mut goal = new_goal(1000.0);
        goal.target_date = NaiveDate::from_ymd_opt(2024, 6, 11).unwrap();
        goal.add_contribution(200.0, None, ContributionSource::Manual, now())
            .unwrap();

        // 2024-06-01 09:00 -> 2024-06-11 00:00 is 9.625 days, rounded up
        assert_eq!(goal.days_remaining(now()), 10);
        assert!((goal.required_daily_savings(now()) - 80.0).abs() < 1e-9);
        assert_eq!(goal.progress_percentage(), 20.0);

        let midnight = Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap();
        assert_eq!(goal.days_remaining(midnight), 1);
        assert_eq!(goal.days_remaining(midnight + Duration::seconds(1)), 1);
        assert_eq!(goal.days_remaining(midnight + Duration::days(1)), 0);
        assert_eq!(goal.days_remaining(midnight + Duration::days(1) + Duration::seconds(1)), 0);
        assert_eq!(goal.days_remaining(midnight + Duration::days(2)), -1);

        let past = now() + Duration::days(30);
        assert!(goal.days_remaining(past) < 0);
        assert_eq!(goal.required_daily_savings(past), 0.0);
    }

    #[test]
    fn test_query_helpers() {
        let mut urgent_late = new_goal(100.0);
        urgent_late.id = 1;
        urgent_late.priority = GoalPriority::Urgent;
        urgent_late.target_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let mut urgent_soon = new_goal(100.0);
        urgent_soon.id = 2;
        urgent_soon.priority = GoalPriority::Urgent;
        urgent_soon.target_date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let mut low = new_goal(100.0);
        low.id = 3;
        low.priority = GoalPriority::Low;

        let mut paused = new_goal(100.0);
        paused.id = 4;
        paused.status = GoalStatus::Paused;
        paused.target_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let goals = vec![low, urgent_late, paused, urgent_soon];

        let ordered: Vec<i64> = prioritized_goals(&goals).iter().map(|g| g.id).collect();
        assert_eq!(ordered, vec![2, 1, 3]);

        let overdue: Vec<i64> = overdue_goals(&goals, now()).iter().map(|g| g.id).collect();
        assert_eq!(overdue, vec![2]);

        let summary = summarize_by_status(&goals);
        assert_eq!(summary.len(), 4);
        assert_eq!(summary[0].status, "active");
        assert_eq!(summary[0].count, 3);
        assert_eq!(summary[0].total_target, 300.0);
        assert_eq!(summary[2].status, "paused");
        assert_eq!(summary[2].count, 1);
    }
}
