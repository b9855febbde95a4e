//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{breakdown, monthly_trend, weekday_pattern, HealthStatus};
    use crate::export::ExpenseExportOptions;
    use crate::ledger::LedgerStore;
    use crate::period::DateRange;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> (Database, i64) {
        let db = Database::in_memory().unwrap();
        let user = db
            .create_user(&NewUser {
                name: "Asha".into(),
                email: "asha@example.com".into(),
                monthly_budget: 1000.0,
                currency: None,
            })
            .unwrap();
        (db, user.id)
    }

    fn add_expense(
        db: &Database,
        owner: i64,
        amount: f64,
        category: ExpenseCategory,
        on: NaiveDate,
    ) -> Expense {
        db.create_expense(
            owner,
            &NewExpense {
                amount,
                description: format!("{} spend", category),
                category: Some(category),
                date: on,
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn add_income(db: &Database, owner: i64, amount: f64, on: NaiveDate) -> Income {
        db.create_income(
            owner,
            &NewIncome {
                amount,
                source: IncomeSource::Stipend,
                date: on,
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn new_goal(title: &str, target: f64) -> NewGoal {
        NewGoal {
            title: title.into(),
            description: None,
            target_amount: target,
            category: GoalCategory::Travel,
            priority: GoalPriority::Medium,
            target_date: date(2024, 12, 31),
            auto_save: None,
            tags: vec![],
        }
    }

    fn weekly_auto_save(amount: f64) -> Option<AutoSave> {
        Some(AutoSave {
            enabled: true,
            amount,
            frequency: AutoSaveFrequency::Weekly,
            last_auto_save: None,
        })
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        assert!(db.list_users().unwrap().is_empty());
    }

    // ========== Users ==========

    #[test]
    fn test_user_crud() {
        let (db, id) = setup();

        let user = db.get_user(id).unwrap();
        assert_eq!(user.name, "Asha");
        assert_eq!(user.currency, "USD");
        assert_eq!(user.monthly_budget, 1000.0);

        let updated = db.set_monthly_budget(id, 1500.0).unwrap();
        assert_eq!(updated.monthly_budget, 1500.0);

        assert!(matches!(
            db.set_monthly_budget(id, -1.0),
            Err(Error::Validation(_))
        ));
        assert!(matches!(db.get_user(999), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_user_email_is_unique_and_lowercased() {
        let (db, _) = setup();

        let result = db.create_user(&NewUser {
            name: "Other".into(),
            email: "ASHA@example.com".into(),
            monthly_budget: 0.0,
            currency: Some("INR".into()),
        });
        assert!(matches!(result, Err(Error::Validation(_))));

        let result = db.create_user(&NewUser {
            name: "Nobody".into(),
            email: "not-an-email".into(),
            monthly_budget: 0.0,
            currency: None,
        });
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    // ========== Expenses and incomes ==========

    #[test]
    fn test_expense_category_suggested_when_missing() {
        let (db, owner) = setup();

        let expense = db
            .create_expense(
                owner,
                &NewExpense {
                    amount: 8.5,
                    description: "Lunch at the canteen".into(),
                    date: date(2024, 6, 3),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(expense.category, ExpenseCategory::Food);
        assert!(expense.ai_generated);
        assert!(expense.ai_confidence.unwrap() >= 0.6);

        let explicit = add_expense(&db, owner, 12.0, ExpenseCategory::Housing, date(2024, 6, 4));
        assert!(!explicit.ai_generated);
        assert_eq!(explicit.ai_confidence, None);
    }

    #[test]
    fn test_expense_validation() {
        let (db, owner) = setup();

        let result = db.create_expense(
            owner,
            &NewExpense {
                amount: 0.0,
                description: "Nothing".into(),
                date: date(2024, 6, 3),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(Error::Validation(_))));

        let result = db.create_expense(
            owner,
            &NewExpense {
                amount: 5.0,
                description: "   ".into(),
                date: date(2024, 6, 3),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_expense_filter_and_paging() {
        let (db, owner) = setup();

        for day in 1..=5 {
            add_expense(&db, owner, day as f64 * 10.0, ExpenseCategory::Food, date(2024, 6, day));
        }
        add_expense(&db, owner, 99.0, ExpenseCategory::Transport, date(2024, 6, 2));

        let all = ExpenseFilter::new();
        assert_eq!(db.count_expenses(owner, &all).unwrap(), 6);

        let food = ExpenseFilter::new().category(Some(ExpenseCategory::Food));
        assert_eq!(db.count_expenses(owner, &food).unwrap(), 5);

        // Newest first by default
        let page = db.list_expenses(owner, &food, 2, 0).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].date, date(2024, 6, 5));
        assert_eq!(page[1].date, date(2024, 6, 4));

        let page = db.list_expenses(owner, &food, 2, 4).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].date, date(2024, 6, 1));

        let by_amount = ExpenseFilter::new().sort(SortField::Amount, SortOrder::Desc);
        let top = db.list_expenses(owner, &by_amount, 1, 0).unwrap();
        assert_eq!(top[0].amount, 99.0);

        let ranged = ExpenseFilter::new().date_range(Some((date(2024, 6, 2), date(2024, 6, 3))));
        assert_eq!(db.count_expenses(owner, &ranged).unwrap(), 3);

        let search = ExpenseFilter::new().search(Some("transport"));
        assert_eq!(db.count_expenses(owner, &search).unwrap(), 1);
    }

    #[test]
    fn test_records_are_owner_scoped() {
        let (db, owner) = setup();
        let other = db
            .create_user(&NewUser {
                name: "Ravi".into(),
                email: "ravi@example.com".into(),
                monthly_budget: 0.0,
                currency: None,
            })
            .unwrap()
            .id;

        let expense = add_expense(&db, owner, 20.0, ExpenseCategory::Food, date(2024, 6, 1));
        let income = add_income(&db, owner, 500.0, date(2024, 6, 1));

        assert!(matches!(
            db.get_expense(other, expense.id),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            db.delete_expense(other, expense.id),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            db.get_income(other, income.id),
            Err(Error::NotFound(_))
        ));
        assert_eq!(db.count_expenses(other, &ExpenseFilter::new()).unwrap(), 0);

        db.delete_expense(owner, expense.id).unwrap();
        assert!(matches!(
            db.get_expense(owner, expense.id),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_income_next_expected_date() {
        let (db, owner) = setup();

        let income = db
            .create_income(
                owner,
                &NewIncome {
                    amount: 300.0,
                    source: IncomeSource::Allowance,
                    date: date(2024, 1, 31),
                    is_recurring: true,
                    recurring_frequency: Some(Frequency::Monthly),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(income.next_expected_date, Some(date(2024, 2, 29)));

        let one_off = add_income(&db, owner, 50.0, date(2024, 2, 1));
        assert_eq!(one_off.next_expected_date, None);

        let filter = IncomeFilter::new().recurring_only(true);
        assert_eq!(db.count_incomes(owner, &filter).unwrap(), 1);
    }

    // ========== Ledger queries ==========

    #[test]
    fn test_category_breakdown() {
        let (db, owner) = setup();
        add_expense(&db, owner, 100.0, ExpenseCategory::Food, date(2024, 6, 1));
        add_expense(&db, owner, 50.0, ExpenseCategory::Food, date(2024, 6, 2));
        add_expense(&db, owner, 30.0, ExpenseCategory::Transport, date(2024, 6, 3));
        // Outside the window
        add_expense(&db, owner, 500.0, ExpenseCategory::Shopping, date(2024, 5, 31));

        let range = DateRange::new(date(2024, 6, 1), date(2024, 6, 30)).unwrap();
        let groups = breakdown(&db, owner, EntryKind::Expense, range).unwrap();

        assert_eq!(
            groups,
            vec![
                GroupTotal {
                    key: "food".into(),
                    total_amount: 150.0,
                    count: 2,
                    avg_amount: 75.0,
                },
                GroupTotal {
                    key: "transport".into(),
                    total_amount: 30.0,
                    count: 1,
                    avg_amount: 30.0,
                },
            ]
        );
    }

    #[test]
    fn test_group_by_rejects_foreign_key() {
        let (db, owner) = setup();
        let range = DateRange::new(date(2024, 6, 1), date(2024, 6, 30)).unwrap();

        let result = db.group_by(owner, EntryKind::Income, range, GroupKey::Category);
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_sum_and_count_empty_window() {
        let (db, owner) = setup();
        let range = DateRange::new(date(2024, 6, 1), date(2024, 6, 30)).unwrap();

        let totals = db.sum_and_count(owner, EntryKind::Income, range).unwrap();
        assert_eq!(totals, Totals::default());
    }

    #[test]
    fn test_monthly_trend_omits_empty_months() {
        let (db, owner) = setup();
        add_expense(&db, owner, 40.0, ExpenseCategory::Food, date(2024, 2, 10));
        add_expense(&db, owner, 60.0, ExpenseCategory::Food, date(2024, 4, 20));
        add_expense(&db, owner, 15.0, ExpenseCategory::Food, date(2024, 4, 21));
        add_expense(&db, owner, 999.0, ExpenseCategory::Food, date(2023, 6, 1));

        let buckets = monthly_trend(&db, owner, EntryKind::Expense, 6, now()).unwrap();
        assert_eq!(buckets.len(), 2);
        assert_eq!((buckets[0].year, buckets[0].month), (2024, 2));
        assert_eq!(buckets[0].total_amount, 40.0);
        assert_eq!((buckets[1].year, buckets[1].month), (2024, 4));
        assert_eq!(buckets[1].total_amount, 75.0);
        assert_eq!(buckets[1].count, 2);
    }

    #[test]
    fn test_weekday_pattern() {
        let (db, owner) = setup();
        // 2024-06-09 is a Sunday, 2024-06-12 a Wednesday
        add_expense(&db, owner, 25.0, ExpenseCategory::Food, date(2024, 6, 9));
        add_expense(&db, owner, 10.0, ExpenseCategory::Food, date(2024, 6, 12));
        add_expense(&db, owner, 20.0, ExpenseCategory::Transport, date(2024, 6, 12));

        let range = DateRange::new(date(2024, 6, 1), date(2024, 6, 30)).unwrap();
        let days = weekday_pattern(&db, owner, range).unwrap();

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day_index, 0);
        assert_eq!(days[0].day_name, "Sunday");
        assert_eq!(days[1].day_index, 3);
        assert_eq!(days[1].day_name, "Wednesday");
        assert_eq!(days[1].total_amount, 30.0);
        assert_eq!(days[1].count, 2);
        assert_eq!(days[1].avg_amount, 15.0);
    }

    #[test]
    fn test_amount_stats_by_category() {
        let (db, owner) = setup();
        add_expense(&db, owner, 5.0, ExpenseCategory::Food, date(2024, 6, 1));
        add_expense(&db, owner, 15.0, ExpenseCategory::Food, date(2024, 6, 2));

        let range = DateRange::new(date(2024, 6, 1), date(2024, 6, 30)).unwrap();
        let stats = db.amount_stats_by_category(owner, range).unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].category, "food");
        assert_eq!(stats[0].min_amount, 5.0);
        assert_eq!(stats[0].max_amount, 15.0);
        assert_eq!(stats[0].avg_amount, 10.0);
    }

    // ========== Goals ==========

    #[test]
    fn test_goal_create_and_contribute() {
        let (db, owner) = setup();

        let goal = db.create_goal(owner, new_goal("Trip", 1000.0), now()).unwrap();
        assert!(goal.id > 0);
        assert_eq!(goal.status, GoalStatus::Active);
        assert_eq!(goal.milestones.len(), 4);

        let goal = db
            .add_goal_contribution(
                owner,
                goal.id,
                300.0,
                Some("First".into()),
                ContributionSource::Manual,
                now(),
            )
            .unwrap();
        assert_eq!(goal.current_amount, 300.0);

        let stored = db.get_goal(owner, goal.id).unwrap();
        assert_eq!(stored.current_amount, 300.0);
        assert_eq!(stored.version, goal.version);
        assert_eq!(stored.contributions.len(), 1);
        assert_eq!(stored.contributions[0].date, now());
        assert_eq!(stored.contributions[0].note.as_deref(), Some("First"));
        let achieved: Vec<u8> = stored
            .milestones
            .iter()
            .filter(|m| m.achieved)
            .map(|m| m.percentage)
            .collect();
        assert_eq!(achieved, vec![25]);
        assert_eq!(stored.milestones[0].achieved_date, Some(now()));
    }

    #[test]
    fn test_goal_completes_and_keeps_contribution_sum() {
        let (db, owner) = setup();
        let goal = db.create_goal(owner, new_goal("Laptop", 500.0), now()).unwrap();

        for amount in [200.0, 250.0, 100.0] {
            db.add_goal_contribution(owner, goal.id, amount, None, ContributionSource::Bonus, now())
                .unwrap();
        }

        let stored = db.get_goal(owner, goal.id).unwrap();
        assert_eq!(stored.status, GoalStatus::Completed);
        assert_eq!(stored.completed_at, Some(now()));
        let sum: f64 = stored.contributions.iter().map(|c| c.amount).sum();
        assert_eq!(sum, stored.current_amount);
        assert!(stored.milestones.iter().all(|m| m.achieved));

        let result =
            db.add_goal_contribution(owner, goal.id, 10.0, None, ContributionSource::Manual, now());
        assert!(matches!(result, Err(Error::InvalidState(_))));
    }

    #[test]
    fn test_rejected_contribution_leaves_goal_unchanged() {
        let (db, owner) = setup();
        let goal = db.create_goal(owner, new_goal("Bike", 800.0), now()).unwrap();
        let paused = db
            .update_goal(
                owner,
                goal.id,
                GoalUpdate {
                    status: Some(GoalStatus::Paused),
                    ..Default::default()
                },
                now(),
            )
            .unwrap();

        let result =
            db.add_goal_contribution(owner, goal.id, 50.0, None, ContributionSource::Manual, now());
        assert!(matches!(result, Err(Error::InvalidState(_))));

        let stored = db.get_goal(owner, goal.id).unwrap();
        assert_eq!(stored.current_amount, 0.0);
        assert!(stored.contributions.is_empty());
        assert_eq!(stored.version, paused.version);
    }

    #[test]
    fn test_goal_update_rescales_milestones() {
        let (db, owner) = setup();
        let goal = db.create_goal(owner, new_goal("Phone", 400.0), now()).unwrap();

        let updated = db
            .update_goal(
                owner,
                goal.id,
                GoalUpdate {
                    title: Some("New phone".into()),
                    target_amount: Some(800.0),
                    ..Default::default()
                },
                now(),
            )
            .unwrap();
        assert_eq!(updated.title, "New phone");

        let stored = db.get_goal(owner, goal.id).unwrap();
        let amounts: Vec<f64> = stored.milestones.iter().map(|m| m.amount).collect();
        assert_eq!(amounts, vec![200.0, 400.0, 600.0, 800.0]);
    }

    #[test]
    fn test_goal_lowered_target_completes_and_persists() {
        let (db, owner) = setup();
        let goal = db.create_goal(owner, new_goal("Bike", 1000.0), now()).unwrap();
        db.add_goal_contribution(owner, goal.id, 600.0, None, ContributionSource::Manual, now())
            .unwrap();

        let later = now() + Duration::days(2);
        db.update_goal(
            owner,
            goal.id,
            GoalUpdate {
                target_amount: Some(500.0),
                ..Default::default()
            },
            later,
        )
        .unwrap();

        let stored = db.get_goal(owner, goal.id).unwrap();
        assert_eq!(stored.status, GoalStatus::Completed);
        assert_eq!(stored.completed_at, Some(later));
        let achieved: Vec<bool> = stored.milestones.iter().map(|m| m.achieved).collect();
        assert_eq!(achieved, vec![true, true, false, false]);
        assert!(db
            .list_goals(owner, Some(GoalStatus::Active))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_failed_commit_rolls_back() {
        let (db, _owner) = setup();
        let conn = db.conn().unwrap();

        // A deferred foreign key violation surfaces at COMMIT
        conn.execute_batch("BEGIN IMMEDIATE; PRAGMA defer_foreign_keys = ON;")
            .unwrap();
        conn.execute(
            "INSERT INTO goal_milestones (goal_id, position, percentage, amount)
             VALUES (9999, 0, 25, 1.0)",
            [],
        )
        .unwrap();

        assert!(crate::db::commit_or_rollback(&conn).is_err());
        assert!(conn.is_autocommit());
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM goal_milestones", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_goal_create_rejects_past_target() {
        let (db, owner) = setup();
        let mut past = new_goal("Late", 100.0);
        past.target_date = date(2024, 6, 1);

        assert!(matches!(
            db.create_goal(owner, past, now()),
            Err(Error::Validation(_))
        ));
        assert!(db.list_goals(owner, None).unwrap().is_empty());
    }

    #[test]
    fn test_stale_version_conflicts() {
        let (db, owner) = setup();
        let goal = db.create_goal(owner, new_goal("Trip", 1000.0), now()).unwrap();

        let conn = db.conn().unwrap();
        let mut loaded = goals::load_goal(&conn, owner, goal.id).unwrap();
        let loaded_version = loaded.version;
        conn.execute(
            "UPDATE goals SET version = version + 1 WHERE id = ?",
            [goal.id],
        )
        .unwrap();

        loaded.title = "Stale write".into();
        let result = goals::save_goal(&conn, &loaded, loaded_version, 0);
        assert!(matches!(result, Err(Error::Conflict(_))));
        drop(conn);

        assert_eq!(db.get_goal(owner, goal.id).unwrap().title, "Trip");
    }

    #[test]
    fn test_goal_delete_cascades() {
        let (db, owner) = setup();
        let goal = db.create_goal(owner, new_goal("Trip", 1000.0), now()).unwrap();
        db.add_goal_contribution(owner, goal.id, 10.0, None, ContributionSource::Manual, now())
            .unwrap();

        db.delete_goal(owner, goal.id).unwrap();
        assert!(matches!(db.get_goal(owner, goal.id), Err(Error::NotFound(_))));

        let conn = db.conn().unwrap();
        let orphans: i64 = conn
            .query_row(
                "SELECT (SELECT COUNT(*) FROM goal_milestones) + (SELECT COUNT(*) FROM goal_contributions)",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn test_list_goals_by_status() {
        let (db, owner) = setup();
        let a = db.create_goal(owner, new_goal("A", 100.0), now()).unwrap();
        db.create_goal(owner, new_goal("B", 100.0), now()).unwrap();
        db.add_goal_contribution(owner, a.id, 100.0, None, ContributionSource::Manual, now())
            .unwrap();

        assert_eq!(db.list_goals(owner, None).unwrap().len(), 2);
        let completed = db.list_goals(owner, Some(GoalStatus::Completed)).unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, a.id);
    }

    #[test]
    fn test_auto_save_schedule() {
        let (db, owner) = setup();
        let mut fund = new_goal("Fund", 1000.0);
        fund.auto_save = weekly_auto_save(100.0);
        let goal = db.create_goal(owner, fund, now()).unwrap();

        let (goal, saved) = db.run_goal_auto_save(owner, goal.id, now()).unwrap();
        assert_eq!(saved, 100.0);
        assert_eq!(goal.auto_save.last_auto_save, Some(now()));

        let result = db.run_goal_auto_save(owner, goal.id, now() + Duration::days(1));
        assert!(matches!(result, Err(Error::NotDue(_))));

        let (goal, _) = db
            .run_goal_auto_save(owner, goal.id, now() + Duration::days(7))
            .unwrap();
        assert_eq!(goal.current_amount, 200.0);

        let stored = db.get_goal(owner, goal.id).unwrap();
        assert_eq!(stored.contributions.len(), 2);
        assert!(stored
            .contributions
            .iter()
            .all(|c| c.source == ContributionSource::AutoSave));
        assert_eq!(
            stored.auto_save.last_auto_save,
            Some(now() + Duration::days(7))
        );
    }

    #[test]
    fn test_auto_save_disabled() {
        let (db, owner) = setup();
        let goal = db.create_goal(owner, new_goal("Plain", 100.0), now()).unwrap();

        let result = db.run_goal_auto_save(owner, goal.id, now());
        assert!(matches!(result, Err(Error::Disabled(_))));
    }

    #[test]
    fn test_auto_save_sweep() {
        let (db, owner) = setup();

        let mut due = new_goal("Due", 1000.0);
        due.auto_save = weekly_auto_save(50.0);
        let due = db.create_goal(owner, due, now()).unwrap();

        let mut paused = new_goal("Paused", 1000.0);
        paused.auto_save = weekly_auto_save(50.0);
        let paused = db.create_goal(owner, paused, now()).unwrap();
        db.update_goal(
            owner,
            paused.id,
            GoalUpdate {
                status: Some(GoalStatus::Paused),
                ..Default::default()
            },
            now(),
        )
        .unwrap();

        db.create_goal(owner, new_goal("Manual", 1000.0), now()).unwrap();

        let sweep = db.run_due_auto_saves(owner, now()).unwrap();
        assert_eq!(sweep.applied.len(), 1);
        assert_eq!(sweep.applied[0].goal_id, due.id);
        assert_eq!(sweep.total_saved(), 50.0);
        assert_eq!(sweep.conflicts, 0);

        let again = db.run_due_auto_saves(owner, now() + Duration::hours(1)).unwrap();
        assert!(again.applied.is_empty());
        assert_eq!(again.not_due, 1);
    }

    // ========== Reports ==========

    #[test]
    fn test_budget_projection_report() {
        let (db, owner) = setup();
        add_expense(&db, owner, 300.0, ExpenseCategory::Food, date(2024, 6, 3));
        add_expense(&db, owner, 400.0, ExpenseCategory::Housing, date(2024, 6, 10));
        add_expense(&db, owner, 900.0, ExpenseCategory::Housing, date(2024, 5, 10));

        let projection = db.budget_projection(owner, now()).unwrap();
        assert_eq!(projection.monthly_budget, 1000.0);
        assert_eq!(projection.current_spending, 700.0);
        assert!((projection.budget_utilization - 70.0).abs() < 1e-9);
        assert!((projection.remaining_budget - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_financial_health_report() {
        let (db, owner) = setup();
        add_income(&db, owner, 1000.0, date(2024, 6, 1));
        add_expense(&db, owner, 700.0, ExpenseCategory::Housing, date(2024, 6, 3));
        let goal = db.create_goal(owner, new_goal("Trip", 1000.0), now()).unwrap();
        db.add_goal_contribution(owner, goal.id, 300.0, None, ContributionSource::Manual, now())
            .unwrap();

        let health = db.financial_health(owner, now()).unwrap();
        assert_eq!(health.score, 70);
        assert_eq!(health.status, HealthStatus::Good);
        assert_eq!(health.savings_rate, 30.0);
    }

    #[test]
    fn test_reports_need_existing_user() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(
            db.budget_projection(42, now()),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            db.financial_health(42, now()),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_export_csv_oldest_first() {
        let (db, owner) = setup();
        add_expense(&db, owner, 20.0, ExpenseCategory::Food, date(2024, 6, 5));
        add_expense(&db, owner, 10.0, ExpenseCategory::Transport, date(2024, 6, 1));
        add_expense(&db, owner, 30.0, ExpenseCategory::Food, date(2024, 7, 1));

        let csv = db
            .export_expenses_csv(
                owner,
                &ExpenseExportOptions {
                    from: None,
                    to: Some(date(2024, 6, 30)),
                    category: None,
                },
            )
            .unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("2024-06-01,"));
        assert!(lines[2].starts_with("2024-06-05,"));
    }

    // ========== Encryption ==========

    #[test]
    fn test_encrypted_database() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("encrypted.db");
        let path = path.to_str().unwrap();

        {
            let db = Database::new_with_key(path, Some("test-passphrase")).unwrap();
            db.create_user(&NewUser {
                name: "Asha".into(),
                email: "asha@example.com".into(),
                monthly_budget: 0.0,
                currency: None,
            })
            .unwrap();
        }

        {
            let db = Database::new_with_key(path, Some("test-passphrase")).unwrap();
            assert_eq!(db.list_users().unwrap().len(), 1);
        }

        assert!(
            Database::new_with_key(path, None).is_err(),
            "Should fail to open encrypted db without key"
        );
        assert!(
            Database::new_with_key(path, Some("wrong-passphrase")).is_err(),
            "Should fail to open encrypted db with wrong key"
        );
    }

    #[test]
    fn test_key_derivation_is_deterministic() {
        let key1 = derive_key("my-secret").unwrap();
        let key2 = derive_key("my-secret").unwrap();
        assert_eq!(key1, key2);
        assert_eq!(key1.len(), 64);

        let key3 = derive_key("other-secret").unwrap();
        assert_ne!(key1, key3);
    }

    #[test]
    fn test_unencrypted_database_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.db");
        let path = path.to_str().unwrap();

        {
            let db = Database::new_unencrypted(path).unwrap();
            db.create_user(&NewUser {
                name: "Ravi".into(),
                email: "ravi@example.com".into(),
                monthly_budget: 250.0,
                currency: Some("INR".into()),
            })
            .unwrap();
        }

        let db = Database::new_unencrypted(path).unwrap();
        let users = db.list_users().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].currency, "INR");
    }
}
