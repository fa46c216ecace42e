//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn seeded_db() -> (Database, i64) {
        let db = Database::in_memory().unwrap();
        let profile_id = db.seed_default_profile().unwrap();
        db.seed_default_categories().unwrap();
        (db, profile_id)
    }

    fn category(db: &Database, name: &str) -> i64 {
        db.get_category_by_name(name).unwrap().unwrap().id
    }

    fn new_expense(profile_id: i64, category_id: i64, amount: f64, date: NaiveDate) -> NewExpense {
        NewExpense {
            profile_id,
            category_id,
            amount,
            date,
            description: "test expense".to_string(),
            recurrence: Recurrence::None,
            recurrence_end_date: None,
        }
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        let profiles = db.list_profiles().unwrap();
        assert!(profiles.is_empty());
    }

    #[test]
    fn test_profile_upsert() {
        let db = Database::in_memory().unwrap();

        let id = db.upsert_profile("sam").unwrap();
        assert!(id > 0);

        // Upsert same profile returns same ID
        let id2 = db.upsert_profile("sam").unwrap();
        assert_eq!(id, id2);

        let profiles = db.list_profiles().unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].name, "sam");
    }

    #[test]
    fn test_resolve_profile() {
        let db = Database::in_memory().unwrap();

        // Nothing seeded yet
        assert!(db.resolve_profile(None).is_err());

        db.seed_default_profile().unwrap();
        let profile = db.resolve_profile(None).unwrap();
        assert_eq!(profile.name, "default");

        db.upsert_profile("alex").unwrap();
        let profile = db.resolve_profile(Some("alex")).unwrap();
        assert_eq!(profile.name, "alex");

        assert!(db.resolve_profile(Some("missing")).is_err());
    }

    #[test]
    fn test_seed_default_categories_idempotent() {
        let db = Database::in_memory().unwrap();
        db.seed_default_categories().unwrap();
        db.seed_default_categories().unwrap();

        let categories = db.list_categories().unwrap();
        assert_eq!(categories.len(), 12);
        assert!(categories.iter().all(|c| c.is_default));
    }

    #[test]
    fn test_category_crud() {
        let db = Database::in_memory().unwrap();

        let id = db.create_category("Pets", Some("#ff0000")).unwrap();
        let cat = db.get_category(id).unwrap().unwrap();
        assert_eq!(cat.name, "Pets");
        assert!(!cat.is_default);

        // Duplicate name rejected
        assert!(db.create_category("Pets", None).is_err());

        db.update_category(id, Some("Animals"), None).unwrap();
        let cat = db.get_category(id).unwrap().unwrap();
        assert_eq!(cat.name, "Animals");
        assert_eq!(cat.color.as_deref(), Some("#ff0000"));

        db.delete_category(id).unwrap();
        assert!(db.get_category(id).unwrap().is_none());
    }

    #[test]
    fn test_category_lookup_case_insensitive() {
        let db = Database::in_memory().unwrap();
        db.seed_default_categories().unwrap();

        assert!(db.get_category_by_name("groceries").unwrap().is_some());
        assert!(db.get_category_by_name("GROCERIES").unwrap().is_some());
        assert!(db.get_category_by_name("nope").unwrap().is_none());
    }

    #[test]
    fn test_category_delete_protected_while_in_use() {
        let (db, profile_id) = seeded_db();
        let cat_id = category(&db, "Dining");

        let ledger = crate::ledger::Ledger::new(&db);
        ledger
            .create_expense(&new_expense(profile_id, cat_id, 12.5, d(2024, 5, 1)))
            .unwrap();

        let err = db.delete_category(cat_id).unwrap_err();
        assert!(matches!(err, crate::error::Error::InvalidData(_)));
    }

    #[test]
    fn test_expense_insert_and_get() {
        let (db, profile_id) = seeded_db();
        let cat_id = category(&db, "Groceries");

        let ledger = crate::ledger::Ledger::new(&db);
        let created = ledger
            .create_expense(&new_expense(profile_id, cat_id, 54.20, d(2024, 5, 10)))
            .unwrap();

        let expense = db.get_expense(created.expense.id).unwrap().unwrap();
        assert_eq!(expense.amount, 54.20);
        assert_eq!(expense.date, d(2024, 5, 10));
        assert_eq!(expense.category_name.as_deref(), Some("Groceries"));
        assert!(!expense.is_flagged);
    }

    #[test]
    fn test_list_expenses_ordering_and_pagination() {
        let (db, profile_id) = seeded_db();
        let cat_id = category(&db, "Groceries");
        let ledger = crate::ledger::Ledger::new(&db);

        for day in 1..=5 {
            ledger
                .create_expense(&new_expense(profile_id, cat_id, day as f64, d(2024, 5, day)))
                .unwrap();
        }

        // Most recent first
        let all = db.list_expenses(ExpenseFilter::new(), 100, 0).unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].date, d(2024, 5, 5));
        assert_eq!(all[4].date, d(2024, 5, 1));

        let page = db.list_expenses(ExpenseFilter::new(), 2, 2).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].date, d(2024, 5, 3));

        let count = db.count_expenses(ExpenseFilter::new()).unwrap();
        assert_eq!(count, 5);
    }

    #[test]
    fn test_list_expenses_filters() {
        let (db, profile_id) = seeded_db();
        let groceries = category(&db, "Groceries");
        let dining = category(&db, "Dining");
        let ledger = crate::ledger::Ledger::new(&db);

        ledger
            .create_expense(&NewExpense {
                description: "weekly shop".to_string(),
                ..new_expense(profile_id, groceries, 80.0, d(2024, 5, 1))
            })
            .unwrap();
        ledger
            .create_expense(&NewExpense {
                description: "pizza night".to_string(),
                ..new_expense(profile_id, dining, 35.0, d(2024, 5, 2))
            })
            .unwrap();

        let by_category = db
            .list_expenses(ExpenseFilter::new().category_id(Some(dining)), 100, 0)
            .unwrap();
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].description, "pizza night");

        let by_amount = db
            .list_expenses(ExpenseFilter::new().min_amount(Some(50.0)), 100, 0)
            .unwrap();
        assert_eq!(by_amount.len(), 1);
        assert_eq!(by_amount[0].amount, 80.0);

        let by_search = db
            .list_expenses(ExpenseFilter::new().description(Some("PIZZA")), 100, 0)
            .unwrap();
        assert_eq!(by_search.len(), 1);

        let by_date = db
            .list_expenses(
                ExpenseFilter::new()
                    .from_date(Some(d(2024, 5, 2)))
                    .to_date(Some(d(2024, 5, 2))),
                100,
                0,
            )
            .unwrap();
        assert_eq!(by_date.len(), 1);
        assert_eq!(by_date[0].date, d(2024, 5, 2));
    }

    #[test]
    fn test_instance_cascade_on_expense_delete() {
        let (db, profile_id) = seeded_db();
        let cat_id = category(&db, "Housing");
        let ledger = crate::ledger::Ledger::new(&db);

        let created = ledger
            .create_expense(&NewExpense {
                recurrence: Recurrence::Monthly,
                recurrence_end_date: Some(d(2024, 12, 31)),
                ..new_expense(profile_id, cat_id, 1200.0, d(2024, 1, 1))
            })
            .unwrap();
        assert!(created.instances_created > 0);

        ledger.delete_expense(created.expense.id).unwrap();

        let conn = db.conn().unwrap();
        let remaining: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM recurring_instances WHERE expense_id = ?",
                [created.expense.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_instance_edit_sets_modified() {
        let (db, profile_id) = seeded_db();
        let cat_id = category(&db, "Utilities");
        let ledger = crate::ledger::Ledger::new(&db);

        let created = ledger
            .create_expense(&NewExpense {
                recurrence: Recurrence::Monthly,
                recurrence_end_date: Some(d(2024, 6, 30)),
                ..new_expense(profile_id, cat_id, 60.0, d(2024, 1, 15))
            })
            .unwrap();

        let instances = db
            .list_instances(created.expense.id, false, d(2024, 1, 1))
            .unwrap();
        assert!(!instances.is_empty());
        assert!(instances.iter().all(|i| !i.is_modified && !i.is_paid));

        let target = &instances[0];
        let edited = ledger
            .edit_instance(
                target.id,
                &crate::ledger::InstanceEdit {
                    date: target.date,
                    amount: 75.0,
                    is_paid: true,
                },
            )
            .unwrap();
        assert!(edited.is_modified);
        assert!(edited.is_paid);
        assert_eq!(edited.amount, 75.0);
    }

    #[test]
    fn test_upcoming_instances_skip_paid() {
        let (db, profile_id) = seeded_db();
        let cat_id = category(&db, "Utilities");
        let ledger = crate::ledger::Ledger::new(&db);

        let created = ledger
            .create_expense(&NewExpense {
                recurrence: Recurrence::Monthly,
                recurrence_end_date: Some(d(2024, 6, 30)),
                ..new_expense(profile_id, cat_id, 60.0, d(2024, 1, 15))
            })
            .unwrap();

        let instances = db
            .list_instances(created.expense.id, false, d(2024, 1, 1))
            .unwrap();
        let first = &instances[0];
        ledger
            .edit_instance(
                first.id,
                &crate::ledger::InstanceEdit {
                    date: first.date,
                    amount: first.amount,
                    is_paid: true,
                },
            )
            .unwrap();

        let upcoming = db.upcoming_instances(profile_id, d(2024, 1, 1), 10).unwrap();
        assert!(upcoming.iter().all(|i| i.id != first.id));
        assert_eq!(upcoming.len(), instances.len() - 1);
    }

    #[test]
    fn test_anomaly_review_and_listing() {
        let (db, profile_id) = seeded_db();
        let cat_id = category(&db, "Dining");
        let ledger = crate::ledger::Ledger::new(&db);

        // Five-expense history inside the trailing window, then a spike
        let today = chrono::Utc::now().date_naive();
        for days_ago in 1..=5 {
            let date = today - chrono::Duration::days(days_ago);
            ledger
                .create_expense(&new_expense(profile_id, cat_id, 20.0, date))
                .unwrap();
        }
        let spike = ledger
            .create_expense(&new_expense(profile_id, cat_id, 500.0, today))
            .unwrap();
        let detection = spike.detection.expect("spike should be detected");

        let anomalies = db.list_anomalies(profile_id, false).unwrap();
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].id, detection.anomaly_id);
        assert!(anomalies[0].expense.is_some());

        let detector = crate::detect::AnomalyDetector::new(&db);
        let reviewed = detector.review(detection.anomaly_id, true).unwrap();
        assert!(reviewed.is_reviewed);
        assert!(reviewed.is_false_positive);

        // Flag cleared on the expense
        let expense = db.get_expense(spike.expense.id).unwrap().unwrap();
        assert!(!expense.is_flagged);

        // Unreviewed listing is now empty; include_reviewed still shows it
        assert!(db.list_anomalies(profile_id, false).unwrap().is_empty());
        assert_eq!(db.list_anomalies(profile_id, true).unwrap().len(), 1);
    }

    #[test]
    fn test_dashboard_summary() {
        let (db, profile_id) = seeded_db();
        let groceries = category(&db, "Groceries");
        let dining = category(&db, "Dining");
        let ledger = crate::ledger::Ledger::new(&db);

        let today = chrono::Utc::now().date_naive();
        ledger
            .create_expense(&new_expense(profile_id, groceries, 100.0, today))
            .unwrap();
        ledger
            .create_expense(&new_expense(profile_id, dining, 50.0, today))
            .unwrap();

        let summary = db.dashboard_summary(profile_id, today).unwrap();
        assert_eq!(summary.expense_count, 2);
        assert!((summary.total_spent - 150.0).abs() < 1e-9);
        assert!((summary.average_amount - 75.0).abs() < 1e-9);

        assert_eq!(summary.categories.len(), 2);
        // Sorted by spend, percentages of the total
        assert_eq!(summary.categories[0].category, "Groceries");
        assert!((summary.categories[0].percentage - 100.0 / 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_spending_report() {
        let (db, profile_id) = seeded_db();
        let cat_id = category(&db, "Transport");
        let ledger = crate::ledger::Ledger::new(&db);

        ledger
            .create_expense(&new_expense(profile_id, cat_id, 30.0, d(2024, 3, 10)))
            .unwrap();
        ledger
            .create_expense(&new_expense(profile_id, cat_id, 50.0, d(2024, 4, 10)))
            .unwrap();

        let report = db
            .spending_report(profile_id, d(2024, 3, 1), d(2024, 4, 30))
            .unwrap();
        assert_eq!(report.expense_count, 2);
        assert!((report.total_spent - 80.0).abs() < 1e-9);
        assert!((report.average_monthly - 40.0).abs() < 1e-9);

        assert_eq!(report.monthly_trend.len(), 2);
        assert_eq!(report.monthly_trend[0].month, "2024-03");
        assert_eq!(report.monthly_trend[1].month, "2024-04");

        assert_eq!(report.largest.len(), 2);
        assert_eq!(report.largest[0].amount, 50.0);

        // 2024-03-10 is a Sunday, 2024-04-10 a Wednesday
        assert!(report.day_of_week.iter().any(|dw| dw.day == "Sunday"));
        assert!(report.day_of_week.iter().any(|dw| dw.day == "Wednesday"));
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
