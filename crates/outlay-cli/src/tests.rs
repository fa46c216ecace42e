//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use chrono::{Duration, Utc};
use outlay_core::db::{Database, ExpenseFilter};

use crate::commands::{self, truncate};

fn setup_test_db() -> Database {
    let db = Database::in_memory().unwrap();
    db.seed_default_profile().unwrap();
    db.seed_default_categories().unwrap();
    db
}

/// Add a one-off expense through the add command, returning its id
fn add_expense(db: &Database, amount: f64, category: &str, date: &str) -> i64 {
    commands::cmd_add(
        db,
        None,
        amount,
        category,
        "test expense",
        Some(date),
        "none",
        None,
    )
    .unwrap();

    let expenses = db.list_expenses(ExpenseFilter::new(), 1, 0).unwrap();
    expenses[0].id
}

// ========== Shared Utility Tests ==========

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
}

#[test]
fn test_truncate_cuts_on_char_boundary() {
    // 1 ascii byte + nine 4-byte emoji = 37 bytes; a byte-index slice at
    // 32 would land mid-emoji and panic
    let s = format!("a{}", "\u{1F642}".repeat(9));
    let out = truncate(&s, 35);
    assert!(out.ends_with("..."));
    assert!(out.len() <= 35);
    assert!(out.starts_with('a'));
}

// ========== Init Command Tests ==========

#[test]
fn test_cmd_init() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");

    let result = commands::cmd_init(&db_path, true);
    assert!(result.is_ok());

    let db = commands::open_db(&db_path, true).unwrap();
    assert_eq!(db.list_profiles().unwrap().len(), 1);
    assert_eq!(db.list_categories().unwrap().len(), 12);
}

// ========== Category Command Tests ==========

#[test]
fn test_cmd_categories_list() {
    let db = setup_test_db();
    let result = commands::cmd_categories_list(&db);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_categories_add() {
    let db = setup_test_db();
    let result = commands::cmd_categories_add(&db, "Hobbies", Some("#ff0000"));
    assert!(result.is_ok());

    let category = db.get_category_by_name("Hobbies").unwrap().unwrap();
    assert_eq!(category.color.as_deref(), Some("#ff0000"));
    assert!(!category.is_default);
}

#[test]
fn test_cmd_categories_add_duplicate() {
    let db = setup_test_db();
    let result = commands::cmd_categories_add(&db, "Groceries", None);
    assert!(result.is_err());
}

#[test]
fn test_cmd_categories_add_blank() {
    let db = setup_test_db();
    let result = commands::cmd_categories_add(&db, "   ", None);
    assert!(result.is_err());
}

#[test]
fn test_cmd_categories_update() {
    let db = setup_test_db();
    let category = db.get_category_by_name("Groceries").unwrap().unwrap();

    let result = commands::cmd_categories_update(&db, category.id, Some("Food"), None);
    assert!(result.is_ok());

    assert!(db.get_category_by_name("Groceries").unwrap().is_none());
    assert!(db.get_category_by_name("Food").unwrap().is_some());
}

#[test]
fn test_cmd_categories_update_nothing() {
    let db = setup_test_db();
    let category = db.get_category_by_name("Groceries").unwrap().unwrap();

    let result = commands::cmd_categories_update(&db, category.id, None, None);
    assert!(result.is_err());
}

#[test]
fn test_cmd_categories_delete_in_use() {
    let db = setup_test_db();
    let category = db.get_category_by_name("Groceries").unwrap().unwrap();
    add_expense(&db, 25.0, "Groceries", "2024-03-10");

    let result = commands::cmd_categories_delete(&db, category.id);
    assert!(result.is_err());
}

#[test]
fn test_cmd_categories_delete() {
    let db = setup_test_db();
    let category = db.get_category_by_name("Groceries").unwrap().unwrap();

    let result = commands::cmd_categories_delete(&db, category.id);
    assert!(result.is_ok());
    assert!(db.get_category(category.id).unwrap().is_none());
}

// ========== Profile Command Tests ==========

#[test]
fn test_cmd_profiles_add() {
    let db = setup_test_db();
    let result = commands::cmd_profiles_add(&db, "partner");
    assert!(result.is_ok());
    assert_eq!(db.list_profiles().unwrap().len(), 2);
}

#[test]
fn test_cmd_profiles_add_blank() {
    let db = setup_test_db();
    let result = commands::cmd_profiles_add(&db, "  ");
    assert!(result.is_err());
}

// ========== Add Command Tests ==========

#[test]
fn test_cmd_add() {
    let db = setup_test_db();
    let id = add_expense(&db, 42.50, "Groceries", "2024-03-10");

    let expense = db.get_expense(id).unwrap().unwrap();
    assert_eq!(expense.amount, 42.50);
    assert_eq!(expense.category_name.as_deref(), Some("Groceries"));
    assert!(!expense.is_flagged);
}

#[test]
fn test_cmd_add_unknown_category() {
    let db = setup_test_db();
    let result = commands::cmd_add(
        &db,
        None,
        10.0,
        "NoSuchCategory",
        "test",
        Some("2024-03-10"),
        "none",
        None,
    );
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("not found"));
}

#[test]
fn test_cmd_add_negative_amount() {
    let db = setup_test_db();
    let result = commands::cmd_add(
        &db,
        None,
        -5.0,
        "Groceries",
        "test",
        Some("2024-03-10"),
        "none",
        None,
    );
    assert!(result.is_err());
}

#[test]
fn test_cmd_add_invalid_date() {
    let db = setup_test_db();
    let result = commands::cmd_add(
        &db,
        None,
        10.0,
        "Groceries",
        "test",
        Some("03/10/2024"),
        "none",
        None,
    );
    assert!(result.is_err());
}

#[test]
fn test_cmd_add_recurring_generates_instances() {
    let db = setup_test_db();
    let result = commands::cmd_add(
        &db,
        None,
        15.99,
        "Entertainment",
        "streaming",
        Some("2024-01-01"),
        "monthly",
        Some("2024-06-30"),
    );
    assert!(result.is_ok());

    let expenses = db.list_expenses(ExpenseFilter::new(), 1, 0).unwrap();
    let today = Utc::now().date_naive();
    let instances = db.list_instances(expenses[0].id, false, today).unwrap();
    assert_eq!(instances.len(), 5);
}

#[test]
fn test_cmd_add_recurring_without_until() {
    let db = setup_test_db();
    let result = commands::cmd_add(
        &db,
        None,
        15.99,
        "Entertainment",
        "streaming",
        Some("2024-01-01"),
        "monthly",
        None,
    );
    assert!(result.is_err());
}

#[test]
fn test_cmd_add_unknown_recurrence() {
    let db = setup_test_db();
    let result = commands::cmd_add(
        &db,
        None,
        15.99,
        "Entertainment",
        "streaming",
        Some("2024-01-01"),
        "fortnightly",
        Some("2024-06-30"),
    );
    assert!(result.is_err());
}

// ========== Expense Command Tests ==========

#[test]
fn test_cmd_expenses_list() {
    let db = setup_test_db();
    add_expense(&db, 10.0, "Groceries", "2024-03-10");

    let result = commands::cmd_expenses_list(&db, None, 20, None, false, false, None);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_expenses_list_unknown_profile() {
    let db = setup_test_db();
    let result = commands::cmd_expenses_list(&db, Some("nobody"), 20, None, false, false, None);
    assert!(result.is_err());
}

#[test]
fn test_cmd_expenses_show_missing() {
    let db = setup_test_db();
    let result = commands::cmd_expenses_show(&db, 999);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("not found"));
}

#[test]
fn test_cmd_expenses_edit_amount() {
    let db = setup_test_db();
    let id = add_expense(&db, 10.0, "Groceries", "2024-03-10");

    let result = commands::cmd_expenses_edit(&db, id, Some(12.5), None, None, None, None, None);
    assert!(result.is_ok());

    let expense = db.get_expense(id).unwrap().unwrap();
    assert_eq!(expense.amount, 12.5);
    // Untouched fields keep their values
    assert_eq!(expense.description, "test expense");
    assert_eq!(expense.date.to_string(), "2024-03-10");
}

#[test]
fn test_cmd_expenses_edit_recurrence_off_clears_instances() {
    let db = setup_test_db();
    commands::cmd_add(
        &db,
        None,
        15.99,
        "Entertainment",
        "streaming",
        Some("2024-01-01"),
        "monthly",
        Some("2024-06-30"),
    )
    .unwrap();
    let id = db.list_expenses(ExpenseFilter::new(), 1, 0).unwrap()[0].id;

    let result =
        commands::cmd_expenses_edit(&db, id, None, None, None, None, Some("none"), None);
    assert!(result.is_ok());

    let today = Utc::now().date_naive();
    assert!(db.list_instances(id, false, today).unwrap().is_empty());
}

#[test]
fn test_cmd_expenses_delete() {
    let db = setup_test_db();
    let id = add_expense(&db, 10.0, "Groceries", "2024-03-10");

    let result = commands::cmd_expenses_delete(&db, id, true);
    assert!(result.is_ok());
    assert!(db.get_expense(id).unwrap().is_none());
}

#[test]
fn test_cmd_expenses_delete_removes_instances() {
    let db = setup_test_db();
    commands::cmd_add(
        &db,
        None,
        15.99,
        "Entertainment",
        "streaming",
        Some("2024-01-01"),
        "monthly",
        Some("2024-06-30"),
    )
    .unwrap();
    let id = db.list_expenses(ExpenseFilter::new(), 1, 0).unwrap()[0].id;

    commands::cmd_expenses_delete(&db, id, true).unwrap();

    let conn = db.conn().unwrap();
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM recurring_instances WHERE expense_id = ?1",
            rusqlite::params![id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 0);
}

// ========== Instance Command Tests ==========

#[test]
fn test_cmd_instances_edit_marks_modified() {
    let db = setup_test_db();
    commands::cmd_add(
        &db,
        None,
        30.0,
        "Utilities",
        "internet",
        Some("2024-01-01"),
        "monthly",
        Some("2024-06-30"),
    )
    .unwrap();
    let expense_id = db.list_expenses(ExpenseFilter::new(), 1, 0).unwrap()[0].id;
    let today = Utc::now().date_naive();
    let instance_id = db.list_instances(expense_id, false, today).unwrap()[0].id;

    let result = commands::cmd_instances_edit(&db, instance_id, None, Some(35.0), true, false);
    assert!(result.is_ok());

    let instance = db.get_instance(instance_id).unwrap().unwrap();
    assert_eq!(instance.amount, 35.0);
    assert!(instance.is_paid);
    assert!(instance.is_modified);
}

#[test]
fn test_cmd_instances_edit_paid_unpaid_conflict() {
    let db = setup_test_db();
    let result = commands::cmd_instances_edit(&db, 1, None, None, true, true);
    assert!(result.is_err());
}

// ========== Anomaly Command Tests ==========

#[test]
fn test_cmd_anomalies_review_flow() {
    let db = setup_test_db();
    let today = Utc::now().date_naive();

    // Five quiet weeks of groceries, then a blowout
    for days_ago in 1..=5 {
        let date = (today - Duration::days(days_ago)).to_string();
        add_expense(&db, 20.0, "Groceries", &date);
    }
    let spike_id = add_expense(&db, 500.0, "Groceries", &today.to_string());

    let expense = db.get_expense(spike_id).unwrap().unwrap();
    assert!(expense.is_flagged);

    let profile = db.resolve_profile(None).unwrap();
    let anomalies = db.list_anomalies(profile.id, false).unwrap();
    assert_eq!(anomalies.len(), 1);

    let result = commands::cmd_anomalies_review(&db, anomalies[0].id, true);
    assert!(result.is_ok());

    let expense = db.get_expense(spike_id).unwrap().unwrap();
    assert!(!expense.is_flagged);
    assert!(db.list_anomalies(profile.id, false).unwrap().is_empty());
}

#[test]
fn test_cmd_anomalies_list_empty() {
    let db = setup_test_db();
    let result = commands::cmd_anomalies_list(&db, None, false);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_anomalies_review_missing() {
    let db = setup_test_db();
    let result = commands::cmd_anomalies_review(&db, 999, false);
    assert!(result.is_err());
}

// ========== Report Command Tests ==========

#[test]
fn test_resolve_period_custom_dates() {
    let (from, to) =
        commands::resolve_period("this-month", Some("2024-01-01"), Some("2024-03-31")).unwrap();
    assert_eq!(from.to_string(), "2024-01-01");
    assert_eq!(to.to_string(), "2024-03-31");
}

#[test]
fn test_resolve_period_this_month() {
    use chrono::Datelike;
    let (from, to) = commands::resolve_period("this-month", None, None).unwrap();
    assert_eq!(from.day(), 1);
    assert!(from <= to);
}

#[test]
fn test_resolve_period_unknown() {
    let result = commands::resolve_period("fortnight", None, None);
    assert!(result.is_err());
}

#[test]
fn test_cmd_report() {
    let db = setup_test_db();
    add_expense(&db, 50.0, "Groceries", "2024-03-10");
    add_expense(&db, 30.0, "Dining", "2024-04-10");

    let from = commands::parse_date("2024-03-01").unwrap();
    let to = commands::parse_date("2024-04-30").unwrap();
    let result = commands::cmd_report(&db, None, from, to);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_report_inverted_range() {
    let db = setup_test_db();
    let from = commands::parse_date("2024-04-30").unwrap();
    let to = commands::parse_date("2024-03-01").unwrap();
    let result = commands::cmd_report(&db, None, from, to);
    assert!(result.is_err());
}

#[test]
fn test_cmd_dashboard() {
    let db = setup_test_db();
    let today = Utc::now().date_naive().to_string();
    add_expense(&db, 50.0, "Groceries", &today);

    let result = commands::cmd_dashboard(&db, None);
    assert!(result.is_ok());
}

// ========== Export Command Tests ==========

#[test]
fn test_cmd_export_csv_file() {
    let db = setup_test_db();
    add_expense(&db, 50.0, "Groceries", "2024-03-10");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("expenses.csv");

    let result = commands::cmd_export(&db, None, Some(&path), "csv", None, None, None, false);
    assert!(result.is_ok());

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("date,description,category,amount,recurrence,flagged"));
    assert!(content.contains("Groceries"));
}

#[test]
fn test_cmd_export_json_respects_date_filter() {
    let db = setup_test_db();
    add_expense(&db, 50.0, "Groceries", "2024-03-10");
    add_expense(&db, 30.0, "Dining", "2024-05-10");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("expenses.json");

    let result = commands::cmd_export(
        &db,
        None,
        Some(&path),
        "json",
        Some("2024-03-01"),
        Some("2024-03-31"),
        None,
        false,
    );
    assert!(result.is_ok());

    let content = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
}

#[test]
fn test_cmd_export_invalid_format() {
    let db = setup_test_db();
    let result = commands::cmd_export(&db, None, None, "xml", None, None, None, false);
    assert!(result.is_err());
}
