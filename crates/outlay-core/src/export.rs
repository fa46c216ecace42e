//! Expense CSV export

use chrono::NaiveDate;
use csv::WriterBuilder;
use serde::Serialize;

use crate::db::{Database, ExpenseFilter};
use crate::error::{Error, Result};
use crate::models::Expense;

/// Options for expense export
#[derive(Debug, Clone, Default)]
pub struct ExpenseExportOptions {
    pub profile_id: Option<i64>,
    /// Start date filter (inclusive)
    pub from: Option<NaiveDate>,
    /// End date filter (inclusive)
    pub to: Option<NaiveDate>,
    pub category_id: Option<i64>,
    pub flagged_only: bool,
}

/// One CSV row of the expense export
#[derive(Debug, Serialize)]
struct ExpenseRecord<'a> {
    date: String,
    description: &'a str,
    category: &'a str,
    amount: f64,
    recurrence: &'a str,
    flagged: bool,
}

impl Database {
    /// Export expenses matching the options, most recent first
    pub fn export_expenses(&self, opts: &ExpenseExportOptions) -> Result<Vec<Expense>> {
        let conn = self.conn()?;

        let built = ExpenseFilter::new()
            .profile_id(opts.profile_id)
            .category_id(opts.category_id)
            .from_date(opts.from)
            .to_date(opts.to)
            .flagged_only(opts.flagged_only)
            .build();

        let sql = format!(
            "SELECT {} FROM expenses e JOIN categories c ON e.category_id = c.id {} {}",
            crate::db::expenses::EXPENSE_COLUMNS,
            built.where_clause,
            built.order_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let expenses = stmt
            .query_map(
                built.params_refs().as_slice(),
                crate::db::expenses::row_to_expense,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// Export expenses to CSV
    pub fn export_expenses_csv(&self, opts: &ExpenseExportOptions) -> Result<String> {
        let expenses = self.export_expenses(opts)?;

        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        for expense in &expenses {
            writer.serialize(ExpenseRecord {
                date: expense.date.to_string(),
                description: &expense.description,
                category: expense.category_name.as_deref().unwrap_or(""),
                amount: expense.amount,
                recurrence: expense.recurrence.as_str(),
                flagged: expense.is_flagged,
            })?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::InvalidData(format!("CSV write failed: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| Error::InvalidData(format!("CSV not UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewExpense, Recurrence};

    fn seeded_db() -> (Database, i64, i64) {
        let db = Database::in_memory().unwrap();
        let profile_id = db.seed_default_profile().unwrap();
        db.seed_default_categories().unwrap();
        let category = db.get_category_by_name("Groceries").unwrap().unwrap();
        (db, profile_id, category.id)
    }

    fn insert(db: &Database, profile_id: i64, category_id: i64, date: NaiveDate, amount: f64) {
        let ledger = crate::ledger::Ledger::new(db);
        ledger
            .create_expense(&NewExpense {
                profile_id,
                category_id,
                amount,
                date,
                description: format!("expense {}", amount),
                recurrence: Recurrence::None,
                recurrence_end_date: None,
            })
            .unwrap();
    }

    #[test]
    fn test_export_empty() {
        let (db, ..) = seeded_db();
        let expenses = db.export_expenses(&ExpenseExportOptions::default()).unwrap();
        assert!(expenses.is_empty());

        let csv = db
            .export_expenses_csv(&ExpenseExportOptions::default())
            .unwrap();
        assert!(csv.is_empty());
    }

    #[test]
    fn test_export_csv_rows() {
        let (db, profile_id, category_id) = seeded_db();
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        insert(&db, profile_id, category_id, date, 45.99);

        let csv = db
            .export_expenses_csv(&ExpenseExportOptions::default())
            .unwrap();
        assert!(csv.starts_with("date,description,category,amount,recurrence,flagged\n"));
        assert!(csv.contains("2024-06-15"));
        assert!(csv.contains("Groceries"));
        assert!(csv.contains("45.99"));
    }

    #[test]
    fn test_export_date_range() {
        let (db, profile_id, category_id) = seeded_db();
        for day in [10, 15, 20] {
            let date = NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
            insert(&db, profile_id, category_id, date, day as f64);
        }

        let opts = ExpenseExportOptions {
            from: NaiveDate::from_ymd_opt(2024, 6, 12),
            to: NaiveDate::from_ymd_opt(2024, 6, 18),
            ..Default::default()
        };
        let expenses = db.export_expenses(&opts).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount, 15.0);
    }
}
