//! Expense operations
//!
//! Connection-level helpers (`insert_expense`, `get_expense`, ...) take a
//! `&rusqlite::Connection` so the ledger services can call them inside a
//! single transaction; the `Database` methods wrap them for standalone use.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use super::expense_filter::ExpenseFilter;
use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Expense, ExpenseUpdate, NewExpense, Recurrence};

/// Shared SELECT column list for expense rows (with joined category name)
pub(crate) const EXPENSE_COLUMNS: &str = "e.id, e.profile_id, e.category_id, e.amount, e.date, \
     e.description, e.recurrence, e.recurrence_end_date, e.is_flagged, \
     e.created_at, e.updated_at, c.name";

pub(crate) fn row_to_expense(row: &rusqlite::Row) -> rusqlite::Result<Expense> {
    let date_str: String = row.get(4)?;
    let recurrence_str: String = row.get(6)?;
    let end_date_str: Option<String> = row.get(7)?;
    let created_at_str: String = row.get(9)?;
    let updated_at_str: String = row.get(10)?;

    Ok(Expense {
        id: row.get(0)?,
        profile_id: row.get(1)?,
        category_id: row.get(2)?,
        amount: row.get(3)?,
        date: parse_date(&date_str),
        description: row.get(5)?,
        recurrence: recurrence_str.parse().unwrap_or(Recurrence::None),
        recurrence_end_date: end_date_str.map(|s| parse_date(&s)),
        is_flagged: row.get(8)?,
        created_at: parse_datetime(&created_at_str),
        updated_at: parse_datetime(&updated_at_str),
        category_name: row.get(11)?,
    })
}

/// Insert an expense row, returning its ID
pub(crate) fn insert_expense(conn: &Connection, new: &NewExpense) -> Result<i64> {
    conn.execute(
        r#"
        INSERT INTO expenses (profile_id, category_id, amount, date, description, recurrence, recurrence_end_date)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
        params![
            new.profile_id,
            new.category_id,
            new.amount,
            new.date.to_string(),
            new.description,
            new.recurrence.as_str(),
            new.recurrence_end_date.map(|d| d.to_string()),
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

/// Fetch an expense by ID
pub(crate) fn get_expense(conn: &Connection, id: i64) -> Result<Option<Expense>> {
    let expense = conn
        .query_row(
            &format!(
                "SELECT {} FROM expenses e JOIN categories c ON e.category_id = c.id WHERE e.id = ?",
                EXPENSE_COLUMNS
            ),
            params![id],
            row_to_expense,
        )
        .optional()?;

    Ok(expense)
}

/// Apply a whole-form update to an expense row
pub(crate) fn update_expense(conn: &Connection, id: i64, update: &ExpenseUpdate) -> Result<()> {
    let changed = conn.execute(
        r#"
        UPDATE expenses
        SET category_id = ?, amount = ?, date = ?, description = ?,
            recurrence = ?, recurrence_end_date = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
        params![
            update.category_id,
            update.amount,
            update.date.to_string(),
            update.description,
            update.recurrence.as_str(),
            update.recurrence_end_date.map(|d| d.to_string()),
            id,
        ],
    )?;

    if changed == 0 {
        return Err(Error::NotFound(format!("expense {}", id)));
    }
    Ok(())
}

/// Delete an expense row (instances and anomalies cascade via FK)
pub(crate) fn delete_expense(conn: &Connection, id: i64) -> Result<()> {
    let deleted = conn.execute("DELETE FROM expenses WHERE id = ?", params![id])?;
    if deleted == 0 {
        return Err(Error::NotFound(format!("expense {}", id)));
    }
    Ok(())
}

/// Set or clear the anomaly flag on an expense
pub(crate) fn set_flagged(conn: &Connection, id: i64, flagged: bool) -> Result<()> {
    conn.execute(
        "UPDATE expenses SET is_flagged = ? WHERE id = ?",
        params![flagged, id],
    )?;
    Ok(())
}

/// Amounts of prior same-profile, same-category expenses
///
/// Priors are strictly earlier than `before` and no older than `since`
/// (the detector's trailing window floor).
pub(crate) fn prior_category_amounts(
    conn: &Connection,
    profile_id: i64,
    category_id: i64,
    since: NaiveDate,
    before: NaiveDate,
) -> Result<Vec<f64>> {
    let mut stmt = conn.prepare(
        "SELECT amount FROM expenses \
         WHERE profile_id = ? AND category_id = ? AND date >= ? AND date < ?",
    )?;

    let amounts = stmt
        .query_map(
            params![
                profile_id,
                category_id,
                since.to_string(),
                before.to_string()
            ],
            |row| row.get(0),
        )?
        .collect::<std::result::Result<Vec<f64>, _>>()?;

    Ok(amounts)
}

impl Database {
    /// Get an expense by ID
    pub fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        get_expense(&conn, id)
    }

    /// List expenses matching a filter, most recent first
    pub fn list_expenses(
        &self,
        filter: ExpenseFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let built = filter.build();

        let sql = format!(
            "SELECT {} FROM expenses e JOIN categories c ON e.category_id = c.id {} {} LIMIT ? OFFSET ?",
            EXPENSE_COLUMNS, built.where_clause, built.order_clause
        );

        let mut params = built.into_params();
        params.push(Box::new(limit));
        params.push(Box::new(offset));
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let expenses = stmt
            .query_map(param_refs.as_slice(), row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// Count expenses matching a filter
    pub fn count_expenses(&self, filter: ExpenseFilter) -> Result<i64> {
        let conn = self.conn()?;
        let built = filter.build();

        let sql = built.build_count_query();
        let count: i64 =
            conn.query_row(&sql, built.params_refs().as_slice(), |row| row.get(0))?;

        Ok(count)
    }
}
