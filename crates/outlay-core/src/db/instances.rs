//! Recurring instance persistence

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::RecurringInstance;

pub(crate) fn row_to_instance(row: &rusqlite::Row) -> rusqlite::Result<RecurringInstance> {
    let date_str: String = row.get(2)?;
    let created_at_str: String = row.get(6)?;
    Ok(RecurringInstance {
        id: row.get(0)?,
        expense_id: row.get(1)?,
        date: parse_date(&date_str),
        amount: row.get(3)?,
        is_paid: row.get(4)?,
        is_modified: row.get(5)?,
        created_at: parse_datetime(&created_at_str),
    })
}

const INSTANCE_COLUMNS: &str =
    "id, expense_id, date, amount, is_paid, is_modified, created_at";

/// Insert one generated instance (unpaid, unmodified)
pub(crate) fn insert_instance(
    conn: &Connection,
    expense_id: i64,
    date: NaiveDate,
    amount: f64,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO recurring_instances (expense_id, date, amount) VALUES (?, ?, ?)",
        params![expense_id, date.to_string(), amount],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Dates already occupied by instances of an expense (any modification state)
pub(crate) fn instance_dates(conn: &Connection, expense_id: i64) -> Result<Vec<NaiveDate>> {
    let mut stmt =
        conn.prepare("SELECT date FROM recurring_instances WHERE expense_id = ?")?;
    let dates = stmt
        .query_map(params![expense_id], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?
        .into_iter()
        .map(|s| parse_date(&s))
        .collect();
    Ok(dates)
}

/// Delete future instances that the user has not hand-edited
///
/// Instances with is_modified = 1 are never touched here.
pub(crate) fn delete_future_unmodified(
    conn: &Connection,
    expense_id: i64,
    today: NaiveDate,
) -> Result<usize> {
    let deleted = conn.execute(
        "DELETE FROM recurring_instances \
         WHERE expense_id = ? AND date > ? AND is_modified = 0",
        params![expense_id, today.to_string()],
    )?;
    Ok(deleted)
}

/// Delete every instance of an expense, modified ones included
///
/// Used when recurrence is turned off; an expense with recurrence = none
/// must never have instance children.
pub(crate) fn delete_all_instances(conn: &Connection, expense_id: i64) -> Result<usize> {
    let deleted = conn.execute(
        "DELETE FROM recurring_instances WHERE expense_id = ?",
        params![expense_id],
    )?;
    Ok(deleted)
}

pub(crate) fn get_instance(conn: &Connection, id: i64) -> Result<Option<RecurringInstance>> {
    let instance = conn
        .query_row(
            &format!(
                "SELECT {} FROM recurring_instances WHERE id = ?",
                INSTANCE_COLUMNS
            ),
            params![id],
            row_to_instance,
        )
        .optional()?;
    Ok(instance)
}

/// Apply a user edit to an instance; any edit marks it modified
pub(crate) fn update_instance(
    conn: &Connection,
    id: i64,
    date: NaiveDate,
    amount: f64,
    is_paid: bool,
) -> Result<()> {
    let changed = conn.execute(
        "UPDATE recurring_instances \
         SET date = ?, amount = ?, is_paid = ?, is_modified = 1 WHERE id = ?",
        params![date.to_string(), amount, is_paid, id],
    )?;
    if changed == 0 {
        return Err(Error::NotFound(format!("recurring instance {}", id)));
    }
    Ok(())
}

impl Database {
    /// Get a recurring instance by ID
    pub fn get_instance(&self, id: i64) -> Result<Option<RecurringInstance>> {
        let conn = self.conn()?;
        get_instance(&conn, id)
    }

    /// List instances of an expense, ordered by date
    ///
    /// `upcoming_only` restricts to dates from `today` forward.
    pub fn list_instances(
        &self,
        expense_id: i64,
        upcoming_only: bool,
        today: NaiveDate,
    ) -> Result<Vec<RecurringInstance>> {
        let conn = self.conn()?;

        let sql = if upcoming_only {
            format!(
                "SELECT {} FROM recurring_instances \
                 WHERE expense_id = ? AND date >= ? ORDER BY date",
                INSTANCE_COLUMNS
            )
        } else {
            format!(
                "SELECT {} FROM recurring_instances WHERE expense_id = ? ORDER BY date",
                INSTANCE_COLUMNS
            )
        };

        let mut stmt = conn.prepare(&sql)?;
        let instances = if upcoming_only {
            stmt.query_map(params![expense_id, today.to_string()], row_to_instance)?
                .collect::<std::result::Result<Vec<_>, _>>()?
        } else {
            stmt.query_map(params![expense_id], row_to_instance)?
                .collect::<std::result::Result<Vec<_>, _>>()?
        };

        Ok(instances)
    }

    /// Next upcoming instances across all of a profile's recurring expenses
    pub fn upcoming_instances(
        &self,
        profile_id: i64,
        today: NaiveDate,
        limit: i64,
    ) -> Result<Vec<RecurringInstance>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT i.id, i.expense_id, i.date, i.amount, i.is_paid, i.is_modified, i.created_at \
             FROM recurring_instances i \
             JOIN expenses e ON i.expense_id = e.id \
             WHERE e.profile_id = ? AND i.date >= ? AND i.is_paid = 0 \
             ORDER BY i.date LIMIT ?",
        )?;

        let instances = stmt
            .query_map(params![profile_id, today.to_string(), limit], row_to_instance)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(instances)
    }
}
