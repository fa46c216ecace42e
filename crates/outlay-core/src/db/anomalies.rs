//! Anomaly persistence and review primitives

use rusqlite::{params, Connection, OptionalExtension};

use super::expenses::EXPENSE_COLUMNS;
use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Anomaly, AnomalyKind};

fn row_to_anomaly(row: &rusqlite::Row) -> rusqlite::Result<Anomaly> {
    let kind_str: String = row.get(3)?;
    let created_at_str: String = row.get(8)?;
    Ok(Anomaly {
        id: row.get(0)?,
        profile_id: row.get(1)?,
        expense_id: row.get(2)?,
        kind: kind_str.parse().unwrap_or(AnomalyKind::Spike),
        confidence: row.get(4)?,
        description: row.get(5)?,
        is_reviewed: row.get(6)?,
        is_false_positive: row.get(7)?,
        created_at: parse_datetime(&created_at_str),
        expense: None,
    })
}

const ANOMALY_COLUMNS: &str = "a.id, a.profile_id, a.expense_id, a.kind, a.confidence, \
     a.description, a.is_reviewed, a.is_false_positive, a.created_at";

/// Insert an anomaly record
pub(crate) fn insert_anomaly(
    conn: &Connection,
    profile_id: i64,
    expense_id: i64,
    kind: AnomalyKind,
    confidence: f64,
    description: &str,
) -> Result<i64> {
    conn.execute(
        r#"
        INSERT INTO anomalies (profile_id, expense_id, kind, confidence, description)
        VALUES (?, ?, ?, ?, ?)
        "#,
        params![profile_id, expense_id, kind.as_str(), confidence, description],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn get_anomaly(conn: &Connection, id: i64) -> Result<Option<Anomaly>> {
    let anomaly = conn
        .query_row(
            &format!("SELECT {} FROM anomalies a WHERE a.id = ?", ANOMALY_COLUMNS),
            params![id],
            row_to_anomaly,
        )
        .optional()?;
    Ok(anomaly)
}

/// Record the outcome of a review (idempotent re-application is fine)
pub(crate) fn mark_reviewed(conn: &Connection, id: i64, is_false_positive: bool) -> Result<()> {
    let changed = conn.execute(
        "UPDATE anomalies SET is_reviewed = 1, is_false_positive = ? WHERE id = ?",
        params![is_false_positive, id],
    )?;
    if changed == 0 {
        return Err(Error::NotFound(format!("anomaly {}", id)));
    }
    Ok(())
}

impl Database {
    /// Get an anomaly by ID, with its expense joined for display
    pub fn get_anomaly(&self, id: i64) -> Result<Option<Anomaly>> {
        let conn = self.conn()?;

        let anomaly = conn
            .query_row(
                &format!(
                    "SELECT {}, {} FROM anomalies a \
                     JOIN expenses e ON a.expense_id = e.id \
                     JOIN categories c ON e.category_id = c.id \
                     WHERE a.id = ?",
                    ANOMALY_COLUMNS, EXPENSE_COLUMNS
                ),
                params![id],
                |row| {
                    let mut anomaly = row_to_anomaly(row)?;
                    anomaly.expense = Some(expense_at_offset(row, 9)?);
                    Ok(anomaly)
                },
            )
            .optional()?;

        Ok(anomaly)
    }

    /// List a profile's anomalies, newest first
    ///
    /// Unreviewed only by default; `include_reviewed` lists everything.
    pub fn list_anomalies(&self, profile_id: i64, include_reviewed: bool) -> Result<Vec<Anomaly>> {
        let conn = self.conn()?;

        let reviewed_clause = if include_reviewed {
            ""
        } else {
            "AND a.is_reviewed = 0"
        };
        let sql = format!(
            "SELECT {}, {} FROM anomalies a \
             JOIN expenses e ON a.expense_id = e.id \
             JOIN categories c ON e.category_id = c.id \
             WHERE a.profile_id = ? {} \
             ORDER BY a.created_at DESC, a.id DESC",
            ANOMALY_COLUMNS, EXPENSE_COLUMNS, reviewed_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let anomalies = stmt
            .query_map(params![profile_id], |row| {
                let mut anomaly = row_to_anomaly(row)?;
                anomaly.expense = Some(expense_at_offset(row, 9)?);
                Ok(anomaly)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(anomalies)
    }
}

/// Map the joined expense columns starting at `offset` in the row
fn expense_at_offset(
    row: &rusqlite::Row,
    offset: usize,
) -> rusqlite::Result<crate::models::Expense> {
    use super::parse_date;
    use crate::models::{Expense, Recurrence};

    let date_str: String = row.get(offset + 4)?;
    let recurrence_str: String = row.get(offset + 6)?;
    let end_date_str: Option<String> = row.get(offset + 7)?;
    let created_at_str: String = row.get(offset + 9)?;
    let updated_at_str: String = row.get(offset + 10)?;

    Ok(Expense {
        id: row.get(offset)?,
        profile_id: row.get(offset + 1)?,
        category_id: row.get(offset + 2)?,
        amount: row.get(offset + 3)?,
        date: parse_date(&date_str),
        description: row.get(offset + 5)?,
        recurrence: recurrence_str.parse().unwrap_or(Recurrence::None),
        recurrence_end_date: end_date_str.map(|s| parse_date(&s)),
        is_flagged: row.get(offset + 8)?,
        created_at: parse_datetime(&created_at_str),
        updated_at: parse_datetime(&updated_at_str),
        category_name: row.get(offset + 11)?,
    })
}
