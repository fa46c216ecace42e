//! Recurrence materialization
//!
//! Turns a recurring expense into concrete future ledger entries and keeps
//! them reconciled when the parent is edited. Stepping is calendar-aware:
//! a month step clamps to the last day of the target month, and each step
//! is computed from the previous stepped date, so Jan 31 -> Feb 28 -> Mar 28.

use chrono::{Duration, Months, NaiveDate, Utc};
use rusqlite::Connection;
use tracing::debug;

use crate::db::{self, Database};
use crate::error::{Error, Result};
use crate::models::{Expense, Recurrence};

/// Materializes and reconciles recurring instances
///
/// Standalone entry points open their own transaction; the `_in` variants
/// compose into a caller-owned transaction (used by `Ledger`).
pub struct Materializer<'a> {
    db: &'a Database,
}

impl<'a> Materializer<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Generate all instances for a recurring expense
    ///
    /// Precondition: recurrence is active and an end date is set; errors
    /// before any write otherwise. Runs in one transaction.
    pub fn materialize(&self, expense_id: i64) -> Result<usize> {
        let mut conn = self.db.conn()?;
        let tx = conn.transaction()?;

        let expense = db::expenses::get_expense(&tx, expense_id)?
            .ok_or_else(|| Error::NotFound(format!("expense {}", expense_id)))?;
        let created = materialize_in(&tx, &expense)?;

        tx.commit()?;
        Ok(created)
    }

    /// Reconcile instances after the parent expense was edited
    ///
    /// Deletes future unmodified instances, then regenerates future schedule
    /// dates not already occupied. Runs in one transaction.
    pub fn reconcile(&self, expense_id: i64) -> Result<ReconcileOutcome> {
        let mut conn = self.db.conn()?;
        let tx = conn.transaction()?;

        let expense = db::expenses::get_expense(&tx, expense_id)?
            .ok_or_else(|| Error::NotFound(format!("expense {}", expense_id)))?;
        let outcome = reconcile_in(&tx, &expense, Utc::now().date_naive())?;

        tx.commit()?;
        Ok(outcome)
    }
}

/// What a reconciliation pass did
#[derive(Debug, Default, Clone, Copy)]
pub struct ReconcileOutcome {
    pub deleted: usize,
    pub created: usize,
}

/// Generate instances for `expense` within an open transaction
pub(crate) fn materialize_in(conn: &Connection, expense: &Expense) -> Result<usize> {
    let end = validate_recurrence(expense)?;

    let mut created = 0;
    for date in schedule_dates(expense.recurrence, expense.date, end) {
        db::instances::insert_instance(conn, expense.id, date, expense.amount)?;
        created += 1;
    }

    debug!(
        expense_id = expense.id,
        recurrence = %expense.recurrence,
        created,
        "Materialized recurring instances"
    );
    Ok(created)
}

/// Reconcile instances for `expense` within an open transaction
///
/// User-modified instances survive; their dates are not double-filled.
/// Past instances stay on the ledger as history.
pub(crate) fn reconcile_in(
    conn: &Connection,
    expense: &Expense,
    today: NaiveDate,
) -> Result<ReconcileOutcome> {
    let deleted = db::instances::delete_future_unmodified(conn, expense.id, today)?;

    if !expense.recurrence.is_active() {
        // Recurrence turned off: no regeneration; the caller removes any
        // remaining children via delete_all_instances.
        return Ok(ReconcileOutcome { deleted, created: 0 });
    }

    let end = validate_recurrence(expense)?;
    let occupied = db::instances::instance_dates(conn, expense.id)?;

    let mut created = 0;
    for date in schedule_dates(expense.recurrence, expense.date, end) {
        if date > today && !occupied.contains(&date) {
            db::instances::insert_instance(conn, expense.id, date, expense.amount)?;
            created += 1;
        }
    }

    debug!(
        expense_id = expense.id,
        deleted,
        created,
        "Reconciled recurring instances"
    );
    Ok(ReconcileOutcome { deleted, created })
}

/// Check the recurrence/end-date pairing, returning the end date
fn validate_recurrence(expense: &Expense) -> Result<NaiveDate> {
    if !expense.recurrence.is_active() {
        return Err(Error::InvalidData(
            "Expense has no active recurrence".to_string(),
        ));
    }
    expense.recurrence_end_date.ok_or_else(|| {
        Error::InvalidData("Recurring expense requires an end date".to_string())
    })
}

/// Schedule dates strictly after `start`, each <= `end`
///
/// The start date itself is the original expense and is never duplicated
/// as an instance.
pub fn schedule_dates(kind: Recurrence, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;

    while let Some(next) = next_date(kind, current) {
        if next > end {
            break;
        }
        dates.push(next);
        current = next;
    }

    dates
}

/// One step forward from `date`; None for Recurrence::None
///
/// Month and year steps clamp to the end of the target month, and the
/// clamped day carries into later steps (Feb 29 + 1 year = Feb 28).
pub fn next_date(kind: Recurrence, date: NaiveDate) -> Option<NaiveDate> {
    match kind {
        Recurrence::None => None,
        Recurrence::Daily => Some(date + Duration::days(1)),
        Recurrence::Weekly => Some(date + Duration::weeks(1)),
        Recurrence::Monthly => date.checked_add_months(Months::new(1)),
        Recurrence::Yearly => date.checked_add_months(Months::new(12)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_daily_schedule() {
        let dates = schedule_dates(Recurrence::Daily, d(2024, 3, 1), d(2024, 3, 5));
        assert_eq!(
            dates,
            vec![d(2024, 3, 2), d(2024, 3, 3), d(2024, 3, 4), d(2024, 3, 5)]
        );
    }

    #[test]
    fn test_weekly_schedule() {
        let dates = schedule_dates(Recurrence::Weekly, d(2024, 1, 1), d(2024, 1, 31));
        assert_eq!(
            dates,
            vec![d(2024, 1, 8), d(2024, 1, 15), d(2024, 1, 22), d(2024, 1, 29)]
        );
    }

    #[test]
    fn test_monthly_clamps_to_month_end() {
        // Jan 31 -> Feb 29 (leap year) -> Mar 29: the clamped day persists
        let dates = schedule_dates(Recurrence::Monthly, d(2024, 1, 31), d(2024, 4, 30));
        assert_eq!(dates, vec![d(2024, 2, 29), d(2024, 3, 29), d(2024, 4, 29)]);

        // Non-leap year: Jan 31 -> Feb 28 -> Mar 28
        let dates = schedule_dates(Recurrence::Monthly, d(2023, 1, 31), d(2023, 3, 31));
        assert_eq!(dates, vec![d(2023, 2, 28), d(2023, 3, 28)]);
    }

    #[test]
    fn test_monthly_neither_skips_nor_duplicates() {
        let dates = schedule_dates(Recurrence::Monthly, d(2023, 1, 31), d(2023, 12, 31));
        assert_eq!(dates.len(), 11);
        let months: Vec<u32> = dates.iter().map(|dt| dt.month()).collect();
        assert_eq!(months, (2..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_yearly_leap_day() {
        let dates = schedule_dates(Recurrence::Yearly, d(2024, 2, 29), d(2026, 12, 31));
        assert_eq!(dates, vec![d(2025, 2, 28), d(2026, 2, 28)]);
    }

    #[test]
    fn test_dates_strictly_increasing_within_end() {
        for kind in [
            Recurrence::Daily,
            Recurrence::Weekly,
            Recurrence::Monthly,
            Recurrence::Yearly,
        ] {
            let start = d(2024, 1, 15);
            let end = d(2025, 1, 15);
            let dates = schedule_dates(kind, start, end);
            assert!(!dates.is_empty());
            assert!(dates.windows(2).all(|w| w[0] < w[1]));
            assert!(dates.iter().all(|&dt| dt > start && dt <= end));
        }
    }

    #[test]
    fn test_end_before_first_step_yields_nothing() {
        let dates = schedule_dates(Recurrence::Monthly, d(2024, 1, 1), d(2024, 1, 20));
        assert!(dates.is_empty());
    }

    #[test]
    fn test_none_has_no_schedule() {
        assert_eq!(next_date(Recurrence::None, d(2024, 1, 1)), None);
        assert!(schedule_dates(Recurrence::None, d(2024, 1, 1), d(2025, 1, 1)).is_empty());
    }
}
