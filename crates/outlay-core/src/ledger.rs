//! Ledger operations
//!
//! Each operation here is one SQLite transaction: the expense write, any
//! instance generation, and anomaly detection commit together or not at
//! all. A store failure mid-operation rolls the originating save back too.

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::db::{self, Database};
use crate::detect::{self, Detection};
use crate::error::{Error, Result};
use crate::models::{Expense, ExpenseUpdate, NewExpense, RecurringInstance};
use crate::recurrence;

/// Result of creating an expense
#[derive(Debug)]
pub struct ExpenseCreated {
    pub expense: Expense,
    /// Recurring instances generated from the recurrence schedule
    pub instances_created: usize,
    /// Spike detection outcome, if any
    pub detection: Option<Detection>,
}

/// Result of editing an expense
#[derive(Debug)]
pub struct ExpenseUpdated {
    pub expense: Expense,
    /// Future unmodified instances deleted during reconciliation
    pub instances_deleted: usize,
    /// Instances regenerated for unoccupied future schedule dates
    pub instances_created: usize,
}

/// Field values for editing a recurring instance
#[derive(Debug, Clone)]
pub struct InstanceEdit {
    pub date: NaiveDate,
    pub amount: f64,
    pub is_paid: bool,
}

/// Transactional expense operations
pub struct Ledger<'a> {
    db: &'a Database,
}

impl<'a> Ledger<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create an expense: save, materialize (if recurring), detect
    ///
    /// Recurrence validation happens before any write.
    pub fn create_expense(&self, new: &NewExpense) -> Result<ExpenseCreated> {
        validate_recurrence_pairing(new.recurrence.is_active(), new.recurrence_end_date)?;

        let today = Utc::now().date_naive();
        let mut conn = self.db.conn()?;
        let tx = conn.transaction()?;

        let id = db::expenses::insert_expense(&tx, new)?;
        let expense = db::expenses::get_expense(&tx, id)?
            .ok_or_else(|| Error::NotFound(format!("expense {}", id)))?;

        let instances_created = if expense.recurrence.is_active() {
            recurrence::materialize_in(&tx, &expense)?
        } else {
            0
        };

        let detection = detect::detect_in(&tx, &expense, today)?;

        tx.commit()?;

        // Re-read so the flag set by detection is reflected
        let expense = self
            .db
            .get_expense(id)?
            .ok_or_else(|| Error::NotFound(format!("expense {}", id)))?;

        info!(
            expense_id = id,
            amount = expense.amount,
            instances_created,
            flagged = expense.is_flagged,
            "Expense created"
        );

        Ok(ExpenseCreated {
            expense,
            instances_created,
            detection,
        })
    }

    /// Edit an expense: save, then reconcile its recurring instances
    ///
    /// Turning recurrence off deletes ALL instances, user-modified ones
    /// included. Detection never re-runs on edit.
    pub fn update_expense(&self, id: i64, update: &ExpenseUpdate) -> Result<ExpenseUpdated> {
        validate_recurrence_pairing(update.recurrence.is_active(), update.recurrence_end_date)?;

        let today = Utc::now().date_naive();
        let mut conn = self.db.conn()?;
        let tx = conn.transaction()?;

        db::expenses::update_expense(&tx, id, update)?;
        let expense = db::expenses::get_expense(&tx, id)?
            .ok_or_else(|| Error::NotFound(format!("expense {}", id)))?;

        let (instances_deleted, instances_created) = if expense.recurrence.is_active() {
            let outcome = recurrence::reconcile_in(&tx, &expense, today)?;
            (outcome.deleted, outcome.created)
        } else {
            // No children may remain once recurrence is none
            (db::instances::delete_all_instances(&tx, id)?, 0)
        };

        tx.commit()?;

        info!(
            expense_id = id,
            instances_deleted, instances_created, "Expense updated"
        );

        Ok(ExpenseUpdated {
            expense,
            instances_deleted,
            instances_created,
        })
    }

    /// Delete an expense; instances and anomalies cascade with it
    pub fn delete_expense(&self, id: i64) -> Result<()> {
        let mut conn = self.db.conn()?;
        let tx = conn.transaction()?;

        db::expenses::delete_expense(&tx, id)?;

        tx.commit()?;
        info!(expense_id = id, "Expense deleted");
        Ok(())
    }

    /// Edit a recurring instance
    ///
    /// Any edit (marking paid included) sets is_modified, shielding the
    /// instance from future regeneration.
    pub fn edit_instance(&self, id: i64, edit: &InstanceEdit) -> Result<RecurringInstance> {
        let mut conn = self.db.conn()?;
        let tx = conn.transaction()?;

        db::instances::update_instance(&tx, id, edit.date, edit.amount, edit.is_paid)?;
        let instance = db::instances::get_instance(&tx, id)?
            .ok_or_else(|| Error::NotFound(format!("recurring instance {}", id)))?;

        tx.commit()?;
        Ok(instance)
    }
}

/// Recurrence and end date must come as a pair
fn validate_recurrence_pairing(active: bool, end_date: Option<NaiveDate>) -> Result<()> {
    match (active, end_date) {
        (true, None) => Err(Error::InvalidData(
            "Recurring expense requires an end date".to_string(),
        )),
        (false, Some(_)) => Err(Error::InvalidData(
            "Recurrence end date set on a non-recurring expense".to_string(),
        )),
        _ => Ok(()),
    }
}
