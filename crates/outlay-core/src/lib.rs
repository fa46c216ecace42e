//! Outlay Core Library
//!
//! Shared functionality for the Outlay expense tracker:
//! - Database access and migrations (SQLCipher-encrypted SQLite)
//! - Transactional ledger operations (create, edit, delete)
//! - Recurrence materialization for scheduled expenses
//! - Statistical anomaly detection over category history
//! - Dashboard and spending report aggregates
//! - CSV export

pub mod db;
pub mod detect;
pub mod error;
pub mod export;
pub mod ledger;
pub mod models;
pub mod recurrence;

pub use db::{Database, ExpenseFilter};
pub use detect::{AnomalyDetector, Detection};
pub use error::{Error, Result};
pub use export::ExpenseExportOptions;
pub use ledger::{ExpenseCreated, ExpenseUpdated, InstanceEdit, Ledger};
pub use recurrence::Materializer;
