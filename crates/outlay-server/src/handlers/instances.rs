//! Recurring instance handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::{AppError, AppState};
use outlay_core::{
    ledger::{InstanceEdit, Ledger},
    models::RecurringInstance,
};

/// Query parameters for listing an expense's instances
#[derive(Debug, Deserialize)]
pub struct InstanceQuery {
    #[serde(default)]
    pub upcoming_only: bool,
}

/// GET /api/expenses/:id/instances - List an expense's recurring instances
pub async fn list_instances(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(params): Query<InstanceQuery>,
) -> Result<Json<Vec<RecurringInstance>>, AppError> {
    state
        .db
        .get_expense(id)?
        .ok_or_else(|| AppError::not_found("Expense not found"))?;

    let today = Utc::now().date_naive();
    let instances = state.db.list_instances(id, params.upcoming_only, today)?;
    Ok(Json(instances))
}

/// Request body for editing an instance
///
/// Omitted fields keep their current value; any edit marks the instance
/// as user-modified.
#[derive(Debug, Deserialize)]
pub struct EditInstanceRequest {
    pub date: Option<NaiveDate>,
    pub amount: Option<f64>,
    pub is_paid: Option<bool>,
}

/// PATCH /api/instances/:id - Edit a recurring instance
pub async fn edit_instance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<EditInstanceRequest>,
) -> Result<Json<RecurringInstance>, AppError> {
    let current = state
        .db
        .get_instance(id)?
        .ok_or_else(|| AppError::not_found("Recurring instance not found"))?;

    if let Some(amount) = body.amount {
        if amount <= 0.0 {
            return Err(AppError::bad_request("Amount must be positive"));
        }
    }

    let ledger = Ledger::new(&state.db);
    let instance = ledger.edit_instance(
        id,
        &InstanceEdit {
            date: body.date.unwrap_or(current.date),
            amount: body.amount.unwrap_or(current.amount),
            is_paid: body.is_paid.unwrap_or(current.is_paid),
        },
    )?;

    Ok(Json(instance))
}
