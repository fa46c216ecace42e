//! Expense handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState, SuccessResponse, MAX_PAGE_LIMIT};
use outlay_core::{
    db::ExpenseFilter,
    ledger::Ledger,
    models::{Expense, ExpenseUpdate, NewExpense, Recurrence},
    Detection,
};

/// Query parameters for listing expenses
#[derive(Debug, Deserialize)]
pub struct ExpenseQuery {
    /// Profile name; defaults to the seeded default profile
    pub profile: Option<String>,
    pub category_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub search: Option<String>,
    #[serde(default)]
    pub flagged: bool,
    #[serde(default)]
    pub recurring: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Paged expense listing
#[derive(Debug, Serialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<Expense>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// GET /api/expenses - List expenses with filtering and pagination
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExpenseQuery>,
) -> Result<Json<ExpenseListResponse>, AppError> {
    let limit = params.limit.unwrap_or(50).clamp(1, MAX_PAGE_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let profile = state.db.resolve_profile(params.profile.as_deref())?;

    let filter = ExpenseFilter::new()
        .profile_id(Some(profile.id))
        .category_id(params.category_id)
        .from_date(params.from)
        .to_date(params.to)
        .min_amount(params.min_amount)
        .max_amount(params.max_amount)
        .description(params.search.as_deref())
        .flagged_only(params.flagged)
        .recurring_only(params.recurring);

    let expenses = state.db.list_expenses(filter, limit, offset)?;

    let count_filter = ExpenseFilter::new()
        .profile_id(Some(profile.id))
        .category_id(params.category_id)
        .from_date(params.from)
        .to_date(params.to)
        .min_amount(params.min_amount)
        .max_amount(params.max_amount)
        .description(params.search.as_deref())
        .flagged_only(params.flagged)
        .recurring_only(params.recurring);
    let total = state.db.count_expenses(count_filter)?;

    Ok(Json(ExpenseListResponse {
        expenses,
        total,
        limit,
        offset,
    }))
}

/// Request body for creating an expense
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// Profile name; defaults to the seeded default profile
    pub profile: Option<String>,
    pub category_id: i64,
    pub amount: f64,
    pub date: NaiveDate,
    pub description: String,
    #[serde(default = "default_recurrence")]
    pub recurrence: Recurrence,
    pub recurrence_end_date: Option<NaiveDate>,
}

fn default_recurrence() -> Recurrence {
    Recurrence::None
}

/// Response for expense creation, including detection outcome
#[derive(Debug, Serialize)]
pub struct CreateExpenseResponse {
    pub expense: Expense,
    pub instances_created: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anomaly: Option<AnomalySummary>,
}

/// Detection outcome attached to a create response
#[derive(Debug, Serialize)]
pub struct AnomalySummary {
    pub id: i64,
    pub confidence: f64,
    pub description: String,
}

impl From<Detection> for AnomalySummary {
    fn from(d: Detection) -> Self {
        Self {
            id: d.anomaly_id,
            confidence: d.confidence,
            description: d.description,
        }
    }
}

/// POST /api/expenses - Create an expense
///
/// Materializes recurring instances and runs anomaly detection in the
/// same transaction as the save.
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateExpenseRequest>,
) -> Result<Json<CreateExpenseResponse>, AppError> {
    if body.amount <= 0.0 {
        return Err(AppError::bad_request("Amount must be positive"));
    }

    let profile = state.db.resolve_profile(body.profile.as_deref())?;
    state
        .db
        .get_category(body.category_id)?
        .ok_or_else(|| AppError::bad_request("Unknown category"))?;

    let ledger = Ledger::new(&state.db);
    let created = ledger.create_expense(&NewExpense {
        profile_id: profile.id,
        category_id: body.category_id,
        amount: body.amount,
        date: body.date,
        description: body.description,
        recurrence: body.recurrence,
        recurrence_end_date: body.recurrence_end_date,
    })?;

    Ok(Json(CreateExpenseResponse {
        expense: created.expense,
        instances_created: created.instances_created,
        anomaly: created.detection.map(AnomalySummary::from),
    }))
}

/// GET /api/expenses/:id - Get an expense
pub async fn get_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Expense>, AppError> {
    let expense = state
        .db
        .get_expense(id)?
        .ok_or_else(|| AppError::not_found("Expense not found"))?;
    Ok(Json(expense))
}

/// Request body for editing an expense (whole-form update)
#[derive(Debug, Deserialize)]
pub struct UpdateExpenseRequest {
    pub category_id: i64,
    pub amount: f64,
    pub date: NaiveDate,
    pub description: String,
    pub recurrence: Recurrence,
    pub recurrence_end_date: Option<NaiveDate>,
}

/// Response for expense edits, reporting reconciliation work
#[derive(Debug, Serialize)]
pub struct UpdateExpenseResponse {
    pub expense: Expense,
    pub instances_deleted: usize,
    pub instances_created: usize,
}

/// PUT /api/expenses/:id - Edit an expense and reconcile its instances
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateExpenseRequest>,
) -> Result<Json<UpdateExpenseResponse>, AppError> {
    if body.amount <= 0.0 {
        return Err(AppError::bad_request("Amount must be positive"));
    }
    state
        .db
        .get_category(body.category_id)?
        .ok_or_else(|| AppError::bad_request("Unknown category"))?;

    let ledger = Ledger::new(&state.db);
    let updated = ledger.update_expense(
        id,
        &ExpenseUpdate {
            category_id: body.category_id,
            amount: body.amount,
            date: body.date,
            description: body.description,
            recurrence: body.recurrence,
            recurrence_end_date: body.recurrence_end_date,
        },
    )?;

    Ok(Json(UpdateExpenseResponse {
        expense: updated.expense,
        instances_deleted: updated.instances_deleted,
        instances_created: updated.instances_created,
    }))
}

/// DELETE /api/expenses/:id - Delete an expense (instances and anomalies cascade)
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    let ledger = Ledger::new(&state.db);
    ledger.delete_expense(id)?;
    Ok(Json(SuccessResponse { success: true }))
}
