//! Expense export handlers

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, Response, StatusCode},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::{AppError, AppState};
use outlay_core::export::ExpenseExportOptions;

/// Query parameters for expense export
#[derive(Debug, Deserialize)]
pub struct ExpenseExportQuery {
    /// Output format (default: csv)
    #[serde(default = "default_format")]
    pub format: String,
    /// Profile name; defaults to the seeded default profile
    pub profile: Option<String>,
    /// Start date (YYYY-MM-DD)
    pub from: Option<NaiveDate>,
    /// End date (YYYY-MM-DD)
    pub to: Option<NaiveDate>,
    pub category_id: Option<i64>,
    #[serde(default)]
    pub flagged: bool,
}

fn default_format() -> String {
    "csv".to_string()
}

/// GET /api/export/expenses - Export expenses to CSV or JSON
pub async fn export_expenses(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExpenseExportQuery>,
) -> Result<Response<Body>, AppError> {
    let profile = state.db.resolve_profile(params.profile.as_deref())?;

    let opts = ExpenseExportOptions {
        profile_id: Some(profile.id),
        from: params.from,
        to: params.to,
        category_id: params.category_id,
        flagged_only: params.flagged,
    };

    match params.format.as_str() {
        "csv" => {
            let csv = state.db.export_expenses_csv(&opts)?;
            let lines = csv.lines().count().saturating_sub(1);
            info!("Exported {} expenses to CSV", lines);

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
                .header(
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"expenses.csv\"",
                )
                .body(Body::from(csv))
                .map_err(|e| AppError::internal(&e.to_string()))
        }
        "json" => {
            let expenses = state.db.export_expenses(&opts)?;
            let json = serde_json::to_string_pretty(&expenses)
                .map_err(|e| AppError::internal(&e.to_string()))?;
            info!("Exported {} expenses to JSON", expenses.len());

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "application/json")
                .header(
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"expenses.json\"",
                )
                .body(Body::from(json))
                .map_err(|e| AppError::internal(&e.to_string()))
        }
        _ => Err(AppError::bad_request("Invalid format. Use 'csv' or 'json'")),
    }
}
