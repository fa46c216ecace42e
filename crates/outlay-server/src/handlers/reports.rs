//! Dashboard and report handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;

use crate::{AppError, AppState};
use outlay_core::models::{DashboardSummary, SpendingReport};

/// Query parameters scoping a dashboard to a profile
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Profile name; defaults to the seeded default profile
    pub profile: Option<String>,
}

/// GET /api/dashboard - Dashboard summary over the trailing 180 days
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<DashboardSummary>, AppError> {
    let profile = state.db.resolve_profile(params.profile.as_deref())?;
    let today = Utc::now().date_naive();
    let summary = state.db.dashboard_summary(profile.id, today)?;
    Ok(Json(summary))
}

/// Query parameters for the spending report
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Profile name; defaults to the seeded default profile
    pub profile: Option<String>,
    /// Range start (inclusive); defaults to 90 days back
    pub from: Option<NaiveDate>,
    /// Range end (inclusive); defaults to today
    pub to: Option<NaiveDate>,
}

/// GET /api/reports/spending - Spending report for a date range
pub async fn report_spending(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportQuery>,
) -> Result<Json<SpendingReport>, AppError> {
    let profile = state.db.resolve_profile(params.profile.as_deref())?;

    let today = Utc::now().date_naive();
    let to = params.to.unwrap_or(today);
    let from = params.from.unwrap_or(to - Duration::days(90));
    if from > to {
        return Err(AppError::bad_request("'from' must not be after 'to'"));
    }

    let report = state.db.spending_report(profile.id, from, to)?;
    Ok(Json(report))
}
