//! Anomaly handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState};
use outlay_core::{detect::AnomalyDetector, models::Anomaly};

/// Query parameters for listing anomalies
#[derive(Debug, Deserialize)]
pub struct AnomalyQuery {
    /// Profile name; defaults to the seeded default profile
    pub profile: Option<String>,
    #[serde(default)]
    pub include_reviewed: bool,
}

/// GET /api/anomalies - List anomalies, newest first
pub async fn list_anomalies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnomalyQuery>,
) -> Result<Json<Vec<Anomaly>>, AppError> {
    let profile = state.db.resolve_profile(params.profile.as_deref())?;
    let anomalies = state.db.list_anomalies(profile.id, params.include_reviewed)?;
    Ok(Json(anomalies))
}

/// Request body for reviewing an anomaly
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub is_false_positive: bool,
}

/// POST /api/anomalies/:id/review - Review an anomaly
///
/// A false positive clears the expense's flag; a confirmed spike keeps it.
pub async fn review_anomaly(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<ReviewRequest>,
) -> Result<Json<Anomaly>, AppError> {
    let detector = AnomalyDetector::new(&state.db);
    let anomaly = detector.review(id, body.is_false_positive)?;
    Ok(Json(anomaly))
}
