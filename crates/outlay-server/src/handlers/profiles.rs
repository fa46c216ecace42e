//! Profile handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{AppError, AppState};
use outlay_core::models::Profile;

/// GET /api/profiles - List profiles
pub async fn list_profiles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Profile>>, AppError> {
    let profiles = state.db.list_profiles()?;
    Ok(Json(profiles))
}

/// Request body for creating a profile
#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub name: String,
}

/// POST /api/profiles - Create (or get) a profile by name
pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Profile name cannot be empty"));
    }

    let id = state.db.upsert_profile(name)?;
    let profile = state
        .db
        .get_profile(id)?
        .ok_or_else(|| AppError::internal("Profile vanished after creation"))?;

    Ok(Json(profile))
}
