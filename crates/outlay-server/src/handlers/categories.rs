//! Category handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState, SuccessResponse};
use outlay_core::models::Category;

/// GET /api/categories - List categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = state.db.list_categories()?;
    Ok(Json(categories))
}

/// Request body for creating a category
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub color: Option<String>,
}

/// POST /api/categories - Create a category
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<Json<Category>, AppError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Category name cannot be empty"));
    }

    let id = state.db.create_category(name, body.color.as_deref())?;
    let category = state
        .db
        .get_category(id)?
        .ok_or_else(|| AppError::internal("Category vanished after creation"))?;

    Ok(Json(category))
}

/// GET /api/categories/:id - Get a category
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Category>, AppError> {
    let category = state
        .db
        .get_category(id)?
        .ok_or_else(|| AppError::not_found("Category not found"))?;
    Ok(Json(category))
}

/// Request body for updating a category
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// PUT /api/categories/:id - Update a category
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>, AppError> {
    state
        .db
        .get_category(id)?
        .ok_or_else(|| AppError::not_found("Category not found"))?;

    state
        .db
        .update_category(id, body.name.as_deref(), body.color.as_deref())?;

    let category = state
        .db
        .get_category(id)?
        .ok_or_else(|| AppError::internal("Category vanished after update"))?;
    Ok(Json(category))
}

/// DELETE /api/categories/:id - Delete a category
///
/// Rejected while any expense still references it.
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_category(id)?;
    Ok(Json(SuccessResponse { success: true }))
}
