//! Category API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use super::error::ApiError;
use crate::domain::{CategoryInput, DomainError};
use crate::infrastructure::AppState;
use crate::services::category_service;

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Categories ordered by name")
    )
)]
pub async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let categories = state.category_repo.find_all().await?;
    let total = categories.len();

    Ok(Json(json!({ "categories": categories, "total": total })))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CategoryInput,
    responses(
        (status = 201, description = "Category created"),
        (status = 400, description = "Missing name, negative amount or duplicate name")
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let category = category_service::create_category(state.db(), payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "category": category, "message": "Category created successfully" })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category with its penalty schedule"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .category_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Category", id))?;

    Ok(Json(json!({ "category": category })))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 400, description = "Category still has devices"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    category_service::delete_category(state.db(), id).await?;

    Ok(Json(json!({ "message": "Category deleted successfully" })))
}
