use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use super::error::ApiError;
use crate::domain::{AnnotateLoanDetailInput, DomainError, LoanDetailFilter};
use crate::infrastructure::AppState;
use crate::services::loan_service;

#[utoipa::path(
    get,
    path = "/api/loan-details",
    params(
        ("loan_id" = Option<i32>, Query, description = "Only the record of this loan"),
        ("patron_id" = Option<String>, Query, description = "Only records of this patron")
    ),
    responses(
        (status = 200, description = "Check-out records, newest first")
    )
)]
pub async fn list_loan_details(
    State(state): State<AppState>,
    Query(filter): Query<LoanDetailFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let details = state.loan_detail_repo.find_all(filter).await?;
    let total = details.len();

    Ok(Json(json!({ "loan_details": details, "total": total })))
}

#[utoipa::path(
    get,
    path = "/api/loan-details/{id}",
    params(("id" = i32, Path, description = "Loan detail id")),
    responses(
        (status = 200, description = "Check-out record"),
        (status = 404, description = "Loan detail not found")
    )
)]
pub async fn get_loan_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state
        .loan_detail_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Loan detail", id))?;

    Ok(Json(json!({ "loan_detail": detail })))
}

#[utoipa::path(
    patch,
    path = "/api/loan-details/{id}",
    params(("id" = i32, Path, description = "Loan detail id")),
    request_body = AnnotateLoanDetailInput,
    responses(
        (status = 200, description = "Notes updated"),
        (status = 404, description = "Loan detail not found")
    )
)]
pub async fn annotate_loan_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AnnotateLoanDetailInput>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = loan_service::annotate_loan_detail(state.db(), id, payload).await?;

    Ok(Json(json!({ "loan_detail": detail, "message": "Loan detail updated successfully" })))
}
