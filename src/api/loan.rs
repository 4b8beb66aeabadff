use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use super::error::ApiError;
use crate::domain::{
    AnnotateLoanInput, CloseLoanInput, DamageReport, DomainError, Loan, LoanFilter, OpenLoanInput,
};
use crate::infrastructure::AppState;
use crate::services::loan_service;
use crate::utils::time;

/// Request DTO for opening a loan
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OpenLoanRequest {
    #[serde(default)]
    pub device_id: Option<i32>,
    #[serde(default)]
    pub course_id: Option<i32>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub patron_id: Option<String>,
    /// Defaults to the current time
    #[serde(default)]
    pub check_out_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Notes on the check-out record
    #[serde(default)]
    pub detail_notes: Option<String>,
}

/// Request DTO for returning a loan
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CloseLoanRequest {
    /// Defaults to the current time
    #[serde(default)]
    pub check_in_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub damage: Option<DamageReport>,
    #[serde(default)]
    pub deduction: Option<Decimal>,
    #[serde(default)]
    pub comments: Option<String>,
}

fn required<T>(field: &str, value: Option<T>) -> Result<T, DomainError> {
    value.ok_or_else(|| DomainError::Validation(format!("{} is required", field)))
}

fn loan_json(loan: &Loan) -> Value {
    json!({
        "loan": loan,
        "state": loan.state(),
        "amount_due": loan.amount_due(),
    })
}

#[utoipa::path(
    get,
    path = "/api/loans",
    params(
        ("open" = Option<bool>, Query, description = "Only open (true) or closed (false) loans"),
        ("device_id" = Option<i32>, Query, description = "Only loans of this device"),
        ("course_id" = Option<i32>, Query, description = "Only loans for this course")
    ),
    responses(
        (status = 200, description = "Loans with state and amount due, newest first")
    )
)]
pub async fn list_loans(
    State(state): State<AppState>,
    Query(filter): Query<LoanFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let loans = state.loan_repo.find_all(filter).await?;
    let result: Vec<Value> = loans.iter().map(loan_json).collect();

    Ok(Json(json!({ "loans": result, "total": result.len() })))
}

#[utoipa::path(
    get,
    path = "/api/loans/overdue",
    responses(
        (status = 200, description = "Open loans past their due date")
    )
)]
pub async fn list_overdue_loans(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let loans = state.loan_repo.find_overdue(time::now()).await?;
    let result: Vec<Value> = loans.iter().map(loan_json).collect();

    Ok(Json(json!({ "loans": result, "total": result.len() })))
}

#[utoipa::path(
    post,
    path = "/api/loans",
    request_body = OpenLoanRequest,
    responses(
        (status = 201, description = "Loan opened, device marked loaned"),
        (status = 400, description = "Missing field or due date not after check-out"),
        (status = 404, description = "Device not found"),
        (status = 409, description = "Device is not available")
    )
)]
pub async fn open_loan(
    State(state): State<AppState>,
    Json(payload): Json<OpenLoanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = OpenLoanInput {
        device_id: required("device_id", payload.device_id)?,
        course_id: required("course_id", payload.course_id)?,
        due_date: required("due_date", payload.due_date)?,
        patron_id: required("patron_id", payload.patron_id)?,
        check_out_date: payload.check_out_date.unwrap_or_else(time::now),
        notes: payload.notes,
        detail_notes: payload.detail_notes,
    };

    let receipt = loan_service::open_loan(state.db(), input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "loan": receipt.loan,
            "detail": receipt.detail,
            "message": "Loan opened successfully"
        })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/loans/{id}",
    params(("id" = i32, Path, description = "Loan id")),
    responses(
        (status = 200, description = "Loan with its check-out record"),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let loan = state
        .loan_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Loan", id))?;
    let detail = state.loan_detail_repo.find_by_loan_id(id).await?;

    let mut body = loan_json(&loan);
    body["detail"] = json!(detail);

    Ok(Json(body))
}

#[utoipa::path(
    patch,
    path = "/api/loans/{id}",
    params(("id" = i32, Path, description = "Loan id")),
    request_body = AnnotateLoanInput,
    responses(
        (status = 200, description = "Notes and comments updated"),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn annotate_loan(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AnnotateLoanInput>,
) -> Result<impl IntoResponse, ApiError> {
    let loan = loan_service::annotate_loan(state.db(), id, payload).await?;

    Ok(Json(loan_json(&loan)))
}

#[utoipa::path(
    put,
    path = "/api/loans/{id}/return",
    params(("id" = i32, Path, description = "Loan id")),
    request_body = CloseLoanRequest,
    responses(
        (status = 200, description = "Loan closed with computed penalties"),
        (status = 400, description = "Check-in before check-out or deduction too large"),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan already closed")
    )
)]
pub async fn return_loan(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CloseLoanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = CloseLoanInput {
        check_in_date: payload.check_in_date.unwrap_or_else(time::now),
        damage: payload.damage,
        deduction: payload.deduction,
        comments: payload.comments,
    };

    let loan = loan_service::close_loan(state.db(), id, input).await?;

    let mut body = loan_json(&loan);
    body["message"] = json!("Loan returned successfully");

    Ok(Json(body))
}

#[utoipa::path(
    delete,
    path = "/api/loans/{id}",
    params(("id" = i32, Path, description = "Loan id")),
    responses(
        (status = 200, description = "Closed loan and its check-out record deleted"),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan is still open")
    )
)]
pub async fn delete_loan(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    loan_service::delete_loan(state.db(), id).await?;

    Ok(Json(json!({ "message": "Loan deleted successfully" })))
}
