//! Device API handlers using repository pattern

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use super::error::ApiError;
use crate::domain::{
    DeviceFilter, DeviceStatus, DomainError, RegisterDeviceInput, UpdateDeviceInput,
};
use crate::infrastructure::AppState;
use crate::services::device_service;

#[utoipa::path(
    get,
    path = "/api/devices",
    params(
        ("status" = Option<DeviceStatus>, Query, description = "Only devices with this status"),
        ("category_id" = Option<i32>, Query, description = "Only devices of this category")
    ),
    responses(
        (status = 200, description = "Devices with their category names")
    )
)]
pub async fn list_devices(
    State(state): State<AppState>,
    Query(filter): Query<DeviceFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let devices = state.device_repo.find_all(filter).await?;
    let total = devices.len();

    Ok(Json(json!({ "devices": devices, "total": total })))
}

#[utoipa::path(
    post,
    path = "/api/devices",
    request_body = RegisterDeviceInput,
    responses(
        (status = 201, description = "Device registered"),
        (status = 400, description = "Missing name, TISID or category"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn register_device(
    State(state): State<AppState>,
    Json(payload): Json<RegisterDeviceInput>,
) -> Result<impl IntoResponse, ApiError> {
    let device = device_service::register_device(state.db(), payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "device": device, "message": "Device registered successfully" })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/devices/{id}",
    params(("id" = i32, Path, description = "Device id")),
    responses(
        (status = 200, description = "Device with its category name"),
        (status = 404, description = "Device not found")
    )
)]
pub async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let device = state
        .device_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Device", id))?;

    Ok(Json(json!({ "device": device })))
}

#[utoipa::path(
    put,
    path = "/api/devices/{id}",
    params(("id" = i32, Path, description = "Device id")),
    request_body = UpdateDeviceInput,
    responses(
        (status = 200, description = "Device fields updated; status is unchanged"),
        (status = 400, description = "Missing field or TISID already registered"),
        (status = 404, description = "Device or category not found")
    )
)]
pub async fn update_device(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateDeviceInput>,
) -> Result<impl IntoResponse, ApiError> {
    let device = device_service::update_device(state.db(), id, payload).await?;

    Ok(Json(json!({ "device": device, "message": "Device updated successfully" })))
}

/// Request DTO for a client status change
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetStatusRequest {
    pub status: DeviceStatus,
}

#[utoipa::path(
    put,
    path = "/api/devices/{id}/status",
    params(("id" = i32, Path, description = "Device id")),
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Status changed (or already in that state)"),
        (status = 404, description = "Device not found"),
        (status = 409, description = "Transition not allowed")
    )
)]
pub async fn set_device_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<SetStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let device = device_service::set_status(state.db(), id, payload.status).await?;

    Ok(Json(json!({ "device": device })))
}

#[utoipa::path(
    delete,
    path = "/api/devices/{id}",
    params(("id" = i32, Path, description = "Device id")),
    responses(
        (status = 200, description = "Device deleted"),
        (status = 400, description = "Device has loan history"),
        (status = 404, description = "Device not found"),
        (status = 409, description = "Device is on an open loan")
    )
)]
pub async fn delete_device(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    device_service::delete_device(state.db(), id).await?;

    Ok(Json(json!({ "message": "Device deleted successfully" })))
}
