//! Department CRUD handlers.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use factura_core::models::DepartmentResponse;
use factura_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DepartmentRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v0/departments",
    tag = "departments",
    request_body = DepartmentRequest,
    responses(
        (status = 200, description = "Department created", body = DepartmentResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_department(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DepartmentRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let department = state
        .departments
        .create(request.name, request.description)
        .await
        .map_err(HttpAppError::from)?;

    Ok(Json(DepartmentResponse::from(department)))
}

#[utoipa::path(
    get,
    path = "/api/v0/departments",
    tag = "departments",
    responses(
        (status = 200, description = "List of departments", body = Vec<DepartmentResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_departments(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let departments = state.departments.list().await.map_err(HttpAppError::from)?;
    let response: Vec<DepartmentResponse> = departments
        .into_iter()
        .map(DepartmentResponse::from)
        .collect();
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v0/departments/{id}",
    tag = "departments",
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department found", body = DepartmentResponse),
        (status = 404, description = "Department not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_department(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let department = state
        .departments
        .get_by_id(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| AppError::NotFound("Department not found".to_string()))?;

    Ok(Json(DepartmentResponse::from(department)))
}

#[utoipa::path(
    put,
    path = "/api/v0/departments/{id}",
    tag = "departments",
    params(("id" = Uuid, Path, description = "Department ID")),
    request_body = DepartmentRequest,
    responses(
        (status = 200, description = "Department updated", body = DepartmentResponse),
        (status = 404, description = "Department not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn update_department(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<DepartmentRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let department = state
        .departments
        .update(id, request.name, request.description)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| AppError::NotFound("Department not found".to_string()))?;

    Ok(Json(DepartmentResponse::from(department)))
}

#[utoipa::path(
    delete,
    path = "/api/v0/departments/{id}",
    tag = "departments",
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 204, description = "Department deleted"),
        (status = 404, description = "Department not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn delete_department(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let deleted = state
        .departments
        .delete(id)
        .await
        .map_err(HttpAppError::from)?;
    if !deleted {
        return Err(AppError::NotFound("Department not found".to_string()).into());
    }
    Ok(axum::http::StatusCode::NO_CONTENT)
}
