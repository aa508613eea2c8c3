//! Employee CRUD handlers.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use factura_core::models::EmployeeResponse;
use factura_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EmployeeRequest {
    pub department_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListEmployeesQuery {
    /// Restrict the listing to a single department.
    pub department_id: Option<Uuid>,
}

#[utoipa::path(
    post,
    path = "/api/v0/employees",
    tag = "employees",
    request_body = EmployeeRequest,
    responses(
        (status = 200, description = "Employee created", body = EmployeeResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EmployeeRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    if let Some(department_id) = request.department_id {
        state
            .departments
            .get_by_id(department_id)
            .await
            .map_err(HttpAppError::from)?
            .ok_or_else(|| AppError::InvalidInput("Unknown department".to_string()))?;
    }

    let employee = state
        .employees
        .create(
            request.department_id,
            request.first_name,
            request.last_name,
            request.email,
            request.role,
        )
        .await
        .map_err(HttpAppError::from)?;

    Ok(Json(EmployeeResponse::from(employee)))
}

#[utoipa::path(
    get,
    path = "/api/v0/employees",
    tag = "employees",
    params(ListEmployeesQuery),
    responses(
        (status = 200, description = "List of employees", body = Vec<EmployeeResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_employees(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListEmployeesQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let employees = state
        .employees
        .list(query.department_id)
        .await
        .map_err(HttpAppError::from)?;
    let response: Vec<EmployeeResponse> =
        employees.into_iter().map(EmployeeResponse::from).collect();
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v0/employees/{id}",
    tag = "employees",
    params(("id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee found", body = EmployeeResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let employee = state
        .employees
        .get_by_id(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    Ok(Json(EmployeeResponse::from(employee)))
}

#[utoipa::path(
    put,
    path = "/api/v0/employees/{id}",
    tag = "employees",
    params(("id" = Uuid, Path, description = "Employee ID")),
    request_body = EmployeeRequest,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn update_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<EmployeeRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    if let Some(department_id) = request.department_id {
        state
            .departments
            .get_by_id(department_id)
            .await
            .map_err(HttpAppError::from)?
            .ok_or_else(|| AppError::InvalidInput("Unknown department".to_string()))?;
    }

    let employee = state
        .employees
        .update(
            id,
            request.department_id,
            request.first_name,
            request.last_name,
            request.email,
            request.role,
        )
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    Ok(Json(EmployeeResponse::from(employee)))
}

#[utoipa::path(
    delete,
    path = "/api/v0/employees/{id}",
    tag = "employees",
    params(("id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn delete_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let deleted = state
        .employees
        .delete(id)
        .await
        .map_err(HttpAppError::from)?;
    if !deleted {
        return Err(AppError::NotFound("Employee not found".to_string()).into());
    }
    Ok(axum::http::StatusCode::NO_CONTENT)
}
