//! Pipeline trigger and extraction-result handlers.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use factura_core::models::{DocumentInfoResponse, ProcessingLogResponse};
use factura_core::AppError;
use factura_processing::{estimate_page_count, PipelineOutcome};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/v0/documents/{id}/process",
    tag = "processing",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Pipeline outcome (success or structured failure)", body = inline(Object)),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn process_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<PipelineOutcome>, HttpAppError> {
    let document = state
        .documents
        .get_by_id(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

    let file_key = document
        .primary_file_key()
        .ok_or_else(|| AppError::InvalidInput("Document has no files".to_string()))?;

    // The pipeline never errors; failures come back inside the outcome.
    let outcome = state
        .pipeline
        .process_document(&document.id.to_string(), file_key)
        .await;

    Ok(Json(outcome))
}

#[utoipa::path(
    get,
    path = "/api/v0/documents/{id}/info",
    tag = "processing",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Extraction record", body = DocumentInfoResponse),
        (status = 404, description = "No extraction record for this document", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_document_info(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let info = state
        .document_info
        .get_by_document_id(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| AppError::NotFound("No extraction record for document".to_string()))?;

    Ok(Json(DocumentInfoResponse::from(info)))
}

#[utoipa::path(
    get,
    path = "/api/v0/documents/{id}/logs",
    tag = "processing",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Processing history, oldest first", body = Vec<ProcessingLogResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_processing_logs(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let entries = state
        .processing_log
        .list_for_document(id)
        .await
        .map_err(HttpAppError::from)?;

    let response: Vec<ProcessingLogResponse> = entries
        .into_iter()
        .map(ProcessingLogResponse::from)
        .collect();
    Ok(Json(response))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PageCountResponse {
    pub document_id: Uuid,
    pub page_count: i32,
}

#[utoipa::path(
    get,
    path = "/api/v0/documents/{id}/pages",
    tag = "processing",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Page count (estimated on first request)", body = PageCountResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_page_count(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let document = state
        .documents
        .get_by_id(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

    // Fail-soft by contract: estimation degrades to 1 page on any failure.
    let page_count = match document.primary_file_key() {
        Some(file_key) => {
            estimate_page_count(
                &state.document_info,
                state.storage.as_ref(),
                &document.id.to_string(),
                file_key,
            )
            .await
        }
        None => 1,
    };

    Ok(Json(PageCountResponse {
        document_id: id,
        page_count,
    }))
}
