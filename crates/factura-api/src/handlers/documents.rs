//! Document upload and CRUD handlers.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::IntoResponse,
    Json,
};
use factura_core::models::DocumentResponse;
use factura_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Deserialize, ToSchema, utoipa::IntoParams)]
pub struct PaginationQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

struct UploadedFile {
    filename: String,
    content_type: String,
    data: Vec<u8>,
}

/// Pull the first file field out of the multipart body.
async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Invalid multipart body: {}", e)))?
    {
        let Some(filename) = field.file_name().map(String::from) else {
            continue;
        };
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_lowercase();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read upload: {}", e)))?
            .to_vec();
        return Ok(UploadedFile {
            filename,
            content_type,
            data,
        });
    }
    Err(AppError::InvalidInput(
        "Multipart body contains no file field".to_string(),
    ))
}

fn validate_upload(state: &AppState, upload: &UploadedFile) -> Result<(), AppError> {
    if upload.data.is_empty() {
        return Err(AppError::InvalidInput("Uploaded file is empty".to_string()));
    }

    let max_size = state.config.max_document_size_bytes();
    if upload.data.len() > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File is {} bytes, limit is {} bytes",
            upload.data.len(),
            max_size
        )));
    }

    let extension = upload
        .filename
        .rsplit('.')
        .next()
        .map(str::to_lowercase)
        .unwrap_or_default();
    let allowed_extensions = state.config.document_allowed_extensions();
    if !allowed_extensions.iter().any(|e| e == &extension) {
        return Err(AppError::InvalidInput(format!(
            "File extension '{}' is not allowed (allowed: {})",
            extension,
            allowed_extensions.join(", ")
        )));
    }

    let allowed_content_types = state.config.document_allowed_content_types();
    if !allowed_content_types.iter().any(|c| c == &upload.content_type) {
        return Err(AppError::InvalidInput(format!(
            "Content type '{}' is not allowed",
            upload.content_type
        )));
    }

    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/v0/documents",
    tag = "documents",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Document uploaded, processing started", body = DocumentResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let upload = read_upload(multipart).await.map_err(HttpAppError::from)?;
    validate_upload(&state, &upload).map_err(HttpAppError::from)?;

    let file_size = upload.data.len() as i64;
    let file_key = state
        .storage
        .upload(&upload.filename, &upload.content_type, upload.data)
        .await?;

    let document = state
        .documents
        .create(
            upload.filename.clone(),
            upload.filename,
            vec![file_key.clone()],
            upload.content_type,
            file_size,
        )
        .await
        .map_err(HttpAppError::from)?;

    state
        .document_info
        .insert_pending(document.id)
        .await
        .map_err(HttpAppError::from)?;

    // Processing runs in the background; the pipeline reports its outcome
    // through document_info and the processing log.
    let pipeline = state.pipeline.clone();
    let document_id = document.id.to_string();
    tokio::spawn(async move {
        pipeline.process_document(&document_id, &file_key).await;
    });

    Ok(Json(DocumentResponse::from(document)))
}

#[utoipa::path(
    get,
    path = "/api/v0/documents",
    tag = "documents",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of documents", body = Vec<DocumentResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let documents = state
        .documents
        .list(pagination.limit.clamp(1, 500), pagination.offset.max(0))
        .await
        .map_err(HttpAppError::from)?;

    let response: Vec<DocumentResponse> =
        documents.into_iter().map(DocumentResponse::from).collect();
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v0/documents/{id}",
    tag = "documents",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document found", body = DocumentResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let document = state
        .documents
        .get_by_id(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

    Ok(Json(DocumentResponse::from(document)))
}

#[utoipa::path(
    delete,
    path = "/api/v0/documents/{id}",
    tag = "documents",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let document = state
        .documents
        .get_by_id(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

    // Stored files go first; a failed delete leaves the record intact so the
    // operation can be retried.
    for key in &document.file_keys {
        state.storage.delete(key).await?;
    }

    state.documents.delete(id).await.map_err(HttpAppError::from)?;

    Ok(axum::http::StatusCode::NO_CONTENT)
}
