//! Persistence seams for the pipeline.
//!
//! The orchestrator talks to the database through these traits rather than
//! concrete repositories, so tests can substitute in-memory doubles. The
//! Postgres implementations live in `factura-db`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use factura_core::models::{DocumentInfo, InvoiceFields, ProcessingStatus};
use factura_core::AppError;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Upsert-by-key store for per-document extraction records.
///
/// At most one record exists per document; conflict resolution is
/// overwrite-all-fields, never a partial merge.
#[async_trait]
pub trait DocumentInfoStore: Send + Sync {
    /// Upsert the record as `completed` with the extracted fields.
    async fn upsert_completed(
        &self,
        document_id: Uuid,
        fields: &InvoiceFields,
        processed_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// Upsert the record as `error`. The extracted field columns are
    /// overwritten with NULL; the record only marks the failure.
    async fn upsert_error(&self, document_id: Uuid, error_message: &str) -> Result<(), AppError>;

    /// Read the record, if one exists.
    async fn get(&self, document_id: Uuid) -> Result<Option<DocumentInfo>, AppError>;

    /// Persist a page-count estimate without touching the rest of the record.
    async fn set_page_count(&self, document_id: Uuid, page_count: i32) -> Result<(), AppError>;
}

/// Append-only store for processing status transitions.
#[async_trait]
pub trait ProcessingLogStore: Send + Sync {
    async fn append(
        &self,
        document_id: Uuid,
        status: ProcessingStatus,
        step: &str,
        detail: JsonValue,
        error_message: Option<&str>,
    ) -> Result<(), AppError>;
}
