//! Processing log repository: append-only writes to the processing_log table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use factura_core::models::{ProcessingLogEntry, ProcessingStatus};
use factura_core::AppError;
use factura_processing::ProcessingLogStore;
use serde_json::Value as JsonValue;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Row type for the processing_log table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
pub struct ProcessingLogRow {
    pub id: Uuid,
    pub document_id: Uuid,
    pub status: ProcessingStatus,
    pub step: String,
    pub detail: JsonValue,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ProcessingLogRow {
    pub fn to_entry(self) -> ProcessingLogEntry {
        ProcessingLogEntry {
            id: self.id,
            document_id: self.document_id,
            status: self.status,
            step: self.step,
            detail: self.detail,
            error_message: self.error_message,
            created_at: self.created_at,
        }
    }
}

/// Repository for the processing_log table. Rows are never updated or
/// deleted here; cleanup, if any, happens via the documents cascade.
#[derive(Clone)]
pub struct ProcessingLogRepository {
    pool: PgPool,
}

impl ProcessingLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Processing history for a document, oldest first.
    #[tracing::instrument(skip(self), fields(db.table = "processing_log"))]
    pub async fn list_for_document(
        &self,
        document_id: Uuid,
    ) -> Result<Vec<ProcessingLogEntry>, AppError> {
        let rows: Vec<ProcessingLogRow> = sqlx::query_as::<Postgres, ProcessingLogRow>(
            r#"
            SELECT id, document_id, status, step, detail, error_message, created_at
            FROM processing_log
            WHERE document_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ProcessingLogRow::to_entry).collect())
    }
}

#[async_trait]
impl ProcessingLogStore for ProcessingLogRepository {
    #[tracing::instrument(skip(self, detail), fields(db.table = "processing_log"))]
    async fn append(
        &self,
        document_id: Uuid,
        status: ProcessingStatus,
        step: &str,
        detail: JsonValue,
        error_message: Option<&str>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO processing_log (document_id, status, step, detail, error_message)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(document_id)
        .bind(status)
        .bind(step)
        .bind(&detail)
        .bind(error_message)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
