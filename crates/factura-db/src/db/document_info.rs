//! DocumentInfo repository: upsert-by-key over the document_info table.
//!
//! At most one row exists per document. All writes go through
//! `ON CONFLICT (document_id) DO UPDATE` with full-row overwrite, never a
//! partial merge, so the row always reflects the most recent attempt.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use factura_core::models::{DocumentInfo, InvoiceFields, ProcessingStatus};
use factura_core::AppError;
use factura_processing::DocumentInfoStore;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Row type for the document_info table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
pub struct DocumentInfoRow {
    pub document_id: Uuid,
    pub vendor_name: Option<String>,
    pub invoice_number: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub total_amount: Option<Decimal>,
    pub processing_status: ProcessingStatus,
    pub error_message: Option<String>,
    pub page_count: Option<i32>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl DocumentInfoRow {
    pub fn to_document_info(self) -> DocumentInfo {
        DocumentInfo {
            document_id: self.document_id,
            vendor_name: self.vendor_name,
            invoice_number: self.invoice_number,
            invoice_date: self.invoice_date,
            total_amount: self.total_amount,
            processing_status: self.processing_status,
            error_message: self.error_message,
            page_count: self.page_count,
            processed_at: self.processed_at,
        }
    }
}

/// Repository for the document_info table.
#[derive(Clone)]
pub struct DocumentInfoRepository {
    pool: PgPool,
}

impl DocumentInfoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Seed a `pending` record right after upload so the UI has a row to
    /// show before the pipeline runs. Keeps an existing record untouched.
    #[tracing::instrument(skip(self), fields(db.table = "document_info"))]
    pub async fn insert_pending(&self, document_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO document_info (document_id, processing_status)
            VALUES ($1, 'pending')
            ON CONFLICT (document_id) DO NOTHING
            "#,
        )
        .bind(document_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "document_info"))]
    pub async fn get_by_document_id(
        &self,
        document_id: Uuid,
    ) -> Result<Option<DocumentInfo>, AppError> {
        let row: Option<DocumentInfoRow> = sqlx::query_as::<Postgres, DocumentInfoRow>(
            r#"
            SELECT document_id, vendor_name, invoice_number, invoice_date, total_amount,
                   processing_status, error_message, page_count, processed_at
            FROM document_info
            WHERE document_id = $1
            "#,
        )
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(DocumentInfoRow::to_document_info))
    }
}

#[async_trait]
impl DocumentInfoStore for DocumentInfoRepository {
    #[tracing::instrument(skip(self, fields), fields(db.table = "document_info"))]
    async fn upsert_completed(
        &self,
        document_id: Uuid,
        fields: &InvoiceFields,
        processed_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO document_info
                (document_id, vendor_name, invoice_number, invoice_date, total_amount,
                 processing_status, error_message, processed_at)
            VALUES ($1, $2, $3, $4, $5, 'completed', NULL, $6)
            ON CONFLICT (document_id) DO UPDATE SET
                vendor_name = EXCLUDED.vendor_name,
                invoice_number = EXCLUDED.invoice_number,
                invoice_date = EXCLUDED.invoice_date,
                total_amount = EXCLUDED.total_amount,
                processing_status = EXCLUDED.processing_status,
                error_message = EXCLUDED.error_message,
                processed_at = EXCLUDED.processed_at
            "#,
        )
        .bind(document_id)
        .bind(&fields.vendor_name)
        .bind(&fields.invoice_number)
        .bind(fields.invoice_date)
        .bind(fields.total_amount)
        .bind(processed_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "document_info"))]
    async fn upsert_error(&self, document_id: Uuid, error_message: &str) -> Result<(), AppError> {
        // Same conflict rule as the completed upsert, but the extracted field
        // columns are overwritten with NULL: the row only marks the failure.
        sqlx::query(
            r#"
            INSERT INTO document_info
                (document_id, vendor_name, invoice_number, invoice_date, total_amount,
                 processing_status, error_message, processed_at)
            VALUES ($1, NULL, NULL, NULL, NULL, 'error', $2, NOW())
            ON CONFLICT (document_id) DO UPDATE SET
                vendor_name = EXCLUDED.vendor_name,
                invoice_number = EXCLUDED.invoice_number,
                invoice_date = EXCLUDED.invoice_date,
                total_amount = EXCLUDED.total_amount,
                processing_status = EXCLUDED.processing_status,
                error_message = EXCLUDED.error_message,
                processed_at = EXCLUDED.processed_at
            "#,
        )
        .bind(document_id)
        .bind(error_message)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, document_id: Uuid) -> Result<Option<DocumentInfo>, AppError> {
        self.get_by_document_id(document_id).await
    }

    #[tracing::instrument(skip(self), fields(db.table = "document_info"))]
    async fn set_page_count(&self, document_id: Uuid, page_count: i32) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO document_info (document_id, processing_status, page_count)
            VALUES ($1, 'pending', $2)
            ON CONFLICT (document_id) DO UPDATE SET
                page_count = EXCLUDED.page_count
            "#,
        )
        .bind(document_id)
        .bind(page_count)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
