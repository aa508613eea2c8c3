//! Document repository: CRUD for the documents table.

use chrono::{DateTime, Utc};
use factura_core::models::Document;
use factura_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Row type for the documents table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub name: String,
    pub original_filename: String,
    pub file_keys: Vec<String>,
    pub content_type: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentRow {
    pub fn to_document(self) -> Document {
        Document {
            id: self.id,
            name: self.name,
            original_filename: self.original_filename,
            file_keys: self.file_keys,
            content_type: self.content_type,
            file_size: self.file_size,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for the documents table.
#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new document and return it.
    #[tracing::instrument(skip(self), fields(db.table = "documents"))]
    pub async fn create(
        &self,
        name: String,
        original_filename: String,
        file_keys: Vec<String>,
        content_type: String,
        file_size: i64,
    ) -> Result<Document, AppError> {
        let row: DocumentRow = sqlx::query_as::<Postgres, DocumentRow>(
            r#"
            INSERT INTO documents (name, original_filename, file_keys, content_type, file_size)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, original_filename, file_keys, content_type, file_size,
                      created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&original_filename)
        .bind(&file_keys)
        .bind(&content_type)
        .bind(file_size)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.to_document())
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents"))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        let row: Option<DocumentRow> = sqlx::query_as::<Postgres, DocumentRow>(
            r#"
            SELECT id, name, original_filename, file_keys, content_type, file_size,
                   created_at, updated_at
            FROM documents
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(DocumentRow::to_document))
    }

    /// List documents, newest first.
    #[tracing::instrument(skip(self), fields(db.table = "documents"))]
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Document>, AppError> {
        let rows: Vec<DocumentRow> = sqlx::query_as::<Postgres, DocumentRow>(
            r#"
            SELECT id, name, original_filename, file_keys, content_type, file_size,
                   created_at, updated_at
            FROM documents
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(DocumentRow::to_document).collect())
    }

    /// Delete a document; document_info and processing_log rows cascade.
    /// Returns true if a row was deleted.
    #[tracing::instrument(skip(self), fields(db.table = "documents"))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
