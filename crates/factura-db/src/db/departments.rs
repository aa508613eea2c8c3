//! Department repository: CRUD for the departments table.

use chrono::{DateTime, Utc};
use factura_core::models::Department;
use factura_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub struct DepartmentRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DepartmentRow {
    pub fn to_department(self) -> Department {
        Department {
            id: self.id,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct DepartmentRepository {
    pool: PgPool,
}

impl DepartmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "departments"))]
    pub async fn create(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<Department, AppError> {
        let row: DepartmentRow = sqlx::query_as::<Postgres, DepartmentRow>(
            r#"
            INSERT INTO departments (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.to_department())
    }

    #[tracing::instrument(skip(self), fields(db.table = "departments"))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Department>, AppError> {
        let row: Option<DepartmentRow> = sqlx::query_as::<Postgres, DepartmentRow>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM departments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(DepartmentRow::to_department))
    }

    #[tracing::instrument(skip(self), fields(db.table = "departments"))]
    pub async fn list(&self) -> Result<Vec<Department>, AppError> {
        let rows: Vec<DepartmentRow> = sqlx::query_as::<Postgres, DepartmentRow>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM departments
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(DepartmentRow::to_department).collect())
    }

    /// Update name/description; returns the updated row, or None if absent.
    #[tracing::instrument(skip(self), fields(db.table = "departments"))]
    pub async fn update(
        &self,
        id: Uuid,
        name: String,
        description: Option<String>,
    ) -> Result<Option<Department>, AppError> {
        let row: Option<DepartmentRow> = sqlx::query_as::<Postgres, DepartmentRow>(
            r#"
            UPDATE departments
            SET name = $2, description = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&name)
        .bind(&description)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(DepartmentRow::to_department))
    }

    #[tracing::instrument(skip(self), fields(db.table = "departments"))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
