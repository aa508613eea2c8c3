//! Employee repository: CRUD for the employees table.

use chrono::{DateTime, Utc};
use factura_core::models::Employee;
use factura_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub struct EmployeeRow {
    pub id: Uuid,
    pub department_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmployeeRow {
    pub fn to_employee(self) -> Employee {
        Employee {
            id: self.id,
            department_id: self.department_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "employees"))]
    pub async fn create(
        &self,
        department_id: Option<Uuid>,
        first_name: String,
        last_name: String,
        email: String,
        role: Option<String>,
    ) -> Result<Employee, AppError> {
        let row: EmployeeRow = sqlx::query_as::<Postgres, EmployeeRow>(
            r#"
            INSERT INTO employees (department_id, first_name, last_name, email, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, department_id, first_name, last_name, email, role,
                      created_at, updated_at
            "#,
        )
        .bind(department_id)
        .bind(&first_name)
        .bind(&last_name)
        .bind(&email)
        .bind(&role)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.to_employee())
    }

    #[tracing::instrument(skip(self), fields(db.table = "employees"))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Employee>, AppError> {
        let row: Option<EmployeeRow> = sqlx::query_as::<Postgres, EmployeeRow>(
            r#"
            SELECT id, department_id, first_name, last_name, email, role,
                   created_at, updated_at
            FROM employees
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(EmployeeRow::to_employee))
    }

    /// List employees, optionally filtered by department.
    #[tracing::instrument(skip(self), fields(db.table = "employees"))]
    pub async fn list(&self, department_id: Option<Uuid>) -> Result<Vec<Employee>, AppError> {
        let rows: Vec<EmployeeRow> = sqlx::query_as::<Postgres, EmployeeRow>(
            r#"
            SELECT id, department_id, first_name, last_name, email, role,
                   created_at, updated_at
            FROM employees
            WHERE ($1::uuid IS NULL OR department_id = $1)
            ORDER BY last_name ASC, first_name ASC
            "#,
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(EmployeeRow::to_employee).collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "employees"))]
    pub async fn update(
        &self,
        id: Uuid,
        department_id: Option<Uuid>,
        first_name: String,
        last_name: String,
        email: String,
        role: Option<String>,
    ) -> Result<Option<Employee>, AppError> {
        let row: Option<EmployeeRow> = sqlx::query_as::<Postgres, EmployeeRow>(
            r#"
            UPDATE employees
            SET department_id = $2, first_name = $3, last_name = $4, email = $5,
                role = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING id, department_id, first_name, last_name, email, role,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(department_id)
        .bind(&first_name)
        .bind(&last_name)
        .bind(&email)
        .bind(&role)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(EmployeeRow::to_employee))
    }

    #[tracing::instrument(skip(self), fields(db.table = "employees"))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
