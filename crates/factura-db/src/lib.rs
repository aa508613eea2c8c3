//! Factura Database Library
//!
//! Repository implementations over sqlx/Postgres. One repository per table;
//! the `DocumentInfoRepository` and `ProcessingLogRepository` also implement
//! the pipeline's collaborator traits so the orchestrator can run against
//! them directly.

pub mod db;

pub use db::{
    DepartmentRepository, DocumentInfoRepository, DocumentRepository, EmployeeRepository,
    ProcessingLogRepository,
};
