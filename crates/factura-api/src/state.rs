//! Application state shared by all handlers.

use factura_core::Config;
use factura_db::{
    DepartmentRepository, DocumentInfoRepository, DocumentRepository, EmployeeRepository,
    ProcessingLogRepository,
};
use factura_processing::DocumentPipeline;
use factura_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

/// Everything a handler can need: pool, repositories, storage, and the
/// pipeline with its collaborators already wired up.
pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub storage: Arc<dyn Storage>,
    pub documents: DocumentRepository,
    pub document_info: DocumentInfoRepository,
    pub processing_log: ProcessingLogRepository,
    pub departments: DepartmentRepository,
    pub employees: EmployeeRepository,
    pub pipeline: DocumentPipeline,
}
