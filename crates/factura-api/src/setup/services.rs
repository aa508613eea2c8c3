//! Service and repository wiring.

use crate::state::AppState;
use anyhow::{Context, Result};
use factura_core::Config;
use factura_db::{
    DepartmentRepository, DocumentInfoRepository, DocumentRepository, EmployeeRepository,
    ProcessingLogRepository,
};
use factura_extraction::{HttpExtractorConfig, HttpInvoiceExtractor};
use factura_processing::DocumentPipeline;
use factura_storage::create_storage;
use sqlx::PgPool;
use std::sync::Arc;

/// Build repositories, storage, the extraction client, and the pipeline,
/// and assemble them into the shared application state.
pub async fn initialize_services(config: &Config, pool: PgPool) -> Result<Arc<AppState>> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;
    tracing::info!(backend = %storage.backend_type(), "Storage initialized");

    let extractor = HttpInvoiceExtractor::new(HttpExtractorConfig {
        endpoint: config.extraction_endpoint().to_string(),
        api_key: config.extraction_api_key().map(|s| s.to_string()),
        timeout_seconds: config.extraction_timeout_seconds(),
    })
    .context("Failed to initialize extraction client")?;

    let documents = DocumentRepository::new(pool.clone());
    let document_info = DocumentInfoRepository::new(pool.clone());
    let processing_log = ProcessingLogRepository::new(pool.clone());
    let departments = DepartmentRepository::new(pool.clone());
    let employees = EmployeeRepository::new(pool.clone());

    let pipeline = DocumentPipeline::new(
        storage.clone(),
        Arc::new(extractor),
        Arc::new(document_info.clone()),
        Arc::new(processing_log.clone()),
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        pool,
        storage,
        documents,
        document_info,
        processing_log,
        departments,
        employees,
        pipeline,
    }))
}
