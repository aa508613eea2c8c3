//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use factura_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Factura API",
        version = "0.1.0",
        description = "Administrative API (v0) for documents, invoices, departments, and employees. Uploaded documents run through an extraction pipeline that pulls invoice fields and records per-step processing logs. All endpoints are versioned under /api/v0/."
    ),
    paths(
        // Documents
        handlers::documents::upload_document,
        handlers::documents::list_documents,
        handlers::documents::get_document,
        handlers::documents::delete_document,
        // Processing
        handlers::processing::process_document,
        handlers::processing::get_document_info,
        handlers::processing::list_processing_logs,
        handlers::processing::get_page_count,
        // Departments
        handlers::departments::create_department,
        handlers::departments::list_departments,
        handlers::departments::get_department,
        handlers::departments::update_department,
        handlers::departments::delete_department,
        // Employees
        handlers::employees::create_employee,
        handlers::employees::list_employees,
        handlers::employees::get_employee,
        handlers::employees::update_employee,
        handlers::employees::delete_employee,
        // Health
        handlers::health::health_check,
    ),
    components(schemas(
        models::DocumentResponse,
        models::DocumentInfoResponse,
        models::ProcessingStatus,
        models::InvoiceFields,
        models::ProcessingLogResponse,
        models::DepartmentResponse,
        models::EmployeeResponse,
        handlers::departments::DepartmentRequest,
        handlers::employees::EmployeeRequest,
        handlers::processing::PageCountResponse,
        handlers::health::HealthResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "documents", description = "Document upload and management"),
        (name = "processing", description = "Invoice extraction pipeline"),
        (name = "departments", description = "Department management"),
        (name = "employees", description = "Employee management"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
