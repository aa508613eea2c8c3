//! Database repositories for data access layer
//!
//! Each repository is responsible for a specific domain entity and provides
//! CRUD operations and specialized queries.

pub mod departments;
pub mod document_info;
pub mod documents;
pub mod employees;
pub mod processing_log;

pub use departments::DepartmentRepository;
pub use document_info::DocumentInfoRepository;
pub use documents::DocumentRepository;
pub use employees::EmployeeRepository;
pub use processing_log::ProcessingLogRepository;
