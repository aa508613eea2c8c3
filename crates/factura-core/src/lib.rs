//! Factura Core Library
//!
//! This crate provides core domain models, error types, configuration, and
//! date normalization that are shared across all Factura components.

pub mod config;
pub mod dates;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use dates::normalize_date;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
