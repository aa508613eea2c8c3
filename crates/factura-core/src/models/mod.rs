//! Data models for the application
//!
//! This module contains all data structures used throughout the application,
//! organized by domain. Each sub-module represents a specific feature area.

mod department;
mod document;
mod document_info;
mod employee;
mod processing_log;

// Re-export all models for convenient imports
pub use department::*;
pub use document::*;
pub use document_info::*;
pub use employee::*;
pub use processing_log::*;
