//! Factura Processing Library
//!
//! The document processing pipeline: resolve the file URL, call the
//! extraction service, validate the extracted fields, persist the result, and
//! log every status transition. Collaborators are traits so the orchestrator
//! runs the same against Postgres-backed repositories or test doubles.

pub mod pages;
pub mod pipeline;
pub mod stores;

pub use pages::{estimate_page_count, BYTES_PER_PAGE};
pub use pipeline::{DocumentPipeline, PipelineOutcome};
pub use stores::{DocumentInfoStore, ProcessingLogStore};
