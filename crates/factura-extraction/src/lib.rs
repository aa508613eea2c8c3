//! Factura Extraction Library
//!
//! HTTP client for the external document-understanding service. The service
//! receives a fetchable file URL and answers with structured invoice fields;
//! this crate exposes that behind the `InvoiceExtractor` trait so the
//! pipeline can be tested with a substitute.

mod client;

pub use client::{ExtractedInvoice, HttpExtractorConfig, HttpInvoiceExtractor, InvoiceExtractor};
