//! Document processing orchestrator.
//!
//! One invocation runs the full chain for a single document: log the start,
//! resolve the file URL, call the extraction service, normalize the date,
//! upsert the result, log the outcome. Every failure is caught at the top
//! level and turned into a structured outcome; nothing escapes the
//! orchestrator boundary.

use chrono::Utc;
use factura_core::models::{InvoiceFields, ProcessingStatus};
use factura_core::{normalize_date, AppError};
use factura_extraction::InvoiceExtractor;
use factura_storage::Storage;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::stores::{DocumentInfoStore, ProcessingLogStore};

/// Result returned to callers. Failures carry a human-readable message; the
/// same message is persisted on the document's record and in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PipelineOutcome {
    fn ok() -> Self {
        PipelineOutcome {
            success: true,
            error: None,
        }
    }

    fn failed(message: String) -> Self {
        PipelineOutcome {
            success: false,
            error: Some(message),
        }
    }
}

/// The processing pipeline with its four collaborators.
#[derive(Clone)]
pub struct DocumentPipeline {
    storage: Arc<dyn Storage>,
    extractor: Arc<dyn InvoiceExtractor>,
    info_store: Arc<dyn DocumentInfoStore>,
    log_store: Arc<dyn ProcessingLogStore>,
}

impl DocumentPipeline {
    pub fn new(
        storage: Arc<dyn Storage>,
        extractor: Arc<dyn InvoiceExtractor>,
        info_store: Arc<dyn DocumentInfoStore>,
        log_store: Arc<dyn ProcessingLogStore>,
    ) -> Self {
        Self {
            storage,
            extractor,
            info_store,
            log_store,
        }
    }

    /// Process one document file end to end.
    ///
    /// Never returns an error and never panics: failures come back as
    /// `PipelineOutcome { success: false, .. }` after the error has been
    /// logged and reflected on the document's record.
    #[tracing::instrument(skip(self))]
    pub async fn process_document(&self, document_id: &str, file_key: &str) -> PipelineOutcome {
        // Input validation happens before any collaborator call.
        let trimmed = document_id.trim();
        if trimmed.is_empty() {
            return PipelineOutcome::failed(
                AppError::InvalidInput("document identifier is empty".to_string()).to_string(),
            );
        }
        let document_id = match Uuid::parse_str(trimmed) {
            Ok(id) => id,
            Err(e) => {
                return PipelineOutcome::failed(
                    AppError::InvalidInput(format!("invalid document identifier: {}", e))
                        .to_string(),
                )
            }
        };

        let start = Instant::now();

        match self.run(document_id, file_key).await {
            Ok(fields) => {
                tracing::info!(
                    %document_id,
                    vendor = fields.vendor_name.as_deref().unwrap_or(""),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Document processed"
                );
                PipelineOutcome::ok()
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(
                    %document_id,
                    error = %message,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Document processing failed"
                );
                self.record_failure(document_id, &message, start).await;
                PipelineOutcome::failed(message)
            }
        }
    }

    /// The sequential chain. Any error here is handled by the caller's
    /// outer catch; the `processing` log write is deliberately strict.
    async fn run(&self, document_id: Uuid, file_key: &str) -> Result<InvoiceFields, AppError> {
        let start = Instant::now();

        self.log_store
            .append(
                document_id,
                ProcessingStatus::Processing,
                "processing started",
                json!({ "file_key": file_key }),
                None,
            )
            .await?;

        let file_url = self
            .storage
            .public_url(file_key)
            .await
            .map_err(|e| AppError::UrlResolution(e.to_string()))?;

        let extracted = self
            .extractor
            .extract(&file_url)
            .await
            .map_err(|e| AppError::Extraction(e.to_string()))?
            .ok_or_else(|| {
                AppError::Extraction("extraction service returned no data".to_string())
            })?;

        let invoice_date = match extracted.invoice_date.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => match normalize_date(text) {
                Some(date) => Some(date),
                None => return Err(AppError::DateFormat(text.to_string())),
            },
            _ => None,
        };

        let fields = InvoiceFields {
            vendor_name: extracted.vendor_name,
            invoice_number: extracted.invoice_number,
            invoice_date,
            total_amount: extracted.total_amount,
        };

        self.info_store
            .upsert_completed(document_id, &fields, Utc::now())
            .await?;

        self.log_store
            .append(
                document_id,
                ProcessingStatus::Completed,
                "processing completed",
                json!({
                    "elapsed_ms": start.elapsed().as_millis() as u64,
                    "fields": fields,
                }),
                None,
            )
            .await?;

        Ok(fields)
    }

    /// Error-path side effects. Both writes are best-effort: the outer catch
    /// must never itself fail, so persistence errors here are only logged.
    async fn record_failure(&self, document_id: Uuid, message: &str, start: Instant) {
        if let Err(e) = self
            .log_store
            .append(
                document_id,
                ProcessingStatus::Error,
                "processing failed",
                json!({ "elapsed_ms": start.elapsed().as_millis() as u64 }),
                Some(message),
            )
            .await
        {
            tracing::warn!(%document_id, error = %e, "Failed to append error log entry");
        }

        if let Err(e) = self.info_store.upsert_error(document_id, message).await {
            tracing::warn!(%document_id, error = %e, "Failed to upsert error record");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, NaiveDate};
    use factura_core::models::DocumentInfo;
    use factura_core::StorageBackend;
    use factura_extraction::ExtractedInvoice;
    use factura_storage::{StorageError, StorageResult};
    use serde_json::Value as JsonValue;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockStorage {
        url_calls: AtomicUsize,
        fail_url: bool,
    }

    #[async_trait]
    impl Storage for MockStorage {
        async fn upload(&self, _: &str, _: &str, _: Vec<u8>) -> StorageResult<String> {
            Ok("documents/test.pdf".to_string())
        }

        async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
            Err(StorageError::NotFound(key.to_string()))
        }

        async fn delete(&self, _: &str) -> StorageResult<()> {
            Ok(())
        }

        async fn public_url(&self, key: &str) -> StorageResult<String> {
            self.url_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_url {
                Err(StorageError::NotFound(key.to_string()))
            } else {
                Ok(format!("http://localhost:4000/files/{}", key))
            }
        }

        async fn content_length(&self, _: &str) -> StorageResult<u64> {
            Ok(0)
        }

        async fn exists(&self, _: &str) -> StorageResult<bool> {
            Ok(true)
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::Local
        }
    }

    enum MockExtraction {
        Invoice(ExtractedInvoice),
        NoData,
        Failure,
    }

    struct MockExtractor {
        calls: AtomicUsize,
        result: MockExtraction,
    }

    impl MockExtractor {
        fn returning(result: MockExtraction) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                result,
            }
        }
    }

    #[async_trait]
    impl InvoiceExtractor for MockExtractor {
        async fn extract(&self, _file_url: &str) -> anyhow::Result<Option<ExtractedInvoice>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.result {
                MockExtraction::Invoice(invoice) => Ok(Some(invoice.clone())),
                MockExtraction::NoData => Ok(None),
                MockExtraction::Failure => Err(anyhow::anyhow!("upstream 503")),
            }
        }
    }

    /// Keyed map mimicking the upsert table, plus a write counter.
    #[derive(Default)]
    struct MockInfoStore {
        records: Mutex<HashMap<Uuid, DocumentInfo>>,
        upserts: AtomicUsize,
    }

    impl MockInfoStore {
        fn record(&self, document_id: Uuid) -> Option<DocumentInfo> {
            self.records.lock().unwrap().get(&document_id).cloned()
        }

        fn record_count(&self) -> usize {
            self.records.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl DocumentInfoStore for MockInfoStore {
        async fn upsert_completed(
            &self,
            document_id: Uuid,
            fields: &InvoiceFields,
            processed_at: DateTime<Utc>,
        ) -> Result<(), AppError> {
            self.upserts.fetch_add(1, Ordering::SeqCst);
            self.records.lock().unwrap().insert(
                document_id,
                DocumentInfo {
                    document_id,
                    vendor_name: fields.vendor_name.clone(),
                    invoice_number: fields.invoice_number.clone(),
                    invoice_date: fields.invoice_date,
                    total_amount: fields.total_amount,
                    processing_status: ProcessingStatus::Completed,
                    error_message: None,
                    page_count: None,
                    processed_at: Some(processed_at),
                },
            );
            Ok(())
        }

        async fn upsert_error(
            &self,
            document_id: Uuid,
            error_message: &str,
        ) -> Result<(), AppError> {
            self.upserts.fetch_add(1, Ordering::SeqCst);
            self.records.lock().unwrap().insert(
                document_id,
                DocumentInfo {
                    document_id,
                    vendor_name: None,
                    invoice_number: None,
                    invoice_date: None,
                    total_amount: None,
                    processing_status: ProcessingStatus::Error,
                    error_message: Some(error_message.to_string()),
                    page_count: None,
                    processed_at: Some(Utc::now()),
                },
            );
            Ok(())
        }

        async fn get(&self, document_id: Uuid) -> Result<Option<DocumentInfo>, AppError> {
            Ok(self.record(document_id))
        }

        async fn set_page_count(&self, document_id: Uuid, page_count: i32) -> Result<(), AppError> {
            if let Some(info) = self.records.lock().unwrap().get_mut(&document_id) {
                info.page_count = Some(page_count);
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockLogStore {
        entries: Mutex<Vec<(ProcessingStatus, String, Option<String>)>>,
        fail_appends: bool,
    }

    impl MockLogStore {
        fn entries(&self) -> Vec<(ProcessingStatus, String, Option<String>)> {
            self.entries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProcessingLogStore for MockLogStore {
        async fn append(
            &self,
            _document_id: Uuid,
            status: ProcessingStatus,
            step: &str,
            _detail: JsonValue,
            error_message: Option<&str>,
        ) -> Result<(), AppError> {
            if self.fail_appends {
                return Err(AppError::Internal("log table unavailable".to_string()));
            }
            self.entries.lock().unwrap().push((
                status,
                step.to_string(),
                error_message.map(String::from),
            ));
            Ok(())
        }
    }

    struct Harness {
        pipeline: DocumentPipeline,
        storage: Arc<MockStorage>,
        extractor: Arc<MockExtractor>,
        info_store: Arc<MockInfoStore>,
        log_store: Arc<MockLogStore>,
    }

    fn harness(storage: MockStorage, extraction: MockExtraction, log_store: MockLogStore) -> Harness {
        let storage = Arc::new(storage);
        let extractor = Arc::new(MockExtractor::returning(extraction));
        let info_store = Arc::new(MockInfoStore::default());
        let log_store = Arc::new(log_store);
        let pipeline = DocumentPipeline::new(
            storage.clone(),
            extractor.clone(),
            info_store.clone(),
            log_store.clone(),
        );
        Harness {
            pipeline,
            storage,
            extractor,
            info_store,
            log_store,
        }
    }

    fn sample_invoice() -> ExtractedInvoice {
        ExtractedInvoice {
            vendor_name: Some("ACME GmbH".to_string()),
            invoice_number: Some("INV-2024-001".to_string()),
            invoice_date: Some("15.03.2024".to_string()),
            total_amount: Some("1234.56".parse().unwrap()),
        }
    }

    #[tokio::test]
    async fn test_happy_path_completes_and_persists() {
        let h = harness(
            MockStorage::default(),
            MockExtraction::Invoice(sample_invoice()),
            MockLogStore::default(),
        );
        let id = Uuid::new_v4();

        let outcome = h
            .pipeline
            .process_document(&id.to_string(), "documents/a.pdf")
            .await;

        assert!(outcome.success);
        assert!(outcome.error.is_none());

        let record = h.info_store.record(id).expect("record written");
        assert_eq!(record.processing_status, ProcessingStatus::Completed);
        assert_eq!(record.vendor_name.as_deref(), Some("ACME GmbH"));
        assert_eq!(
            record.invoice_date,
            Some(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
        assert!(record.error_message.is_none());

        let entries = h.log_store.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, ProcessingStatus::Processing);
        assert_eq!(entries[1].0, ProcessingStatus::Completed);
    }

    #[tokio::test]
    async fn test_empty_id_fails_without_collaborator_calls() {
        let h = harness(
            MockStorage::default(),
            MockExtraction::Invoice(sample_invoice()),
            MockLogStore::default(),
        );

        for id in ["", "   "] {
            let outcome = h.pipeline.process_document(id, "documents/a.pdf").await;
            assert!(!outcome.success);
            assert!(outcome.error.unwrap().contains("empty"));
        }

        assert_eq!(h.storage.url_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.extractor.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.info_store.upserts.load(Ordering::SeqCst), 0);
        assert!(h.log_store.entries().is_empty());
    }

    #[tokio::test]
    async fn test_url_resolution_failure_marks_error() {
        let h = harness(
            MockStorage {
                fail_url: true,
                ..Default::default()
            },
            MockExtraction::Invoice(sample_invoice()),
            MockLogStore::default(),
        );
        let id = Uuid::new_v4();

        let outcome = h
            .pipeline
            .process_document(&id.to_string(), "documents/gone.pdf")
            .await;

        assert!(!outcome.success);
        let record = h.info_store.record(id).expect("error record written");
        assert_eq!(record.processing_status, ProcessingStatus::Error);
        assert_eq!(h.extractor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_extractor_no_data_persists_error_status() {
        let h = harness(
            MockStorage::default(),
            MockExtraction::NoData,
            MockLogStore::default(),
        );
        let id = Uuid::new_v4();

        let outcome = h
            .pipeline
            .process_document(&id.to_string(), "documents/a.pdf")
            .await;

        assert!(!outcome.success);
        let message = outcome.error.unwrap();
        assert!(!message.is_empty());

        let record = h.info_store.record(id).expect("error record written");
        assert_eq!(record.processing_status, ProcessingStatus::Error);
        assert_eq!(record.error_message.as_deref(), Some(message.as_str()));

        let entries = h.log_store.entries();
        assert_eq!(entries.last().unwrap().0, ProcessingStatus::Error);
    }

    #[tokio::test]
    async fn test_unparseable_date_fails_with_offending_string() {
        let h = harness(
            MockStorage::default(),
            MockExtraction::Invoice(ExtractedInvoice {
                invoice_date: Some("not-a-date".to_string()),
                ..sample_invoice()
            }),
            MockLogStore::default(),
        );
        let id = Uuid::new_v4();

        let outcome = h
            .pipeline
            .process_document(&id.to_string(), "documents/a.pdf")
            .await;

        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("not-a-date"));

        // No completed record; only the error marker.
        let record = h.info_store.record(id).expect("error record written");
        assert_eq!(record.processing_status, ProcessingStatus::Error);
        assert!(record.vendor_name.is_none());
    }

    #[tokio::test]
    async fn test_missing_date_is_not_an_error() {
        let h = harness(
            MockStorage::default(),
            MockExtraction::Invoice(ExtractedInvoice {
                invoice_date: None,
                ..sample_invoice()
            }),
            MockLogStore::default(),
        );
        let id = Uuid::new_v4();

        let outcome = h
            .pipeline
            .process_document(&id.to_string(), "documents/a.pdf")
            .await;

        assert!(outcome.success);
        let record = h.info_store.record(id).unwrap();
        assert_eq!(record.processing_status, ProcessingStatus::Completed);
        assert!(record.invoice_date.is_none());
    }

    #[tokio::test]
    async fn test_extractor_failure_is_caught() {
        let h = harness(
            MockStorage::default(),
            MockExtraction::Failure,
            MockLogStore::default(),
        );
        let id = Uuid::new_v4();

        let outcome = h
            .pipeline
            .process_document(&id.to_string(), "documents/a.pdf")
            .await;

        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("upstream 503"));
    }

    #[tokio::test]
    async fn test_repeated_success_keeps_single_record() {
        let h = harness(
            MockStorage::default(),
            MockExtraction::Invoice(sample_invoice()),
            MockLogStore::default(),
        );
        let id = Uuid::new_v4();

        let first = h
            .pipeline
            .process_document(&id.to_string(), "documents/a.pdf")
            .await;
        let second = h
            .pipeline
            .process_document(&id.to_string(), "documents/a.pdf")
            .await;

        assert!(first.success && second.success);
        assert_eq!(h.info_store.upserts.load(Ordering::SeqCst), 2);
        assert_eq!(h.info_store.record_count(), 1);
    }

    #[tokio::test]
    async fn test_initial_log_failure_fails_the_attempt() {
        let h = harness(
            MockStorage::default(),
            MockExtraction::Invoice(sample_invoice()),
            MockLogStore {
                fail_appends: true,
                ..Default::default()
            },
        );
        let id = Uuid::new_v4();

        let outcome = h
            .pipeline
            .process_document(&id.to_string(), "documents/a.pdf")
            .await;

        // Strict logging: the attempt fails, and even though the error-path
        // writes also fail, the outcome still comes back structured.
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("log table unavailable"));
        assert_eq!(h.extractor.calls.load(Ordering::SeqCst), 0);
    }
}
