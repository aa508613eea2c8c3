//! Page-count estimation.
//!
//! Auxiliary to the pipeline: the UI wants a page count next to each
//! document, but extraction does not deliver one. A stored count wins; with
//! none, the file size alone drives a fixed bytes-per-page estimate. The
//! whole path is fail-soft and degrades to 1 page instead of erroring.

use factura_storage::Storage;
use uuid::Uuid;

use crate::stores::DocumentInfoStore;

/// Estimation heuristic: one page per 100 KiB, minimum one page.
pub const BYTES_PER_PAGE: u64 = 100 * 1024;

/// Return the page count for a document, estimating and persisting it on
/// first request. Any failure anywhere degrades to 1.
pub async fn estimate_page_count(
    info_store: &dyn DocumentInfoStore,
    storage: &dyn Storage,
    document_id: &str,
    file_key: &str,
) -> i32 {
    let document_id = match Uuid::parse_str(document_id.trim()) {
        Ok(id) => id,
        Err(_) => return 1,
    };

    // A previously stored count short-circuits the probe.
    match info_store.get(document_id).await {
        Ok(Some(info)) => {
            if let Some(count) = info.page_count.filter(|c| *c > 0) {
                return count;
            }
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(%document_id, error = %e, "Page count lookup failed");
            return 1;
        }
    }

    let size = match storage.content_length(file_key).await {
        Ok(size) => size,
        Err(e) => {
            tracing::warn!(%document_id, key = %file_key, error = %e, "Size probe failed");
            return 1;
        }
    };

    let estimate = size.div_ceil(BYTES_PER_PAGE).max(1) as i32;

    // Persisting the estimate is best-effort; the caller still gets it.
    if let Err(e) = info_store.set_page_count(document_id, estimate).await {
        tracing::warn!(%document_id, error = %e, "Failed to persist page count estimate");
    }

    estimate
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use factura_core::models::{DocumentInfo, InvoiceFields, ProcessingStatus};
    use factura_core::{AppError, StorageBackend};
    use factura_storage::{StorageError, StorageResult};
    use std::sync::Mutex;

    struct FixedSizeStorage {
        size: Option<u64>,
    }

    #[async_trait]
    impl Storage for FixedSizeStorage {
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
            Ok(format!("http://localhost:4000/files/{}", key))
        }

        async fn content_length(&self, key: &str) -> StorageResult<u64> {
            self.size.ok_or_else(|| StorageError::NotFound(key.to_string()))
        }

        async fn exists(&self, _: &str) -> StorageResult<bool> {
            Ok(true)
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::Local
        }
    }

    #[derive(Default)]
    struct StubInfoStore {
        stored_count: Option<i32>,
        saved: Mutex<Option<i32>>,
        fail_get: bool,
    }

    #[async_trait]
    impl DocumentInfoStore for StubInfoStore {
        async fn upsert_completed(
            &self,
            _: Uuid,
            _: &InvoiceFields,
            _: DateTime<Utc>,
        ) -> Result<(), AppError> {
            Ok(())
        }

        async fn upsert_error(&self, _: Uuid, _: &str) -> Result<(), AppError> {
            Ok(())
        }

        async fn get(&self, document_id: Uuid) -> Result<Option<DocumentInfo>, AppError> {
            if self.fail_get {
                return Err(AppError::Internal("db down".to_string()));
            }
            Ok(Some(DocumentInfo {
                document_id,
                vendor_name: None,
                invoice_number: None,
                invoice_date: None,
                total_amount: None,
                processing_status: ProcessingStatus::Pending,
                error_message: None,
                page_count: self.stored_count,
                processed_at: None,
            }))
        }

        async fn set_page_count(&self, _: Uuid, page_count: i32) -> Result<(), AppError> {
            *self.saved.lock().unwrap() = Some(page_count);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_estimate_from_size() {
        let info_store = StubInfoStore::default();
        let storage = FixedSizeStorage {
            size: Some(250_000),
        };
        let id = Uuid::new_v4().to_string();

        // ceil(250000 / 102400) = 3
        let count = estimate_page_count(&info_store, &storage, &id, "documents/a.pdf").await;
        assert_eq!(count, 3);
        assert_eq!(*info_store.saved.lock().unwrap(), Some(3));
    }

    #[tokio::test]
    async fn test_small_file_is_one_page() {
        let info_store = StubInfoStore::default();
        let storage = FixedSizeStorage { size: Some(1) };
        let id = Uuid::new_v4().to_string();

        let count = estimate_page_count(&info_store, &storage, &id, "documents/a.pdf").await;
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_stored_count_short_circuits_probe() {
        let info_store = StubInfoStore {
            stored_count: Some(42),
            ..Default::default()
        };
        // Storage would fail, but it must not be consulted.
        let storage = FixedSizeStorage { size: None };
        let id = Uuid::new_v4().to_string();

        let count = estimate_page_count(&info_store, &storage, &id, "documents/a.pdf").await;
        assert_eq!(count, 42);
        assert!(info_store.saved.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failures_degrade_to_one() {
        let id = Uuid::new_v4().to_string();

        // Size probe failure
        let count = estimate_page_count(
            &StubInfoStore::default(),
            &FixedSizeStorage { size: None },
            &id,
            "documents/a.pdf",
        )
        .await;
        assert_eq!(count, 1);

        // Lookup failure
        let count = estimate_page_count(
            &StubInfoStore {
                fail_get: true,
                ..Default::default()
            },
            &FixedSizeStorage {
                size: Some(250_000),
            },
            &id,
            "documents/a.pdf",
        )
        .await;
        assert_eq!(count, 1);

        // Bad identifier
        let count = estimate_page_count(
            &StubInfoStore::default(),
            &FixedSizeStorage {
                size: Some(250_000),
            },
            "not-a-uuid",
            "documents/a.pdf",
        )
        .await;
        assert_eq!(count, 1);
    }
}
