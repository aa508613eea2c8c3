//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use factura_core::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait.
/// This allows the document pipeline and the API to work with any backend
/// without coupling to specific implementation details.
///
/// **Key format:** `documents/{uuid}_{filename}`; see the crate root
/// documentation. Keys must not contain `..` or a leading `/`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload a file and return its storage key.
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<String>;

    /// Download a file by its storage key
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Delete a file by its storage key
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Resolve a storage key to a fetchable URL.
    ///
    /// The returned URL must be reachable by external services (the
    /// extraction client passes it on). Fails with `NotFound` when the key
    /// does not reference a stored file.
    async fn public_url(&self, storage_key: &str) -> StorageResult<String>;

    /// Get the size in bytes of an object, if it exists.
    ///
    /// This is a metadata probe only; backends must not fetch the content.
    async fn content_length(&self, storage_key: &str) -> StorageResult<u64>;

    /// Check if a file exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
