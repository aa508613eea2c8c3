//! Configuration module
//!
//! Environment-driven configuration for the API and pipeline, including
//! database, storage, and extraction service settings.

use std::env;

use crate::storage_types::StorageBackend;

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const IDLE_TIMEOUT_SECS: u64 = 600;
const MAX_LIFETIME_SECS: u64 = 1800;
const MAX_DOCUMENT_SIZE_MB: usize = 50;
const EXTRACTION_TIMEOUT_SECS: u64 = 60;

/// Application configuration, loaded once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub db_idle_timeout_seconds: u64,
    pub db_max_lifetime_seconds: u64,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Extraction service configuration
    pub extraction_endpoint: String,
    pub extraction_api_key: Option<String>,
    pub extraction_timeout_seconds: u64,
    // Upload limits
    pub max_document_size_bytes: usize,
    pub document_allowed_extensions: Vec<String>,
    pub document_allowed_content_types: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let storage_backend =
            env::var("STORAGE_BACKEND")
                .ok()
                .and_then(|s| match s.to_lowercase().as_str() {
                    "s3" => Some(StorageBackend::S3),
                    "local" => Some(StorageBackend::Local),
                    _ => None,
                });

        let max_document_size_mb = env::var("MAX_DOCUMENT_SIZE_MB")
            .unwrap_or_else(|_| MAX_DOCUMENT_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_DOCUMENT_SIZE_MB);

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            db_idle_timeout_seconds: env::var("DB_IDLE_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| IDLE_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(IDLE_TIMEOUT_SECS),
            db_max_lifetime_seconds: env::var("DB_MAX_LIFETIME_SECONDS")
                .unwrap_or_else(|_| MAX_LIFETIME_SECS.to_string())
                .parse()
                .unwrap_or(MAX_LIFETIME_SECS),
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            extraction_endpoint: env::var("EXTRACTION_ENDPOINT")
                .map_err(|_| anyhow::anyhow!("EXTRACTION_ENDPOINT must be set"))?,
            extraction_api_key: env::var("EXTRACTION_API_KEY").ok(),
            extraction_timeout_seconds: env::var("EXTRACTION_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| EXTRACTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(EXTRACTION_TIMEOUT_SECS),
            max_document_size_bytes: max_document_size_mb * 1024 * 1024,
            document_allowed_extensions: env::var("DOCUMENT_ALLOWED_EXTENSIONS")
                .unwrap_or_else(|_| "pdf,png,jpg,jpeg,tiff".to_string())
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .collect(),
            document_allowed_content_types: env::var("DOCUMENT_ALLOWED_CONTENT_TYPES")
                .unwrap_or_else(|_| {
                    "application/pdf,image/png,image/jpeg,image/tiff".to_string()
                })
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .collect(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Cross-field validation; called from `from_env` but also usable on
    /// hand-built configs in tests.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.storage_backend {
            Some(StorageBackend::S3) => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!("S3_BUCKET must be set for the s3 backend"));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set for the s3 backend"
                    ));
                }
            }
            Some(StorageBackend::Local) => {
                if self.local_storage_path.is_none() || self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL must be set for the local backend"
                    ));
                }
            }
            None => {}
        }
        if self.max_document_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_DOCUMENT_SIZE_MB must be positive"));
        }
        if self.db_max_lifetime_seconds < self.db_idle_timeout_seconds {
            return Err(anyhow::anyhow!(
                "DB_MAX_LIFETIME_SECONDS must be at least DB_IDLE_TIMEOUT_SECONDS"
            ));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.db_timeout_seconds
    }

    pub fn db_idle_timeout_seconds(&self) -> u64 {
        self.db_idle_timeout_seconds
    }

    pub fn db_max_lifetime_seconds(&self) -> u64 {
        self.db_max_lifetime_seconds
    }

    pub fn storage_backend(&self) -> Option<StorageBackend> {
        self.storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.local_storage_base_url.as_deref()
    }

    pub fn extraction_endpoint(&self) -> &str {
        &self.extraction_endpoint
    }

    pub fn extraction_api_key(&self) -> Option<&str> {
        self.extraction_api_key.as_deref()
    }

    pub fn extraction_timeout_seconds(&self) -> u64 {
        self.extraction_timeout_seconds
    }

    pub fn max_document_size_bytes(&self) -> usize {
        self.max_document_size_bytes
    }

    pub fn document_allowed_extensions(&self) -> &[String] {
        &self.document_allowed_extensions
    }

    pub fn document_allowed_content_types(&self) -> &[String] {
        &self.document_allowed_content_types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            server_port: 4000,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            database_url: "postgres://localhost/factura".to_string(),
            db_max_connections: MAX_CONNECTIONS,
            db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
            db_idle_timeout_seconds: IDLE_TIMEOUT_SECS,
            db_max_lifetime_seconds: MAX_LIFETIME_SECS,
            storage_backend: None,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            local_storage_path: None,
            local_storage_base_url: None,
            extraction_endpoint: "https://extract.example.com/v1/parse".to_string(),
            extraction_api_key: None,
            extraction_timeout_seconds: EXTRACTION_TIMEOUT_SECS,
            max_document_size_bytes: 50 * 1024 * 1024,
            document_allowed_extensions: vec!["pdf".to_string()],
            document_allowed_content_types: vec!["application/pdf".to_string()],
        }
    }

    #[test]
    fn test_validate_ok_without_backend() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_s3_requires_bucket_and_region() {
        let mut config = base_config();
        config.storage_backend = Some(StorageBackend::S3);
        assert!(config.validate().is_err());

        config.s3_bucket = Some("invoices".to_string());
        assert!(config.validate().is_err());

        config.s3_region = Some("eu-west-1".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_pool_lifetime_covers_idle_timeout() {
        let mut config = base_config();
        config.db_idle_timeout_seconds = 900;
        config.db_max_lifetime_seconds = 300;
        assert!(config.validate().is_err());

        config.db_max_lifetime_seconds = 900;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_local_requires_path_and_url() {
        let mut config = base_config();
        config.storage_backend = Some(StorageBackend::Local);
        assert!(config.validate().is_err());

        config.local_storage_path = Some("/var/lib/factura/files".to_string());
        config.local_storage_base_url = Some("http://localhost:4000/files".to_string());
        assert!(config.validate().is_ok());
    }
}
