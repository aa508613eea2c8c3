//! Invoice extraction client for the external document-understanding API

use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

/// Fields the extraction service returns for an invoice. The date stays free
/// text here; normalization happens in the pipeline so a bad date can be
/// reported with the original string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedInvoice {
    #[serde(default)]
    pub vendor_name: Option<String>,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub invoice_date: Option<String>,
    #[serde(default)]
    pub total_amount: Option<Decimal>,
}

/// Extraction collaborator seam.
///
/// `Ok(None)` means the service answered but produced no data for the file;
/// the pipeline treats that as an extraction failure.
#[async_trait]
pub trait InvoiceExtractor: Send + Sync {
    async fn extract(&self, file_url: &str) -> Result<Option<ExtractedInvoice>>;
}

/// Extraction client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpExtractorConfig {
    /// Endpoint of the extraction service, e.g. "https://extract.example.com/v1/parse"
    pub endpoint: String,
    /// Bearer token, if the service requires one
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    60
}

/// HTTP implementation of the extraction collaborator
pub struct HttpInvoiceExtractor {
    http_client: reqwest::Client,
    config: HttpExtractorConfig,
}

impl Debug for HttpInvoiceExtractor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("HttpInvoiceExtractor")
            .field("endpoint", &self.config.endpoint)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ExtractionResponse {
    #[serde(default)]
    data: Option<ExtractedInvoice>,
}

impl HttpInvoiceExtractor {
    pub fn new(config: HttpExtractorConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client for extraction service")?;

        Ok(Self {
            http_client,
            config,
        })
    }
}

#[async_trait]
impl InvoiceExtractor for HttpInvoiceExtractor {
    async fn extract(&self, file_url: &str) -> Result<Option<ExtractedInvoice>> {
        let request_body = json!({ "file_url": file_url });

        let mut request = self
            .http_client
            .post(&self.config.endpoint)
            .header("Content-Type", "application/json")
            .json(&request_body);

        if let Some(ref api_key) = self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let start = std::time::Instant::now();
        let response = request
            .send()
            .await
            .context("Failed to send request to extraction service")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Extraction service request failed: {} - {}",
                status,
                error_text
            ));
        }

        let extraction: ExtractionResponse = response
            .json()
            .await
            .context("Failed to parse extraction service response")?;

        tracing::info!(
            has_data = extraction.data.is_some(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Extraction request completed"
        );

        Ok(extraction.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_response_with_data() {
        let body = r#"{
            "data": {
                "vendor_name": "ACME GmbH",
                "invoice_number": "INV-2024-001",
                "invoice_date": "15.03.2024",
                "total_amount": 1234.56
            }
        }"#;
        let parsed: ExtractionResponse = serde_json::from_str(body).unwrap();
        let invoice = parsed.data.unwrap();
        assert_eq!(invoice.vendor_name.as_deref(), Some("ACME GmbH"));
        assert_eq!(invoice.invoice_number.as_deref(), Some("INV-2024-001"));
        assert_eq!(invoice.invoice_date.as_deref(), Some("15.03.2024"));
        assert_eq!(
            invoice.total_amount,
            Some(Decimal::from_str("1234.56").unwrap())
        );
    }

    #[test]
    fn test_response_without_data() {
        let parsed: ExtractionResponse = serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert!(parsed.data.is_none());
        let parsed: ExtractionResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.data.is_none());
    }

    #[test]
    fn test_partial_fields_default_to_none() {
        let body = r#"{"data": {"vendor_name": "ACME GmbH"}}"#;
        let parsed: ExtractionResponse = serde_json::from_str(body).unwrap();
        let invoice = parsed.data.unwrap();
        assert!(invoice.invoice_number.is_none());
        assert!(invoice.invoice_date.is_none());
        assert!(invoice.total_amount.is_none());
    }

    #[test]
    fn test_config_defaults() {
        let config: HttpExtractorConfig =
            serde_json::from_str(r#"{"endpoint": "https://extract.example.com/v1/parse"}"#)
                .unwrap();
        assert_eq!(config.timeout_seconds, 60);
        assert!(config.api_key.is_none());
    }
}
