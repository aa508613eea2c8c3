use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

/// Processing status for a document's extraction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "processing_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

impl Display for ProcessingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ProcessingStatus::Pending => write!(f, "pending"),
            ProcessingStatus::Processing => write!(f, "processing"),
            ProcessingStatus::Completed => write!(f, "completed"),
            ProcessingStatus::Error => write!(f, "error"),
        }
    }
}

/// Fields extracted from an invoice, after date normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct InvoiceFields {
    pub vendor_name: Option<String>,
    pub invoice_number: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub total_amount: Option<Decimal>,
}

/// Per-document extraction record. At most one row exists per document;
/// writes go through an upsert keyed on `document_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub document_id: Uuid,
    pub vendor_name: Option<String>,
    pub invoice_number: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub total_amount: Option<Decimal>,
    pub processing_status: ProcessingStatus,
    pub error_message: Option<String>,
    pub page_count: Option<i32>,
    pub processed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentInfoResponse {
    pub document_id: Uuid,
    pub vendor_name: Option<String>,
    pub invoice_number: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub total_amount: Option<Decimal>,
    pub processing_status: ProcessingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<i32>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl From<DocumentInfo> for DocumentInfoResponse {
    fn from(info: DocumentInfo) -> Self {
        DocumentInfoResponse {
            document_id: info.document_id,
            vendor_name: info.vendor_name,
            invoice_number: info.invoice_number,
            invoice_date: info.invoice_date,
            total_amount: info.total_amount,
            processing_status: info.processing_status,
            error_message: info.error_message,
            page_count: info.page_count,
            processed_at: info.processed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ProcessingStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!(
            serde_json::to_string(&ProcessingStatus::Error).unwrap(),
            "\"error\""
        );
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ProcessingStatus::Pending.to_string(), "pending");
        assert_eq!(ProcessingStatus::Processing.to_string(), "processing");
    }

    #[test]
    fn test_info_response_keeps_error_message() {
        let info = DocumentInfo {
            document_id: Uuid::new_v4(),
            vendor_name: None,
            invoice_number: None,
            invoice_date: None,
            total_amount: None,
            processing_status: ProcessingStatus::Error,
            error_message: Some("Extraction failed: no data".to_string()),
            page_count: None,
            processed_at: Some(Utc::now()),
        };
        let response = DocumentInfoResponse::from(info);
        assert_eq!(response.processing_status, ProcessingStatus::Error);
        assert!(response.error_message.unwrap().contains("no data"));
    }
}
