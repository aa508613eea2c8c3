use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;

use super::ProcessingStatus;

/// One append-only status transition for a document. Rows are never updated
/// or deleted by the pipeline; the table is the audit trail behind the UI's
/// processing history view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingLogEntry {
    pub id: Uuid,
    pub document_id: Uuid,
    pub status: ProcessingStatus,
    /// Short step description, e.g. "extraction started".
    pub step: String,
    /// Arbitrary structured payload (elapsed time, extracted fields, ...).
    pub detail: JsonValue,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProcessingLogResponse {
    pub id: Uuid,
    pub document_id: Uuid,
    pub status: ProcessingStatus,
    pub step: String,
    #[schema(value_type = Object)]
    pub detail: JsonValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ProcessingLogEntry> for ProcessingLogResponse {
    fn from(entry: ProcessingLogEntry) -> Self {
        ProcessingLogResponse {
            id: entry.id,
            document_id: entry.document_id,
            status: entry.status,
            step: entry.step,
            detail: entry.detail,
            error_message: entry.error_message,
            created_at: entry.created_at,
        }
    }
}
