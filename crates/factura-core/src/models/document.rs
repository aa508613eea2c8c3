use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// An uploaded document (invoice) with its ordered storage keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub name: String,
    pub original_filename: String,
    /// Ordered storage keys for the files belonging to this document.
    /// The first key is the primary file used by the processing pipeline.
    pub file_keys: Vec<String>,
    pub content_type: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Primary file key, if the document has any files at all.
    pub fn primary_file_key(&self) -> Option<&str> {
        self.file_keys.first().map(String::as_str)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub name: String,
    pub filename: String,
    pub file_keys: Vec<String>,
    pub content_type: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        DocumentResponse {
            id: doc.id,
            name: doc.name,
            filename: doc.original_filename,
            file_keys: doc.file_keys,
            content_type: doc.content_type,
            file_size: doc.file_size,
            created_at: doc.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_document(file_keys: Vec<String>) -> Document {
        Document {
            id: Uuid::new_v4(),
            name: "ACME invoice 2024-03".to_string(),
            original_filename: "invoice.pdf".to_string(),
            file_keys,
            content_type: "application/pdf".to_string(),
            file_size: 2048000,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_primary_file_key_is_first() {
        let doc = test_document(vec![
            "documents/a.pdf".to_string(),
            "documents/b.pdf".to_string(),
        ]);
        assert_eq!(doc.primary_file_key(), Some("documents/a.pdf"));
    }

    #[test]
    fn test_primary_file_key_empty() {
        let doc = test_document(vec![]);
        assert_eq!(doc.primary_file_key(), None);
    }

    #[test]
    fn test_document_response_from_document() {
        let doc = test_document(vec!["documents/a.pdf".to_string()]);
        let id = doc.id;
        let response = DocumentResponse::from(doc);
        assert_eq!(response.id, id);
        assert_eq!(response.filename, "invoice.pdf");
        assert_eq!(response.file_keys, vec!["documents/a.pdf".to_string()]);
    }
}
