//! Search domain models.

use serde::{Deserialize, Serialize};

use crate::render;

/// Request body of `POST /search/documents`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchRequest {
    pub question: String,
}

impl SearchRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// A document matched by the backend.
///
/// Every field comes straight from the server and may be missing or
/// malformed; rendering code falls back instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DocumentRef {
    #[serde(default)]
    pub file_name: String,

    /// Raw date, either `YYYY-MM-DD` or a compact digit form.
    #[serde(default)]
    pub date: String,

    /// Security grade label
    #[serde(default)]
    pub grade: String,

    /// Match score rendered as a percentage string, e.g. `"87.5%"`
    #[serde(default)]
    pub accuracy: String,

    #[serde(default)]
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<serde_json::Value>,
}

impl DocumentRef {
    /// Numeric accuracy, if the string parses.
    pub fn accuracy_value(&self) -> Option<f64> {
        render::accuracy_value(&self.accuracy)
    }

    /// Sort key derived from the raw date.
    pub fn date_sort_key(&self) -> u64 {
        render::sortable_date_num(&self.date)
    }
}

/// Successful response of `POST /search/documents`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub documents: Vec<DocumentRef>,

    #[serde(default)]
    pub llm_response: String,

    #[serde(default)]
    pub result_count: Option<usize>,
}

impl SearchResponse {
    /// Result count as reported by the server, or the number of documents.
    pub fn count(&self) -> usize {
        self.result_count.unwrap_or(self.documents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_response() {
        let json = r#"{
            "documents": [
                {"file_name": "a.pdf", "date": "2024-03-05", "grade": "대외비", "accuracy": "87.5%", "path": "/docs/a.pdf"}
            ],
            "llm_response": "hello",
            "result_count": 1
        }"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.documents.len(), 1);
        assert_eq!(response.llm_response, "hello");
        assert_eq!(response.count(), 1);
        assert_eq!(response.documents[0].accuracy_value(), Some(87.5));
        assert_eq!(response.documents[0].date_sort_key(), 20240305);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let json = r#"{"documents": [{"file_name": "b.hwp", "doc_id": "7", "page": 3}]}"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.llm_response, "");
        assert_eq!(response.count(), 1);
        assert_eq!(response.documents[0].path, "");
        assert_eq!(response.documents[0].doc_id, Some(serde_json::json!("7")));
        assert_eq!(response.documents[0].accuracy_value(), None);
    }
}
