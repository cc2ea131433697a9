//! HttpSearchBackend - `POST /search/documents`.

use async_trait::async_trait;
use docchat_core::error::{DocchatError, Result};
use docchat_core::search::{SearchBackend, SearchRequest, SearchResponse};
use serde::Deserialize;
use serde_json::Value;

use crate::api_client::ApiClient;

const SEARCH_PATH: &str = "/search/documents";

/// `SearchBackend` that talks to the search server over HTTP.
#[derive(Clone)]
pub struct HttpSearchBackend {
    api: ApiClient,
}

impl HttpSearchBackend {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

/// The server answers 200 with either shape. Any reply carrying an `error`
/// key is a failure, whatever the type of its value.
#[derive(Deserialize)]
#[serde(untagged)]
enum SearchReply {
    Failure { error: Value },
    Results(SearchResponse),
}

fn error_message(error: Value) -> String {
    match error {
        Value::String(message) => message,
        Value::Null => "unknown server error".to_string(),
        other => other.to_string(),
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn search(&self, question: &str) -> Result<SearchResponse> {
        let request = SearchRequest::new(question);
        tracing::info!(question, "Search request");

        let reply: SearchReply = self.api.post_json(SEARCH_PATH, &request).await?;
        match reply {
            SearchReply::Failure { error } => {
                let error = error_message(error);
                tracing::warn!("Search rejected by server: {}", error);
                Err(DocchatError::backend(error))
            }
            SearchReply::Results(response) => {
                tracing::info!(
                    result_count = response.count(),
                    documents = response.documents.len(),
                    "Search response"
                );
                Ok(response)
            }
        }
    }
}
