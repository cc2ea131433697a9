//! Search backend trait definition.

use async_trait::async_trait;

use crate::error::Result;
use crate::search::SearchResponse;

/// Backend that answers a question with an LLM response and matching documents.
///
/// Implementations issue exactly one request per call. A backend-reported
/// `{error: ...}` payload is returned as `DocchatError::Backend`, transport
/// and parse failures as `DocchatError::Transport`.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Sends `question` to the search endpoint.
    async fn search(&self, question: &str) -> Result<SearchResponse>;
}
