//! Shared JSON-over-HTTP plumbing.

use std::time::Duration;

use docchat_core::config::ServerSettings;
use docchat_core::error::{DocchatError, Result};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A `reqwest` client bound to the server's base URL.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| DocchatError::config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &ServerSettings) -> Result<Self> {
        Self::new(
            settings.base_url.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POSTs `body` as JSON and decodes the JSON reply.
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| DocchatError::transport(format!("request to {url} failed: {err}")))?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|err| DocchatError::transport(format!("failed to read response body: {err}")))?;

        if !status.is_success() {
            return Err(map_http_error(status, &body_text));
        }

        serde_json::from_str(&body_text)
            .map_err(|err| DocchatError::transport(format!("failed to parse response: {err}")))
    }
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    error: String,
}

fn map_http_error(status: StatusCode, body: &str) -> DocchatError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(wrapper) => DocchatError::backend(wrapper.error),
        Err(_) => DocchatError::transport(format!("HTTP {}: {}", status.as_u16(), body.trim())),
    }
}
