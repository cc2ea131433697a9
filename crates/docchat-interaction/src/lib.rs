//! HTTP clients for the document search server.
//!
//! - [`HttpSearchBackend`]: `POST /search/documents`
//! - [`HttpAuthService`]: `POST /auth/login`, `/auth/request-code`, `/auth/register`
//!
//! Every call is a single attempt; failures are reported, never retried.

pub mod api_client;
pub mod auth_client;
pub mod search_client;

pub use api_client::ApiClient;
pub use auth_client::HttpAuthService;
pub use search_client::HttpSearchBackend;
