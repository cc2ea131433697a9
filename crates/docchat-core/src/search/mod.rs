//! Document search against the backend.
//!
//! - `model`: request/response shapes of `/search/documents` (`DocumentRef`, `SearchResponse`)
//! - `service`: the backend seam used by the chat controller (`SearchBackend`)

pub mod model;
pub mod service;

pub use model::{DocumentRef, SearchRequest, SearchResponse};
pub use service::SearchBackend;
