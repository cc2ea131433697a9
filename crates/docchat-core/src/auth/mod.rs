//! Account calls delegated to the server.
//!
//! The client does no authentication of its own: it checks that the
//! required fields are present and forwards them.

pub mod model;
pub mod service;

pub use model::{AuthReply, Credentials, RegisterRequest};
pub use service::AuthService;
