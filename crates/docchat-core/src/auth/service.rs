//! Auth service trait definition.

use async_trait::async_trait;

use super::model::{AuthReply, Credentials, RegisterRequest};
use crate::error::Result;

/// Server-side account operations.
///
/// A reply with `success == false` is a normal outcome, not an error;
/// errors are reserved for transport and parse failures.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<AuthReply>;

    /// Asks the server to send a registration code to `user_id`.
    async fn request_code(&self, user_id: &str) -> Result<AuthReply>;

    async fn register(&self, request: &RegisterRequest) -> Result<AuthReply>;
}
