//! HttpAuthService - forwards account operations to `/auth/*`.

use async_trait::async_trait;
use docchat_core::auth::{AuthReply, AuthService, Credentials, RegisterRequest};
use docchat_core::error::Result;
use serde::Serialize;

use crate::api_client::ApiClient;

#[derive(Clone)]
pub struct HttpAuthService {
    api: ApiClient,
}

impl HttpAuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[derive(Serialize)]
struct CodeRequest<'a> {
    user_id: &'a str,
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, credentials: &Credentials) -> Result<AuthReply> {
        let reply: AuthReply = self.api.post_json("/auth/login", credentials).await?;
        tracing::info!(user_id = %credentials.user_id, success = reply.success, "Login attempt");
        Ok(reply)
    }

    async fn request_code(&self, user_id: &str) -> Result<AuthReply> {
        let reply: AuthReply = self
            .api
            .post_json("/auth/request-code", &CodeRequest { user_id })
            .await?;
        tracing::info!(user_id, success = reply.success, "Registration code requested");
        Ok(reply)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthReply> {
        let reply: AuthReply = self.api.post_json("/auth/register", request).await?;
        tracing::info!(user_id = %request.user_id, success = reply.success, "Registration attempt");
        Ok(reply)
    }
}
