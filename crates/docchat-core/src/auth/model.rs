//! Auth request/response models.

use serde::{Deserialize, Serialize};

use crate::error::{DocchatError, Result};

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: String,
    pub password: String,
}

impl Credentials {
    /// Trims the user id and checks that both fields are present.
    pub fn new(user_id: &str, password: &str) -> Result<Self> {
        let user_id = user_id.trim();
        if user_id.is_empty() || password.is_empty() {
            return Err(DocchatError::validation("아이디와 비밀번호를 입력하세요."));
        }
        Ok(Self {
            user_id: user_id.to_string(),
            password: password.to_string(),
        })
    }
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RegisterRequest {
    pub user_id: String,
    pub code: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn new(user_id: &str, code: &str, password: &str) -> Result<Self> {
        let user_id = user_id.trim();
        let code = code.trim();
        if user_id.is_empty() || code.is_empty() || password.is_empty() {
            return Err(DocchatError::validation(
                "아이디, 인증 코드, 비밀번호를 모두 입력하세요.",
            ));
        }
        Ok(Self {
            user_id: user_id.to_string(),
            code: code.to_string(),
            password: password.to_string(),
        })
    }
}

/// Verdict returned by every auth endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Default)]
pub struct AuthReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}
