//! Error types for the DocChat client.

use thiserror::Error;

/// A shared error type for the entire DocChat client.
///
/// Variants follow the failure taxonomy of the chat flow: local validation,
/// transport failures, errors reported by the backend itself, and lookups of
/// sessions that no longer exist.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocchatError {
    /// Input rejected before anything was sent (empty query, missing credentials)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network or transport failure, including unreadable responses
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with an `{error: ...}` payload
    #[error("Backend error: {0}")]
    Backend(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Feature switched off on this deployment
    #[error("Feature disabled: {0}")]
    Disabled(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocchatError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a Backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if this error was reported by the backend
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_))
    }

    /// Text shown to the user in place of an answer.
    ///
    /// Backend errors are shown verbatim; everything else is prefixed the way
    /// the search page reported unexpected failures.
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend(message) => format!("❌ {}", message),
            Self::Transport(message) => format!("❌ 오류 발생: {}", message),
            other => format!("❌ {}", other),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for DocchatError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for DocchatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for DocchatError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, DocchatError>`.
pub type Result<T> = std::result::Result<T, DocchatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = DocchatError::not_found("session", "abc");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Entity not found: session 'abc'");
    }

    #[test]
    fn test_user_message_for_backend_error() {
        let err = DocchatError::backend("질문이 없습니다.");
        assert_eq!(err.user_message(), "❌ 질문이 없습니다.");
    }

    #[test]
    fn test_user_message_for_transport_error() {
        let err = DocchatError::transport("connection refused");
        assert_eq!(err.user_message(), "❌ 오류 발생: connection refused");
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: DocchatError = parse_err.into();
        assert!(matches!(err, DocchatError::Serialization { ref format, .. } if format == "JSON"));
    }
}
