//! Chat session domain models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::search::DocumentRef;

/// Identifier of one chat session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// A fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One completed question/answer exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEntry {
    /// Position within the session, starting at 0.
    pub id: u64,
    pub question: String,
    pub answer: String,
    pub documents: Vec<DocumentRef>,
    pub timestamp: DateTime<Utc>,
    pub session_id: SessionId,
}

/// The ordered entries of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,
    pub entries: Vec<ChatEntry>,
}

impl SessionRecord {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first question, used as the session title.
    pub fn title(&self) -> Option<&str> {
        self.entries.first().map(|e| e.question.as_str())
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.entries.first().map(|e| e.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.entries.last().map(|e| e.timestamp)
    }

    pub fn last_entry(&self) -> Option<&ChatEntry> {
        self.entries.last()
    }
}
