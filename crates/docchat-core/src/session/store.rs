//! The active session and the archive of past sessions.

use std::sync::Arc;

use chrono::Utc;

use super::model::{ChatEntry, SessionId, SessionRecord};
use super::repository::SessionArchive;
use crate::error::{DocchatError, Result};
use crate::search::DocumentRef;

/// Holds the active session and moves sessions in and out of the archive.
///
/// `SessionStore` is responsible for:
/// - Starting sessions with ids unique across the archive
/// - Appending entries with per-session increasing ids
/// - Flushing the active session into the archive before a switch
/// - Loading and deleting archived sessions
///
/// It never talks to the network and never renders anything.
pub struct SessionStore {
    active: Option<SessionRecord>,
    next_entry_id: u64,
    archived_active: bool,
    archive: Arc<dyn SessionArchive>,
}

impl SessionStore {
    /// Creates a store with no active session.
    ///
    /// Callers start one with `start_new_session` before the first append.
    pub fn new(archive: Arc<dyn SessionArchive>) -> Self {
        Self {
            active: None,
            next_entry_id: 0,
            archived_active: false,
            archive,
        }
    }

    /// Replaces the active session with an empty one under a fresh id.
    ///
    /// The previous active session is dropped, not archived; callers that
    /// want to keep it flush first. The archive itself is only read.
    pub async fn start_new_session(&mut self) -> Result<SessionId> {
        let mut id = SessionId::generate();
        while self.archive.contains(&id).await? {
            id = SessionId::generate();
        }

        self.active = Some(SessionRecord::new(id.clone()));
        self.next_entry_id = 0;
        self.archived_active = false;

        tracing::info!(session_id = %id, "Started new session");
        Ok(id)
    }

    /// Appends a completed exchange to the active session.
    ///
    /// Returns `None` without touching anything if no session was started.
    pub fn append_entry(
        &mut self,
        question: impl Into<String>,
        answer: impl Into<String>,
        documents: Vec<DocumentRef>,
    ) -> Option<ChatEntry> {
        let Some(active) = self.active.as_mut() else {
            tracing::warn!("append_entry called without an active session; ignoring");
            return None;
        };

        let entry = ChatEntry {
            id: self.next_entry_id,
            question: question.into(),
            answer: answer.into(),
            documents,
            timestamp: Utc::now(),
            session_id: active.id.clone(),
        };
        self.next_entry_id += 1;
        active.entries.push(entry.clone());

        tracing::debug!(session_id = %entry.session_id, entry_id = entry.id, "Appended chat entry");
        Some(entry)
    }

    /// Copies a non-empty active session into the archive.
    ///
    /// Returns whether anything was written. Safe to call repeatedly.
    pub async fn flush_active_to_archive(&self) -> Result<bool> {
        match self.active.as_ref() {
            Some(active) if !active.is_empty() => {
                self.archive.set(active).await?;
                tracing::debug!(session_id = %active.id, entries = active.len(), "Flushed active session");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Reads an archived session.
    ///
    /// # Errors
    ///
    /// `DocchatError::NotFound` if the archive has no such session.
    pub async fn load_session(&self, id: &SessionId) -> Result<SessionRecord> {
        self.archive
            .get(id)
            .await?
            .ok_or_else(|| DocchatError::not_found("session", id.as_str()))
    }

    /// Makes a loaded archived session the active one.
    ///
    /// Appends continue numbering after the last entry of the record.
    pub fn activate_record(&mut self, record: SessionRecord) {
        self.next_entry_id = record.entries.last().map(|e| e.id + 1).unwrap_or(0);
        self.archived_active = true;
        tracing::info!(session_id = %record.id, entries = record.len(), "Activated archived session");
        self.active = Some(record);
    }

    /// Removes a session from the archive.
    ///
    /// If it is the active session a new one is started. Returns whether the
    /// active session was the one deleted.
    pub async fn delete_session(&mut self, id: &SessionId) -> Result<bool> {
        let existed = self.archive.delete(id).await?;
        tracing::info!(session_id = %id, existed, "Deleted session");

        if self.active_id() == Some(id) {
            self.start_new_session().await?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Forgets everything: the archive is emptied and no session is active.
    ///
    /// Returns how many archived sessions were dropped.
    pub async fn clear(&mut self) -> Result<usize> {
        let removed = self.archive.clear().await?;
        self.active = None;
        self.next_entry_id = 0;
        self.archived_active = false;

        tracing::info!(removed, "Cleared session history");
        Ok(removed)
    }

    /// All archived sessions.
    pub async fn archived_sessions(&self) -> Result<Vec<SessionRecord>> {
        self.archive.list().await
    }

    pub fn active(&self) -> Option<&SessionRecord> {
        self.active.as_ref()
    }

    pub fn active_id(&self) -> Option<&SessionId> {
        self.active.as_ref().map(|a| &a.id)
    }

    /// Id the next appended entry will get.
    pub fn next_entry_id(&self) -> u64 {
        self.next_entry_id
    }

    /// Whether the active session was reopened from the archive.
    pub fn is_archived_active(&self) -> bool {
        self.archived_active
    }
}
