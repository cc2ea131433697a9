//! Session history sidebar.
//!
//! The history manager owns the sidebar model and moves sessions between the
//! store's active slot and its archive. It never touches the network.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::context::ChatContext;
use crate::error::Result;
use crate::render;
use crate::session::{SessionId, SessionRecord};
use crate::view::{ChatView, Confirm};

const TITLE_MAX_CHARS: usize = 30;
const DELETE_PROMPT: &str = "이 대화 기록을 삭제하시겠습니까? 삭제 후에는 복구할 수 없습니다.";

/// One line of the history sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub session_id: SessionId,
    /// First question of the session, shortened for display.
    pub title: String,
    /// `"{first} ~ {last}"` entry timestamps.
    pub tooltip: String,
    pub updated_at: DateTime<Utc>,
}

impl SidebarEntry {
    fn from_record(record: &SessionRecord) -> Option<Self> {
        let title = record.title()?;
        let first = record.first_timestamp()?;
        let last = record.last_timestamp()?;

        Some(Self {
            session_id: record.id.clone(),
            title: render::truncate_chars(title, TITLE_MAX_CHARS),
            tooltip: format!(
                "{} ~ {}",
                render::format_timestamp(&first),
                render::format_timestamp(&last)
            ),
            updated_at: last,
        })
    }
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The user declined; nothing changed.
    Declined,
    Removed { was_active: bool },
}

pub struct HistoryManager {
    context: Arc<ChatContext>,
    view: Arc<dyn ChatView>,
    sidebar: Mutex<Vec<SidebarEntry>>,
}

impl HistoryManager {
    pub fn new(context: Arc<ChatContext>, view: Arc<dyn ChatView>) -> Self {
        Self {
            context,
            view,
            sidebar: Mutex::new(Vec::new()),
        }
    }

    fn sidebar_guard(&self) -> MutexGuard<'_, Vec<SidebarEntry>> {
        self.sidebar
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current sidebar, most recent first.
    pub fn entries(&self) -> Vec<SidebarEntry> {
        self.sidebar_guard().clone()
    }

    /// Reflects a session in the sidebar.
    ///
    /// An existing line keeps its position and gets a new title and tooltip;
    /// a new session is prepended. Empty records are ignored.
    pub fn upsert(&self, record: &SessionRecord) {
        let Some(entry) = SidebarEntry::from_record(record) else {
            return;
        };

        let snapshot = {
            let mut sidebar = self.sidebar_guard();
            match sidebar.iter_mut().find(|e| e.session_id == entry.session_id) {
                Some(existing) => *existing = entry,
                None => sidebar.insert(0, entry),
            }
            sidebar.clone()
        };
        self.view.show_sidebar(&snapshot);
    }

    /// Deletes a session after confirmation.
    ///
    /// Removes the sidebar line and the archived record. Deleting the active
    /// session starts a new one and resets the view to the welcome screen.
    pub async fn remove(&self, id: &SessionId, confirm: &dyn Confirm) -> Result<RemoveOutcome> {
        if !confirm.confirm(DELETE_PROMPT) {
            tracing::debug!(session_id = %id, "Session delete declined");
            return Ok(RemoveOutcome::Declined);
        }

        let is_active = self.context.store.lock().await.active_id() == Some(id);
        if is_active {
            self.context.cancel_submit().await;
        }

        let was_active = self.context.store.lock().await.delete_session(id).await?;

        let snapshot = {
            let mut sidebar = self.sidebar_guard();
            sidebar.retain(|e| &e.session_id != id);
            sidebar.clone()
        };
        self.view.show_sidebar(&snapshot);

        if was_active {
            self.context.force_idle();
            self.view.show_welcome();
            self.view.set_input_enabled(true);
        }

        Ok(RemoveOutcome::Removed { was_active })
    }

    /// Reopens an archived session.
    ///
    /// The active session is flushed to the archive first. Any answer still
    /// being typed is force-completed, the full transcript and the documents
    /// of the last entry are rendered, and input is unlocked regardless of
    /// the previous phase. Returns `false` (and changes nothing else) if the
    /// session no longer exists.
    pub async fn activate(&self, id: &SessionId) -> Result<bool> {
        let record = {
            let store = self.context.store.lock().await;
            store.flush_active_to_archive().await?;
            match store.load_session(id).await {
                Ok(record) => record,
                Err(e) if e.is_not_found() => {
                    tracing::warn!(session_id = %id, "Cannot activate missing session");
                    return Ok(false);
                }
                Err(e) => return Err(e),
            }
        };

        self.context.cancel_submit().await;
        self.context.store.lock().await.activate_record(record.clone());

        self.view.show_transcript(&record.entries);
        if let Some(last) = record.last_entry() {
            self.view.show_documents(&last.documents, last.documents.len());
        }

        self.context.force_idle();
        self.view.set_input_enabled(true);
        Ok(true)
    }

    /// Empties the sidebar without touching the archive.
    pub fn clear(&self) {
        self.sidebar_guard().clear();
        self.view.show_sidebar(&[]);
    }

    /// Repopulates the sidebar from the archive.
    pub async fn rebuild(&self) -> Result<()> {
        let mut records = self.context.store.lock().await.archived_sessions().await?;
        records.sort_by(|a, b| b.last_timestamp().cmp(&a.last_timestamp()));

        let snapshot: Vec<SidebarEntry> = records.iter().filter_map(SidebarEntry::from_record).collect();
        *self.sidebar_guard() = snapshot.clone();
        self.view.show_sidebar(&snapshot);
        Ok(())
    }
}
