//! Shared chat state: the session store, the busy lock and the running submit.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio_util::sync::CancellationToken;

use crate::session::{SessionArchive, SessionId, SessionStore};

/// Whether a submit currently owns the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatPhase {
    Idle,
    /// Locked by the submit holding `ticket`.
    Busy { ticket: u64 },
}

/// Snapshot of the UI-relevant state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub active_session_id: Option<SessionId>,
    pub next_entry_id: u64,
    pub is_busy: bool,
    pub archived_session_active: bool,
}

/// Cancellation handle of the submit that owns the busy lock.
///
/// Cancelling it while the request is pending abandons the request; while
/// the answer is being typed it force-completes the text.
#[derive(Debug, Clone)]
pub(crate) struct SubmitHandle {
    pub ticket: u64,
    /// Cancelled by whoever wants the submit to stop.
    pub cancel: CancellationToken,
    /// Cancelled by the submit once it has returned.
    pub done: CancellationToken,
}

/// State shared by the chat controller and the history manager.
///
/// The store sits behind an async mutex because archive access awaits. The
/// phase and the submit handle use plain mutexes and are never held
/// across an `.await`, so checking and taking the busy lock cannot be
/// interleaved with another submit.
pub struct ChatContext {
    pub(crate) store: tokio::sync::Mutex<SessionStore>,
    phase: Mutex<ChatPhase>,
    submit: Mutex<Option<SubmitHandle>>,
    tickets: AtomicU64,
}

impl ChatContext {
    pub fn new(archive: Arc<dyn SessionArchive>) -> Self {
        Self {
            store: tokio::sync::Mutex::new(SessionStore::new(archive)),
            phase: Mutex::new(ChatPhase::Idle),
            submit: Mutex::new(None),
            tickets: AtomicU64::new(1),
        }
    }

    fn phase_guard(&self) -> MutexGuard<'_, ChatPhase> {
        self.phase.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn submit_guard(&self) -> MutexGuard<'_, Option<SubmitHandle>> {
        self.submit
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn phase(&self) -> ChatPhase {
        *self.phase_guard()
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase(), ChatPhase::Busy { .. })
    }

    /// Idle -> Busy. Returns the ticket that owns the lock, or `None` if busy.
    pub(crate) fn try_begin(&self) -> Option<u64> {
        let mut phase = self.phase_guard();
        if let ChatPhase::Busy { .. } = *phase {
            return None;
        }
        let ticket = self.tickets.fetch_add(1, Ordering::Relaxed);
        *phase = ChatPhase::Busy { ticket };
        tracing::debug!(ticket, "Chat phase: Idle -> Busy");
        Some(ticket)
    }

    /// Busy -> Idle, only if `ticket` still owns the lock.
    pub(crate) fn release(&self, ticket: u64) -> bool {
        let mut phase = self.phase_guard();
        if *phase == (ChatPhase::Busy { ticket }) {
            *phase = ChatPhase::Idle;
            tracing::debug!(ticket, "Chat phase: Busy -> Idle");
            true
        } else {
            false
        }
    }

    /// Unconditionally Idle.
    pub(crate) fn force_idle(&self) {
        let mut phase = self.phase_guard();
        if *phase != ChatPhase::Idle {
            tracing::debug!(previous = ?*phase, "Chat phase forced to Idle");
        }
        *phase = ChatPhase::Idle;
    }

    /// Whether `ticket` still owns the busy lock.
    pub(crate) fn owns(&self, ticket: u64) -> bool {
        *self.phase_guard() == (ChatPhase::Busy { ticket })
    }

    pub(crate) fn set_submit(&self, handle: SubmitHandle) {
        *self.submit_guard() = Some(handle);
    }

    pub(crate) fn clear_submit(&self, ticket: u64) {
        let mut submit = self.submit_guard();
        if submit.as_ref().is_some_and(|h| h.ticket == ticket) {
            *submit = None;
        }
    }

    /// Stops the running submit, if any, and waits until it has returned.
    ///
    /// A pending request is dropped without committing anything; an answer
    /// being typed is written out in full first.
    pub(crate) async fn cancel_submit(&self) {
        let handle = self.submit_guard().take();
        if let Some(handle) = handle {
            tracing::debug!(ticket = handle.ticket, "Cancelling running submit");
            handle.cancel.cancel();
            handle.done.cancelled().await;
        }
    }

    pub async fn ui_state(&self) -> UiState {
        let store = self.store.lock().await;
        UiState {
            active_session_id: store.active_id().cloned(),
            next_entry_id: store.next_entry_id(),
            is_busy: self.is_busy(),
            archived_session_active: store.is_archived_active(),
        }
    }
}
