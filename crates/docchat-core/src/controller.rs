//! Chat controller: submit a question, wait for the backend, type out the answer.
//!
//! The controller is a two-state machine. `Idle -> Busy` happens on a valid
//! submit; `Busy -> Idle` happens when the answer has been fully typed or
//! when the request fails. The busy check and the transition are one
//! synchronous step taken before the first suspension point, so a second
//! submit arriving while the first one is in flight is rejected without
//! side effects.
//!
//! Switching sessions (activate, new chat, delete, logout) cancels the
//! running submit and waits for it. A request still pending is dropped and
//! its answer is never committed, so an entry always lands in the session
//! it was asked in.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::PacingSettings;
use crate::context::{ChatContext, SubmitHandle, UiState};
use crate::error::{DocchatError, Result};
use crate::history::HistoryManager;
use crate::render;
use crate::search::{DocumentRef, SearchBackend, SearchResponse};
use crate::session::{ChatEntry, SessionId};
use crate::typewriter::{Typewriter, TypewriterOutcome};
use crate::view::{AnswerSurface, ChatView};

/// Why a submit did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    EmptyQuery,
    Busy,
}

/// Result of one submit.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Nothing was sent and no state changed.
    Rejected(RejectReason),
    /// The answer was committed and fully revealed (or force-completed).
    Answered(ChatEntry),
    /// The request failed; nothing was committed.
    Failed(DocchatError),
    /// The session was switched before the answer arrived; the request was
    /// dropped and nothing was committed.
    Superseded,
}

pub struct ChatController {
    context: Arc<ChatContext>,
    backend: Arc<dyn SearchBackend>,
    view: Arc<dyn ChatView>,
    history: Arc<HistoryManager>,
    pacing: PacingSettings,
    typewriter: Typewriter,
}

impl ChatController {
    pub fn new(
        context: Arc<ChatContext>,
        backend: Arc<dyn SearchBackend>,
        view: Arc<dyn ChatView>,
        history: Arc<HistoryManager>,
        pacing: PacingSettings,
    ) -> Self {
        let typewriter = Typewriter::new(pacing.char_delay_ms);
        Self {
            context,
            backend,
            view,
            history,
            pacing,
            typewriter,
        }
    }

    pub fn history(&self) -> &Arc<HistoryManager> {
        &self.history
    }

    pub fn is_busy(&self) -> bool {
        self.context.is_busy()
    }

    pub async fn ui_state(&self) -> UiState {
        self.context.ui_state().await
    }

    /// Entries of the active session.
    pub async fn transcript(&self) -> Vec<ChatEntry> {
        self.context
            .store
            .lock()
            .await
            .active()
            .map(|record| record.entries.clone())
            .unwrap_or_default()
    }

    /// Fresh session on startup or after login.
    pub async fn start(&self) -> Result<SessionId> {
        let id = self.context.store.lock().await.start_new_session().await?;
        self.history.rebuild().await?;
        self.view.show_welcome();
        self.view.set_input_enabled(true);
        Ok(id)
    }

    /// Submits a question.
    pub async fn submit(&self, query: &str) -> SubmitOutcome {
        let question = query.trim();
        if question.is_empty() {
            return SubmitOutcome::Rejected(RejectReason::EmptyQuery);
        }

        let Some(ticket) = self.context.try_begin() else {
            tracing::debug!("Submit ignored: a previous question is still in progress");
            return SubmitOutcome::Rejected(RejectReason::Busy);
        };

        // Cancelled when this submit returns or is dropped, so a canceller
        // waiting on it is never left hanging.
        let done = CancellationToken::new();
        let _done_guard = done.clone().drop_guard();
        let cancel = CancellationToken::new();
        self.context.set_submit(SubmitHandle {
            ticket,
            cancel: cancel.clone(),
            done,
        });

        self.view.set_input_enabled(false);
        self.view.clear_input();

        let reserved_id = self.context.store.lock().await.next_entry_id();
        self.view.show_user_turn(reserved_id, question);
        self.view.show_pending();

        tracing::info!(ticket, entry_id = reserved_id, "Submitting question");
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            response = self.search_paced(question) => Some(response),
        };

        // The session was switched while the request was pending.
        let Some(response) = response.filter(|_| !cancel.is_cancelled()) else {
            tracing::info!(ticket, "Pending question abandoned after a session switch");
            self.context.clear_submit(ticket);
            self.unlock(ticket);
            return SubmitOutcome::Superseded;
        };

        let response = match response {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(ticket, "Search failed: {}", err);
                self.view.show_error(reserved_id, &err.user_message());
                self.context.clear_submit(ticket);
                self.unlock(ticket);
                return SubmitOutcome::Failed(err);
            }
        };

        let entry = match self.commit(question, response).await {
            Ok(entry) => entry,
            Err(err) => {
                tracing::error!(ticket, "Failed to commit answer: {}", err);
                self.view.show_error(reserved_id, &err.user_message());
                self.context.clear_submit(ticket);
                self.unlock(ticket);
                return SubmitOutcome::Failed(err);
            }
        };

        self.view.begin_answer(entry.id);
        let outcome = self
            .typewriter
            .run(&entry.answer, &AnswerSurface(self.view.as_ref()), &cancel)
            .await;
        self.view.finish_answer(entry.id);

        if outcome == TypewriterOutcome::Cancelled {
            tracing::debug!(ticket, "Answer animation cancelled");
        }
        self.context.clear_submit(ticket);
        self.unlock(ticket);

        SubmitOutcome::Answered(entry)
    }

    /// One backend call alongside the minimum pacing delay; resolves when both have.
    async fn search_paced(&self, question: &str) -> Result<SearchResponse> {
        let delay = self.pacing.response_delay_ms.sample();
        let (response, ()) = tokio::join!(self.backend.search(question), tokio::time::sleep(delay));
        response
    }

    /// Commits the answer, renders the documents and updates the history.
    async fn commit(&self, question: &str, response: SearchResponse) -> Result<ChatEntry> {
        let count = response.count();
        let mut documents = response.documents;
        render::sort_by_accuracy(&mut documents);

        let (entry, record) = {
            let mut store = self.context.store.lock().await;
            let entry = store
                .append_entry(question, response.llm_response, documents)
                .ok_or_else(|| DocchatError::internal("no active session to append to"))?;
            store.flush_active_to_archive().await?;
            let record = store.active().cloned();
            (entry, record)
        };

        self.view.show_documents(&entry.documents, count);
        if let Some(record) = record {
            self.history.upsert(&record);
        }
        Ok(entry)
    }

    fn unlock(&self, ticket: u64) {
        if self.context.release(ticket) {
            self.view.set_input_enabled(true);
        }
    }

    /// Re-enables input unless a submit owns it.
    ///
    /// Used by activity and idle-timer handling, which must never unlock a
    /// busy chat.
    pub fn restore_input(&self) -> bool {
        if self.context.is_busy() {
            return false;
        }
        self.view.set_input_enabled(true);
        true
    }

    /// Archives the current session and starts an empty one.
    pub async fn new_chat(&self) -> Result<SessionId> {
        self.context.cancel_submit().await;

        let id = {
            let mut store = self.context.store.lock().await;
            store.flush_active_to_archive().await?;
            store.start_new_session().await?
        };

        self.context.force_idle();
        self.view.show_welcome();
        self.view.set_input_enabled(true);
        Ok(id)
    }

    /// Ends the login: drops any running submit and forgets every session.
    ///
    /// History belongs to one login; the next `start` begins with an empty
    /// sidebar.
    pub async fn logout(&self) -> Result<()> {
        tracing::info!("Logging out");
        self.context.cancel_submit().await;

        self.context.store.lock().await.clear().await?;
        self.history.clear();

        self.context.force_idle();
        self.view.show_welcome();
        Ok(())
    }

    /// Document summarization is switched off on this deployment.
    pub fn summarize(&self, document: &DocumentRef) -> Result<String> {
        tracing::debug!(file_name = %document.file_name, "Summarize requested while disabled");
        Err(DocchatError::Disabled(
            "⚠️ 요약 기능은 현재 비활성화되어 있습니다.".to_string(),
        ))
    }
}
