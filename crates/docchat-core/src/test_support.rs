//! Mocks shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{DocchatError, Result};
use crate::history::SidebarEntry;
use crate::search::{DocumentRef, SearchBackend, SearchResponse};
use crate::session::{ChatEntry, SessionArchive, SessionId, SessionRecord};
use crate::view::ChatView;

// Mock SessionArchive for testing
#[derive(Default)]
pub struct MockArchive {
    records: Mutex<HashMap<SessionId, SessionRecord>>,
}

impl MockArchive {
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn contains_id(&self, id: &SessionId) -> bool {
        self.records.lock().unwrap().contains_key(id)
    }
}

#[async_trait]
impl SessionArchive for MockArchive {
    async fn get(&self, id: &SessionId) -> Result<Option<SessionRecord>> {
        Ok(self.records.lock().unwrap().get(id).cloned())
    }

    async fn set(&self, record: &SessionRecord) -> Result<()> {
        if record.is_empty() {
            return Err(DocchatError::validation("cannot archive an empty session"));
        }
        self.records
            .lock()
            .unwrap()
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<bool> {
        Ok(self.records.lock().unwrap().remove(id).is_some())
    }

    async fn list(&self) -> Result<Vec<SessionRecord>> {
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }

    async fn clear(&self) -> Result<usize> {
        let mut records = self.records.lock().unwrap();
        let removed = records.len();
        records.clear();
        Ok(removed)
    }
}

// Mock SearchBackend for testing
pub struct MockBackend {
    reply: Result<SearchResponse>,
    calls: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn responding(response: SearchResponse) -> Self {
        Self {
            reply: Ok(response),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(answer: &str) -> Self {
        Self::responding(SearchResponse {
            documents: Vec::new(),
            llm_response: answer.to_string(),
            result_count: Some(0),
        })
    }

    pub fn failing(error: DocchatError) -> Self {
        Self {
            reply: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for MockBackend {
    async fn search(&self, question: &str) -> Result<SearchResponse> {
        self.calls.lock().unwrap().push(question.to_string());
        self.reply.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    InputEnabled(bool),
    ClearInput,
    UserTurn(u64, String),
    Pending,
    BeginAnswer(u64),
    AnswerChunk(String),
    FinishAnswer(u64),
    Error(u64, String),
    /// File names in display order and the reported count.
    Documents(Vec<String>, usize),
    /// Questions of the rendered transcript.
    Transcript(Vec<String>),
    Welcome,
    Sidebar(Vec<SessionId>),
}

// Mock ChatView recording every call
#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    fn push(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Text revealed since the last `begin_answer`.
    pub fn answer_text(&self) -> String {
        let events = self.events();
        let start = events
            .iter()
            .rposition(|e| matches!(e, ViewEvent::BeginAnswer(_)))
            .map(|i| i + 1)
            .unwrap_or(0);
        events[start..]
            .iter()
            .filter_map(|e| match e {
                ViewEvent::AnswerChunk(chunk) => Some(chunk.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn answer_chunks_contain(&self, text: &str) -> bool {
        let all: String = self
            .events()
            .iter()
            .filter_map(|e| match e {
                ViewEvent::AnswerChunk(chunk) => Some(chunk.as_str()),
                _ => None,
            })
            .collect();
        all.contains(text)
    }

    /// Questions currently visible in the transcript.
    pub fn transcript_questions(&self) -> Vec<String> {
        let mut questions = Vec::new();
        for event in self.events() {
            match event {
                ViewEvent::Welcome => questions.clear(),
                ViewEvent::Transcript(qs) => questions = qs,
                ViewEvent::UserTurn(_, q) => questions.push(q),
                _ => {}
            }
        }
        questions
    }
}

impl ChatView for RecordingView {
    fn set_input_enabled(&self, enabled: bool) {
        self.push(ViewEvent::InputEnabled(enabled));
    }

    fn clear_input(&self) {
        self.push(ViewEvent::ClearInput);
    }

    fn show_user_turn(&self, entry_id: u64, question: &str) {
        self.push(ViewEvent::UserTurn(entry_id, question.to_string()));
    }

    fn show_pending(&self) {
        self.push(ViewEvent::Pending);
    }

    fn begin_answer(&self, entry_id: u64) {
        self.push(ViewEvent::BeginAnswer(entry_id));
    }

    fn append_answer(&self, chunk: &str) {
        self.push(ViewEvent::AnswerChunk(chunk.to_string()));
    }

    fn finish_answer(&self, entry_id: u64) {
        self.push(ViewEvent::FinishAnswer(entry_id));
    }

    fn show_error(&self, entry_id: u64, message: &str) {
        self.push(ViewEvent::Error(entry_id, message.to_string()));
    }

    fn show_documents(&self, documents: &[DocumentRef], result_count: usize) {
        self.push(ViewEvent::Documents(
            documents.iter().map(|d| d.file_name.clone()).collect(),
            result_count,
        ));
    }

    fn show_transcript(&self, entries: &[ChatEntry]) {
        self.push(ViewEvent::Transcript(
            entries.iter().map(|e| e.question.clone()).collect(),
        ));
    }

    fn show_welcome(&self) {
        self.push(ViewEvent::Welcome);
    }

    fn show_sidebar(&self, entries: &[SidebarEntry]) {
        self.push(ViewEvent::Sidebar(
            entries.iter().map(|e| e.session_id.clone()).collect(),
        ));
    }
}
