//! Core of the DocChat client: the chat session state machine and the seams
//! it is driven through.
//!
//! - [`session`]: active session, archive trait, session store
//! - [`controller`]: submit flow with the busy lock and paced, typed answers
//! - [`history`]: sidebar model, reopening and deleting sessions
//! - [`typewriter`]: cancellable incremental reveal
//! - [`render`]: date/score formatting, clipboard copy, toasts
//! - [`view`], [`search`], [`auth`]: traits implemented by the front end and
//!   the HTTP layer

pub mod auth;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod history;
pub mod idle;
pub mod render;
pub mod search;
pub mod session;
pub mod typewriter;
pub mod view;

#[cfg(test)]
mod test_support;

// Re-export common types
pub use context::{ChatContext, ChatPhase, UiState};
pub use controller::{ChatController, RejectReason, SubmitOutcome};
pub use error::{DocchatError, Result};
pub use history::{HistoryManager, RemoveOutcome, SidebarEntry};
