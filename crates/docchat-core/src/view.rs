//! Display seams implemented by the front end.

use crate::history::SidebarEntry;
use crate::search::DocumentRef;
use crate::session::ChatEntry;
use crate::typewriter::TextSurface;

/// Everything the chat flow draws.
///
/// Calls are synchronous and happen on the thread that drives the chat;
/// implementations only render and never call back into the controllers.
pub trait ChatView: Send + Sync {
    /// Enables or disables the input line.
    fn set_input_enabled(&self, enabled: bool);

    fn clear_input(&self);

    /// Shows the question of a turn that is not committed yet.
    fn show_user_turn(&self, entry_id: u64, question: &str);

    /// Placeholder while the backend is working.
    fn show_pending(&self);

    fn begin_answer(&self, entry_id: u64);

    /// Appends revealed answer text.
    fn append_answer(&self, chunk: &str);

    fn finish_answer(&self, entry_id: u64);

    /// Inline error shown in place of the answer.
    fn show_error(&self, entry_id: u64, message: &str);

    /// Document panel; `documents` are already sorted for display.
    fn show_documents(&self, documents: &[DocumentRef], result_count: usize);

    /// Replaces the transcript with complete question/answer pairs.
    fn show_transcript(&self, entries: &[ChatEntry]);

    /// Empty transcript with the welcome message.
    fn show_welcome(&self);

    /// History list, most recent first.
    fn show_sidebar(&self, entries: &[SidebarEntry]);
}

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Routes typewriter output into the answer area of a view.
pub struct AnswerSurface<'a>(pub &'a dyn ChatView);

impl TextSurface for AnswerSurface<'_> {
    fn append(&self, chunk: &str) {
        self.0.append_answer(chunk);
    }
}
