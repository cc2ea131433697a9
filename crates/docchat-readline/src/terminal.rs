//! Terminal rendering of the chat view.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use colored::Colorize;
use docchat_core::history::SidebarEntry;
use docchat_core::render::{self, ClipboardSink, Toast};
use docchat_core::search::DocumentRef;
use docchat_core::session::ChatEntry;
use docchat_core::view::{ChatView, Confirm};

const WELCOME: &str = "무엇이든 물어보세요. 문서를 찾아 답변해 드립니다.";

/// `ChatView` that prints to stdout.
///
/// Keeps the documents currently on screen so `/copy N` and `/summarize N`
/// can refer to them by position.
#[derive(Default)]
pub struct TerminalView {
    documents: Mutex<Vec<DocumentRef>>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document shown at 1-based `position`.
    pub fn document(&self, position: usize) -> Option<DocumentRef> {
        let documents = self
            .documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        position
            .checked_sub(1)
            .and_then(|index| documents.get(index).cloned())
    }

    pub fn document_count(&self) -> usize {
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Prints the current list again. With `by_date` the list is re-sorted
    /// newest first and later `/copy N` numbers follow the new order.
    pub fn reprint_documents(&self, by_date: bool) {
        let documents = {
            let mut documents = self
                .documents
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if by_date {
                render::sort_by_date(documents.as_mut_slice());
            }
            documents.clone()
        };
        print_documents(&documents, documents.len());
    }

    fn set_documents(&self, documents: &[DocumentRef]) {
        *self
            .documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = documents.to_vec();
    }
}

fn flush() {
    let _ = io::stdout().flush();
}

fn print_documents(documents: &[DocumentRef], result_count: usize) {
    println!("{}", render::result_count_line(result_count).bright_yellow());
    for (index, document) in documents.iter().enumerate() {
        println!(
            "  {} {}  {}  {}  {}",
            format!("[{}]", index + 1).bright_black(),
            render::display_file_name(document).bold(),
            render::format_date_korean(&document.date),
            render::display_grade(document).cyan(),
            document.accuracy.green(),
        );
    }
}

pub fn print_toast(toast: &Toast) {
    println!("{}", toast.message.yellow());
}

impl ChatView for TerminalView {
    fn set_input_enabled(&self, enabled: bool) {
        tracing::trace!(enabled, "Input toggled");
    }

    fn clear_input(&self) {}

    fn show_user_turn(&self, _entry_id: u64, question: &str) {
        println!("{}", format!("> {}", question).green());
    }

    fn show_pending(&self) {
        println!("{}", "답변을 생성 중입니다...".bright_black());
    }

    fn begin_answer(&self, _entry_id: u64) {}

    fn append_answer(&self, chunk: &str) {
        print!("{}", chunk.bright_blue());
        flush();
    }

    fn finish_answer(&self, _entry_id: u64) {
        println!();
        println!();
    }

    fn show_error(&self, _entry_id: u64, message: &str) {
        println!("{}", message.red());
    }

    fn show_documents(&self, documents: &[DocumentRef], result_count: usize) {
        self.set_documents(documents);
        print_documents(documents, result_count);
    }

    fn show_transcript(&self, entries: &[ChatEntry]) {
        println!("{}", "─".repeat(40).bright_black());
        for entry in entries {
            println!("{}", format!("> {}", entry.question).green());
            for line in entry.answer.lines() {
                println!("{}", line.bright_blue());
            }
            println!();
        }
    }

    fn show_welcome(&self) {
        self.set_documents(&[]);
        println!("{}", "─".repeat(40).bright_black());
        println!("{}", WELCOME.bright_magenta());
    }

    fn show_sidebar(&self, entries: &[SidebarEntry]) {
        tracing::trace!(sessions = entries.len(), "Sidebar updated");
    }
}

pub fn print_sidebar(entries: &[SidebarEntry]) {
    if entries.is_empty() {
        println!("{}", "저장된 대화가 없습니다.".bright_black());
        return;
    }
    for (index, entry) in entries.iter().enumerate() {
        println!(
            "  {} {}  {}",
            format!("[{}]", index + 1).bright_black(),
            entry.title,
            entry.tooltip.bright_black(),
        );
    }
}

/// Writes to the terminal's clipboard with an OSC 52 escape.
pub struct Osc52Clipboard;

impl ClipboardSink for Osc52Clipboard {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        write!(stdout, "\x1b]52;c;{}\x07", STANDARD.encode(text))?;
        stdout.flush()
    }
}

/// Yes/no question answered on stdin.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{} {} ", prompt.yellow(), "(y/N)".bright_black());
        flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lookup_is_one_based() {
        let view = TerminalView::new();
        view.set_documents(&[DocumentRef {
            file_name: "a.pdf".to_string(),
            ..Default::default()
        }]);

        assert!(view.document(0).is_none());
        assert_eq!(view.document(1).unwrap().file_name, "a.pdf");
        assert!(view.document(2).is_none());
    }

    #[test]
    fn test_reprint_by_date_reorders_positions() {
        let view = TerminalView::new();
        view.set_documents(&[
            DocumentRef {
                file_name: "older.pdf".to_string(),
                date: "2023-01-01".to_string(),
                ..Default::default()
            },
            DocumentRef {
                file_name: "newer.pdf".to_string(),
                date: "2024-06-30".to_string(),
                ..Default::default()
            },
        ]);

        view.reprint_documents(true);

        assert_eq!(view.document_count(), 2);
        assert_eq!(view.document(1).unwrap().file_name, "newer.pdf");
    }

    #[test]
    fn test_welcome_clears_documents() {
        let view = TerminalView::new();
        view.set_documents(&[DocumentRef::default()]);
        view.show_welcome();
        assert!(view.document(1).is_none());
    }
}
