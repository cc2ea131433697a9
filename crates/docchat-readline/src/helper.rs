//! Prompt editing support: command completion, argument hints, coloring.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hint, Hinter};
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::command::{self, ArgKind, COMMANDS};

/// Lengths of the lists that `/open N`, `/copy N` and friends index into.
///
/// Updated by the REPL after every command so completion offers only
/// numbers that exist.
#[derive(Debug, Default)]
pub struct ListSizes {
    sessions: AtomicUsize,
    documents: AtomicUsize,
}

impl ListSizes {
    pub fn update(&self, sessions: usize, documents: usize) {
        self.sessions.store(sessions, Ordering::Relaxed);
        self.documents.store(documents, Ordering::Relaxed);
    }

    fn of(&self, kind: ArgKind) -> usize {
        match kind {
            ArgKind::Session => self.sessions.load(Ordering::Relaxed),
            ArgKind::Document => self.documents.load(Ordering::Relaxed),
        }
    }
}

/// Hint whose visible text may include a placeholder that is never inserted.
pub struct CommandHint {
    display: String,
    /// Byte length of the part of `display` accepted with the right arrow.
    insertable: usize,
}

impl Hint for CommandHint {
    fn display(&self) -> &str {
        &self.display
    }

    fn completion(&self) -> Option<&str> {
        (self.insertable > 0).then(|| &self.display[..self.insertable])
    }
}

fn placeholder(kind: ArgKind, available: usize) -> String {
    let what = match kind {
        ArgKind::Session => "대화",
        ArgKind::Document => "문서",
    };
    match available {
        0 => format!("<{} 없음>", what),
        n => format!("<{} 1-{}>", what, n),
    }
}

pub struct CliHelper {
    sizes: Arc<ListSizes>,
}

impl CliHelper {
    pub fn new(sizes: Arc<ListSizes>) -> Self {
        Self { sizes }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        let Some((name, arg)) = line.split_once(' ') else {
            let candidates = COMMANDS
                .iter()
                .filter(|cmd| cmd.name.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.name.to_string(),
                    replacement: match cmd.arg {
                        Some(_) => format!("{} ", cmd.name),
                        None => cmd.name.to_string(),
                    },
                })
                .collect();
            return Ok((0, candidates));
        };

        let Some(kind) = command::find(name).and_then(|cmd| cmd.arg) else {
            return Ok((pos, vec![]));
        };
        if arg.contains(' ') {
            return Ok((pos, vec![]));
        }

        let candidates = (1..=self.sizes.of(kind))
            .map(|n| n.to_string())
            .filter(|n| n.starts_with(arg))
            .map(|n| Pair {
                display: n.clone(),
                replacement: n,
            })
            .collect();
        Ok((pos - arg.len(), candidates))
    }
}

impl Hinter for CliHelper {
    type Hint = CommandHint;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<CommandHint> {
        if pos < line.len() || !line.starts_with('/') {
            return None;
        }

        match line.split_once(' ') {
            None => {
                let cmd = COMMANDS.iter().find(|cmd| cmd.name.starts_with(line))?;
                let rest = cmd.name[line.len()..].to_string();
                let insertable = rest.len();
                let display = match cmd.arg {
                    Some(kind) => format!("{} {}", rest, placeholder(kind, self.sizes.of(kind))),
                    None if rest.is_empty() => return None,
                    None => rest,
                };
                Some(CommandHint {
                    display,
                    insertable,
                })
            }
            Some((name, "")) => {
                let kind = command::find(name)?.arg?;
                Some(CommandHint {
                    display: placeholder(kind, self.sizes.of(kind)),
                    insertable: 0,
                })
            }
            Some(_) => None,
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !line.starts_with('/') {
            return Borrowed(line);
        }

        let (name, rest) = line.split_once(' ').unwrap_or((line, ""));
        let name = if command::find(name).is_some() {
            name.bright_cyan()
        } else {
            name.red()
        };
        if line.contains(' ') {
            Owned(format!("{} {}", name, rest.yellow()))
        } else {
            Owned(name.to_string())
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Validator for CliHelper {}
