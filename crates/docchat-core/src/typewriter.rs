//! Incremental "typing" reveal of an answer.
//!
//! `RevealSteps` turns a string into per-character steps with independently
//! drawn delays; `Typewriter::run` is the single loop that drives them into a
//! `TextSurface`. A run can be cancelled through a `CancellationToken`, in
//! which case the remaining text is written at once so the surface always
//! ends up holding the full answer.

use std::str::Chars;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::DelayRange;

/// Display target the typewriter writes into.
pub trait TextSurface: Send + Sync {
    fn append(&self, chunk: &str);
}

/// One character and the pause before it appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealStep {
    pub ch: char,
    pub delay: Duration,
}

/// Iterator over the reveal steps of a text.
pub struct RevealSteps<'a> {
    chars: Chars<'a>,
    delay: DelayRange,
}

impl<'a> RevealSteps<'a> {
    pub fn new(text: &'a str, delay: DelayRange) -> Self {
        Self {
            chars: text.chars(),
            delay,
        }
    }

    /// Text not yet yielded.
    pub fn remaining(&self) -> &'a str {
        self.chars.as_str()
    }
}

impl Iterator for RevealSteps<'_> {
    type Item = RevealStep;

    fn next(&mut self) -> Option<RevealStep> {
        let ch = self.chars.next()?;
        Some(RevealStep {
            ch,
            delay: self.delay.sample(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chars.size_hint()
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypewriterOutcome {
    /// Every character was revealed on schedule.
    Completed,
    /// Cancelled midway; the rest of the text was written in one piece.
    Cancelled,
}

#[derive(Debug, Clone, Copy)]
pub struct Typewriter {
    char_delay: DelayRange,
}

impl Typewriter {
    pub fn new(char_delay: DelayRange) -> Self {
        Self { char_delay }
    }

    pub async fn run<S>(
        &self,
        text: &str,
        surface: &S,
        cancel: &CancellationToken,
    ) -> TypewriterOutcome
    where
        S: TextSurface + ?Sized,
    {
        let mut steps = RevealSteps::new(text, self.char_delay);
        let mut buf = [0u8; 4];

        while let Some(step) = steps.next() {
            let cancelled = tokio::select! {
                biased;
                _ = cancel.cancelled() => true,
                _ = tokio::time::sleep(step.delay) => false,
            };

            if cancelled {
                let mut rest = String::with_capacity(steps.remaining().len() + 4);
                rest.push(step.ch);
                rest.push_str(steps.remaining());
                surface.append(&rest);
                tracing::debug!("Typewriter cancelled, flushed {} remaining chars", rest.chars().count());
                return TypewriterOutcome::Cancelled;
            }

            surface.append(step.ch.encode_utf8(&mut buf));
        }

        TypewriterOutcome::Completed
    }
}
