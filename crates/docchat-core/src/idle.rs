//! Inactivity timer that triggers an automatic logout.
//!
//! The timer only tracks activity. It never touches the chat phase: input
//! is re-enabled through `ChatController::restore_input`, which refuses while
//! a submit is in progress.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct IdleTimer {
    timeout: Duration,
    last_activity: Instant,
}

impl IdleTimer {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            last_activity: Instant::now(),
        }
    }

    /// Records user activity.
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn remaining_at(&self, now: Instant) -> Duration {
        self.timeout
            .saturating_sub(now.saturating_duration_since(self.last_activity))
    }

    pub fn remaining(&self) -> Duration {
        self.remaining_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.remaining_at(now).is_zero()
    }

    /// One watcher tick. A submit in progress counts as activity, so the
    /// timer can only run out while the chat is idle.
    pub fn tick_at(&mut self, now: Instant, busy: bool) -> bool {
        if busy {
            self.last_activity = now;
            return false;
        }
        self.is_expired_at(now)
    }
}

/// `mm:ss` countdown shown next to the prompt.
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
