//! Debounce bookkeeping for the links file.

use sha2::{Digest, Sha256};
use std::time::Duration;
use tokio::time::Instant;

/// Tracks when the links file last changed and what it last contained.
///
/// Each event moves the processing deadline to `event + debounce`, so a burst
/// of writes is handled once, after the burst is over.
#[derive(Debug)]
pub struct WatchState {
    debounce: Duration,
    last_event: Option<Instant>,
    deadline: Option<Instant>,
    last_digest: Option<String>,
}

impl WatchState {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            last_event: None,
            deadline: None,
            last_digest: None,
        }
    }

    /// Records an event at `now` and returns the new processing deadline.
    pub fn note_event(&mut self, now: Instant) -> Instant {
        self.last_event = Some(now);
        let deadline = now + self.debounce;
        self.deadline = Some(deadline);
        deadline
    }

    /// Pending processing deadline, if any event is waiting.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Clears the pending deadline if it has been reached. Returns whether
    /// processing should run now.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn last_event(&self) -> Option<Instant> {
        self.last_event
    }

    /// Records `content` as processed. Returns false if it is identical to the
    /// previously processed content.
    pub fn record_content(&mut self, content: &[u8]) -> bool {
        let digest = hex::encode(Sha256::digest(content));
        if self.last_digest.as_deref() == Some(digest.as_str()) {
            return false;
        }
        self.last_digest = Some(digest);
        true
    }
}
