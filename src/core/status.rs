use std::time::{Duration, Instant};

use crate::config::DEFAULT_STATUS_TTL_SECS;

pub const DEFAULT_STATUS_TTL: Duration = Duration::from_secs(DEFAULT_STATUS_TTL_SECS);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// Transient success/error feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

#[derive(Debug)]
struct Posted {
    message: StatusMessage,
    at: Instant,
}

/// Single-slot holder for the status message.
///
/// Posting replaces whatever is pending and restarts the expiry window, so at
/// most one message is ever visible.
#[derive(Debug)]
pub struct StatusSlot {
    current: Option<Posted>,
    ttl: Duration,
    revision: u64,
}

impl Default for StatusSlot {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS_TTL)
    }
}

impl StatusSlot {
    pub fn new(ttl: Duration) -> Self {
        Self {
            current: None,
            ttl,
            revision: 0,
        }
    }

    pub fn set_ttl(&mut self, ttl: Duration) {
        self.ttl = ttl;
    }

    pub fn post(&mut self, message: StatusMessage, now: Instant) {
        self.current = Some(Posted { message, at: now });
        self.revision += 1;
    }

    /// The visible message, or `None` once `ttl` has elapsed since posting.
    pub fn current(&self, now: Instant) -> Option<&StatusMessage> {
        let posted = self.current.as_ref()?;
        if now.saturating_duration_since(posted.at) < self.ttl {
            Some(&posted.message)
        } else {
            None
        }
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        let posted = self.current.as_ref()?;
        self.ttl
            .checked_sub(now.saturating_duration_since(posted.at))
            .filter(|left| !left.is_zero())
    }

    /// Bumped on every post; lets the shell announce each message once.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
