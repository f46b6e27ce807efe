//! Bounded per-user message log.
//!
//! The log is bookkeeping for anti-spam, not business data: it only
//! feeds debounce detection and repeated-reply suppression.

use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;

use crate::domain::foundation::Timestamp;

/// Default number of entries kept per user.
pub const DEFAULT_LOG_CAPACITY: usize = 50;

/// Which way a logged message travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Incoming,
    Outgoing,
}

/// A single logged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageLogEntry {
    pub direction: Direction,
    pub text: String,
    pub timestamp: Timestamp,
}

/// Most-recent-N message log; oldest entries are dropped first.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageLog {
    entries: VecDeque<MessageLogEntry>,
    capacity: usize,
}

impl MessageLog {
    /// Creates an empty log holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn log_incoming(&mut self, text: impl Into<String>, at: Timestamp) {
        self.push(Direction::Incoming, text.into(), at);
    }

    pub fn log_outgoing(&mut self, text: impl Into<String>, at: Timestamp) {
        self.push(Direction::Outgoing, text.into(), at);
    }

    fn push(&mut self, direction: Direction, text: String, timestamp: Timestamp) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(MessageLogEntry {
            direction,
            text,
            timestamp,
        });
    }

    /// True when the two most recent incoming messages arrived less than
    /// `window` apart.
    ///
    /// A log with fewer than two incoming messages is never debounced.
    pub fn is_debounced(&self, window: Duration) -> bool {
        let mut incoming = self
            .entries
            .iter()
            .rev()
            .filter(|e| e.direction == Direction::Incoming);

        match (incoming.next(), incoming.next()) {
            (Some(latest), Some(previous)) => {
                (latest.timestamp.millis_since(&previous.timestamp) as u128) < window.as_millis()
            }
            _ => false,
        }
    }

    /// True when `text` matches one of the two most recent outgoing
    /// messages, ignoring case and whitespace differences.
    pub fn is_repeated_outgoing(&self, text: &str) -> bool {
        let candidate = normalize(text);
        self.entries
            .iter()
            .rev()
            .filter(|e| e.direction == Direction::Outgoing)
            .take(2)
            .any(|e| normalize(&e.text) == candidate)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> impl Iterator<Item = &MessageLogEntry> {
        self.entries.iter()
    }

    /// Owned copy of the log, oldest first.
    pub fn to_vec(&self) -> Vec<MessageLogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
