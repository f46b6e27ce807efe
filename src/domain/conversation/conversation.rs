//! Conversation aggregate - a user's session plus its message log.
//!
//! Both halves share one lifecycle: they are created together on the
//! first message, reset together on restart and evicted together by the
//! reaper.

use std::time::Duration;

use crate::domain::foundation::{StepId, Timestamp, UserId};

use super::{MessageLog, Session};

/// Per-user conversation state owned by the conversation store.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    session: Session,
    log: MessageLog,
}

impl Conversation {
    /// Creates a conversation at `entry_step` with an empty log.
    pub fn new(user_id: UserId, entry_step: StepId, log_capacity: usize, now: Timestamp) -> Self {
        Self {
            session: Session::new(user_id, entry_step, now),
            log: MessageLog::new(log_capacity),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn touch(&mut self, now: Timestamp) {
        self.session.touch(now);
    }

    pub fn current_step(&self) -> &StepId {
        self.session.current_step()
    }

    pub fn move_to(&mut self, step: StepId) -> bool {
        self.session.move_to(step)
    }

    pub fn go_back(&mut self) -> bool {
        self.session.go_back()
    }

    pub fn increment_attempts(&mut self) -> u32 {
        self.session.increment_attempts()
    }

    /// Replaces the session with a fresh one at the entry step and clears
    /// the message log.
    pub fn restart(&mut self, now: Timestamp) {
        self.reset_session(now);
        self.log.clear();
    }

    /// Replaces the session with a fresh one but keeps the message log, so
    /// anti-spam bookkeeping survives forced resets.
    pub fn reset_session(&mut self, now: Timestamp) {
        let user_id = self.session.user_id().clone();
        let entry = self.session.entry_step().clone();
        self.session = Session::new(user_id, entry, now);
    }

    pub fn log_incoming(&mut self, text: impl Into<String>, at: Timestamp) {
        self.log.log_incoming(text, at);
    }

    pub fn log_outgoing(&mut self, text: impl Into<String>, at: Timestamp) {
        self.log.log_outgoing(text, at);
    }

    pub fn is_debounced(&self, window: Duration) -> bool {
        self.log.is_debounced(window)
    }

    pub fn is_repeated_outgoing(&self, text: &str) -> bool {
        self.log.is_repeated_outgoing(text)
    }

    pub fn is_expired(&self, now: Timestamp, timeout: Duration) -> bool {
        self.session.is_expired(now, timeout)
    }
}
