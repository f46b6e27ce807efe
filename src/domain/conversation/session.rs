//! Session entity - a user's position in the step graph.

use serde::Serialize;
use std::time::Duration;

use crate::domain::foundation::{StepId, Timestamp, UserId};

use super::ContextData;

/// A user's mutable position in the conversation graph.
///
/// # Invariants
///
/// - `current_step` is always set (a session is created at the entry step)
/// - after a successful move the top of `history` is never `current_step`
/// - `attempts` is 0 right after every successful step change
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    user_id: UserId,
    entry_step: StepId,
    current_step: StepId,
    history: Vec<StepId>,
    attempts: u32,
    context: ContextData,
    created_at: Timestamp,
    last_activity: Timestamp,
}

impl Session {
    /// Creates a fresh session positioned at `entry_step`.
    pub fn new(user_id: UserId, entry_step: StepId, now: Timestamp) -> Self {
        Self {
            user_id,
            current_step: entry_step.clone(),
            entry_step,
            history: Vec::new(),
            attempts: 0,
            context: ContextData::new(),
            created_at: now,
            last_activity: now,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn entry_step(&self) -> &StepId {
        &self.entry_step
    }

    pub fn current_step(&self) -> &StepId {
        &self.current_step
    }

    /// Previously visited steps, oldest first.
    pub fn history(&self) -> &[StepId] {
        &self.history
    }

    /// The step a back command would return to.
    pub fn previous_step(&self) -> Option<&StepId> {
        self.history.last()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn context(&self) -> &ContextData {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ContextData {
        &mut self.context
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn last_activity(&self) -> Timestamp {
        self.last_activity
    }

    /// True when the session sits at the entry step and has never moved.
    pub fn is_pristine(&self) -> bool {
        self.current_step == self.entry_step && self.history.is_empty()
    }

    /// Records activity at `now`.
    pub fn touch(&mut self, now: Timestamp) {
        self.last_activity = now;
    }

    /// Checks whether the session has been idle longer than `timeout`.
    pub fn is_expired(&self, now: Timestamp, timeout: Duration) -> bool {
        now.millis_since(&self.last_activity) > timeout.as_millis() as u64
    }

    /// Moves to `step`, pushing the current step onto the history.
    ///
    /// Moving to the current step is a no-op. Returns whether the
    /// position changed.
    pub fn move_to(&mut self, step: StepId) -> bool {
        if step == self.current_step {
            return false;
        }
        let previous = std::mem::replace(&mut self.current_step, step);
        self.history.push(previous);
        self.attempts = 0;
        true
    }

    /// Pops the history into the current step.
    ///
    /// Returns `false` and leaves the session untouched when there is
    /// nowhere to go back to.
    pub fn go_back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current_step = previous;
                self.attempts = 0;
                true
            }
            None => false,
        }
    }

    /// Increments the failure counter and returns the new value.
    pub fn increment_attempts(&mut self) -> u32 {
        self.attempts = self.attempts.saturating_add(1);
        self.attempts
    }

    /// Read-only view for diagnostics.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user_id: self.user_id.clone(),
            current_step: self.current_step.clone(),
            history: self.history.clone(),
            attempts: self.attempts,
            context: self.context.clone(),
            created_at: self.created_at,
            last_activity: self.last_activity,
        }
    }
}

/// Point-in-time copy of a session for operational tooling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub user_id: UserId,
    pub current_step: StepId,
    pub history: Vec<StepId>,
    pub attempts: u32,
    pub context: ContextData,
    pub created_at: Timestamp,
    pub last_activity: Timestamp,
}
