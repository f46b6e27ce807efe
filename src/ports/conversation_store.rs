//! ConversationStore port - per-user conversation state.
//!
//! One conversation (session plus message log) per user. Every operation
//! is atomic with respect to its user; turns for different users never
//! wait on each other.
//!
//! A turn takes a [`ConversationLease`] with [`ConversationStore::checkout`]
//! and holds it until the reply is logged, so two turns for the same user
//! cannot interleave. The single-operation helpers each take and release
//! their own lease.

use async_trait::async_trait;
use serde::Serialize;
use std::ops::{Deref, DerefMut};
use std::time::Duration;
use tokio::sync::OwnedMutexGuard;

use crate::domain::conversation::{Conversation, MessageLogEntry, SessionSnapshot};
use crate::domain::foundation::{StepId, Timestamp, UserId};

/// Exclusive access to one user's conversation.
///
/// Dropping the lease releases the user.
pub struct ConversationLease {
    guard: OwnedMutexGuard<Conversation>,
}

impl ConversationLease {
    pub fn new(guard: OwnedMutexGuard<Conversation>) -> Self {
        Self { guard }
    }
}

impl Deref for ConversationLease {
    type Target = Conversation;

    fn deref(&self) -> &Conversation {
        &self.guard
    }
}

impl DerefMut for ConversationLease {
    fn deref_mut(&mut self) -> &mut Conversation {
        &mut self.guard
    }
}

/// Aggregate numbers for operational dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StoreStats {
    /// Conversations whose last activity is within the inactivity timeout.
    pub active_sessions: usize,
    /// Conversations currently held, expired or not.
    pub total_tracked_users: usize,
}

/// Port for per-user conversation state.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Locks the user's conversation, creating it at the entry step if
    /// it does not exist, and records activity at `now`.
    ///
    /// Waits while another turn for the same user holds the lease.
    async fn checkout(&self, user_id: &UserId, now: Timestamp) -> ConversationLease;

    /// Session copy for diagnostics; `None` for unknown users.
    ///
    /// Does not create a conversation or refresh activity.
    async fn snapshot(&self, user_id: &UserId) -> Option<SessionSnapshot>;

    /// Logged messages, oldest first; `None` for unknown users.
    async fn message_log(&self, user_id: &UserId) -> Option<Vec<MessageLogEntry>>;

    /// Number of conversations held right now.
    async fn stats(&self, now: Timestamp) -> StoreStats;

    /// Evicts conversations idle longer than the inactivity timeout.
    ///
    /// Conversations with a turn in flight are skipped until the next
    /// sweep. Returns how many were evicted.
    async fn reap_expired(&self, now: Timestamp) -> usize;

    // ════════════════════════════════════════════════════════════════════════════
    // Single-operation helpers
    // ════════════════════════════════════════════════════════════════════════════

    /// Current session, created lazily.
    async fn get(&self, user_id: &UserId, now: Timestamp) -> SessionSnapshot {
        self.checkout(user_id, now).await.session().snapshot()
    }

    /// Moves forward to `step`. A move to the current step only refreshes
    /// activity and returns `false`.
    async fn move_to(&self, user_id: &UserId, step: StepId, now: Timestamp) -> bool {
        self.checkout(user_id, now).await.move_to(step)
    }

    /// Pops one step of history. `false` when there is none.
    async fn go_back(&self, user_id: &UserId, now: Timestamp) -> bool {
        self.checkout(user_id, now).await.go_back()
    }

    /// Replaces the session with a fresh one and clears the log.
    async fn restart(&self, user_id: &UserId, now: Timestamp) {
        self.checkout(user_id, now).await.restart(now);
    }

    /// Restarts the user and returns the fresh session.
    async fn force_restart(&self, user_id: &UserId, now: Timestamp) -> SessionSnapshot {
        let mut lease = self.checkout(user_id, now).await;
        lease.restart(now);
        lease.session().snapshot()
    }

    async fn increment_attempts(&self, user_id: &UserId, now: Timestamp) -> u32 {
        self.checkout(user_id, now).await.increment_attempts()
    }

    async fn log_incoming(&self, user_id: &UserId, text: String, now: Timestamp) {
        self.checkout(user_id, now).await.log_incoming(text, now);
    }

    async fn log_outgoing(&self, user_id: &UserId, text: String, now: Timestamp) {
        self.checkout(user_id, now).await.log_outgoing(text, now);
    }

    async fn is_debounced(&self, user_id: &UserId, window: Duration, now: Timestamp) -> bool {
        self.checkout(user_id, now).await.is_debounced(window)
    }

    async fn is_repeated_outgoing(&self, user_id: &UserId, text: &str, now: Timestamp) -> bool {
        self.checkout(user_id, now).await.is_repeated_outgoing(text)
    }
}
