//! In-Memory Conversation Store Adapter
//!
//! Keeps every conversation in process memory. State is lost on restart.
//!
//! The user map is guarded by an `RwLock` that is only held long enough to
//! look up or insert a slot; each slot carries its own mutex, so turns for
//! one user are serialized while different users proceed in parallel.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::domain::conversation::{Conversation, MessageLogEntry, SessionSnapshot, DEFAULT_LOG_CAPACITY};
use crate::domain::foundation::{StepId, Timestamp, UserId};
use crate::ports::{ConversationLease, ConversationStore, StoreStats};

use super::{ReaperHandle, SessionReaper};

type Slot = Arc<Mutex<Conversation>>;

/// Settings for new and expiring conversations.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// Step new conversations start at.
    pub entry_step: StepId,
    /// Message log entries kept per user.
    pub log_capacity: usize,
    /// Idle time after which a conversation is discarded.
    pub session_timeout: Duration,
}

impl StoreSettings {
    pub fn new(entry_step: StepId) -> Self {
        Self {
            entry_step,
            log_capacity: DEFAULT_LOG_CAPACITY,
            session_timeout: Duration::from_millis(1_800_000),
        }
    }

    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }

    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }
}

/// In-memory conversation store.
#[derive(Debug, Clone)]
pub struct InMemoryConversationStore {
    slots: Arc<RwLock<HashMap<UserId, Slot>>>,
    settings: StoreSettings,
}

impl InMemoryConversationStore {
    pub fn new(settings: StoreSettings) -> Self {
        Self {
            slots: Arc::new(RwLock::new(HashMap::new())),
            settings,
        }
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Starts a background reaper sweeping this store every `interval`.
    pub fn start_reaper(self: &Arc<Self>, interval: Duration) -> ReaperHandle {
        let store: Arc<dyn ConversationStore> = self.clone();
        SessionReaper::new(store, interval).spawn()
    }

    /// Number of conversations held (useful for tests).
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }

    fn fresh_conversation(&self, user_id: &UserId, now: Timestamp) -> Conversation {
        Conversation::new(
            user_id.clone(),
            self.settings.entry_step.clone(),
            self.settings.log_capacity,
            now,
        )
    }

    async fn slot_for(&self, user_id: &UserId, now: Timestamp) -> Slot {
        let existing = self.slots.read().await.get(user_id).cloned();
        if let Some(slot) = existing {
            return slot;
        }

        let mut slots = self.slots.write().await;
        let slot = slots
            .entry(user_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(self.fresh_conversation(user_id, now))));
        Arc::clone(slot)
    }

    /// True while `slot` is still the one registered for `user_id`.
    async fn is_current(&self, user_id: &UserId, slot: &Slot) -> bool {
        self.slots
            .read()
            .await
            .get(user_id)
            .map(|current| Arc::ptr_eq(current, slot))
            .unwrap_or(false)
    }

    async fn existing_slot(&self, user_id: &UserId) -> Option<Slot> {
        self.slots.read().await.get(user_id).cloned()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn checkout(&self, user_id: &UserId, now: Timestamp) -> ConversationLease {
        loop {
            let slot = self.slot_for(user_id, now).await;
            let mut guard = Arc::clone(&slot).lock_owned().await;

            // The reaper may have evicted the slot while we waited for it.
            if !self.is_current(user_id, &slot).await {
                debug!(user_id = %user_id, "Conversation evicted during checkout, retrying");
                continue;
            }

            if guard.is_expired(now, self.settings.session_timeout) {
                debug!(user_id = %user_id, "Conversation expired, starting fresh");
                *guard = self.fresh_conversation(user_id, now);
            }
            guard.touch(now);
            return ConversationLease::new(guard);
        }
    }

    async fn snapshot(&self, user_id: &UserId) -> Option<SessionSnapshot> {
        let slot = self.existing_slot(user_id).await?;
        let conversation = slot.lock().await;
        Some(conversation.session().snapshot())
    }

    async fn message_log(&self, user_id: &UserId) -> Option<Vec<MessageLogEntry>> {
        let slot = self.existing_slot(user_id).await?;
        let conversation = slot.lock().await;
        Some(conversation.log().to_vec())
    }

    async fn stats(&self, now: Timestamp) -> StoreStats {
        let slots = self.slots.read().await;
        let active_sessions = slots
            .values()
            .filter(|slot| match slot.try_lock() {
                Ok(conversation) => !conversation.is_expired(now, self.settings.session_timeout),
                // A turn is in flight.
                Err(_) => true,
            })
            .count();

        StoreStats {
            active_sessions,
            total_tracked_users: slots.len(),
        }
    }

    async fn reap_expired(&self, now: Timestamp) -> usize {
        let timeout = self.settings.session_timeout;
        let mut slots = self.slots.write().await;
        let before = slots.len();

        slots.retain(|_, slot| match slot.try_lock() {
            Ok(conversation) => !conversation.is_expired(now, timeout),
            Err(_) => true,
        });

        before - slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Direction;

    fn step(id: &str) -> StepId {
        StepId::new(id).unwrap()
    }

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn store() -> InMemoryConversationStore {
        InMemoryConversationStore::new(
            StoreSettings::new(step("welcome"))
                .with_log_capacity(5)
                .with_session_timeout(Duration::from_millis(1_000)),
        )
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Session operations
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn get_creates_session_at_entry_step() {
        let store = store();
        let now = Timestamp::now();

        let session = store.get(&user("u1"), now).await;

        assert_eq!(session.current_step, step("welcome"));
        assert!(session.history.is_empty());
        assert_eq!(session.attempts, 0);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn get_refreshes_last_activity() {
        let store = store();
        let start = Timestamp::now();
        store.get(&user("u1"), start).await;

        let later = start.plus_millis(500);
        let session = store.get(&user("u1"), later).await;

        assert_eq!(session.last_activity, later);
        assert_eq!(session.created_at, start);
    }

    #[tokio::test]
    async fn move_to_and_go_back() {
        let store = store();
        let now = Timestamp::now();
        let u = user("u1");

        assert!(store.move_to(&u, step("support"), now).await);
        assert!(!store.move_to(&u, step("support"), now).await);
        assert_eq!(store.increment_attempts(&u, now).await, 1);

        assert!(store.go_back(&u, now).await);
        assert!(!store.go_back(&u, now).await);

        let session = store.get(&u, now).await;
        assert_eq!(session.current_step, step("welcome"));
        assert_eq!(session.attempts, 0);
    }

    #[tokio::test]
    async fn restart_clears_history_and_log() {
        let store = store();
        let now = Timestamp::now();
        let u = user("u1");
        store.log_incoming(&u, "hi".into(), now).await;
        store.move_to(&u, step("support"), now).await;

        store.restart(&u, now).await;

        let session = store.get(&u, now).await;
        assert_eq!(session.current_step, step("welcome"));
        assert!(session.history.is_empty());
        assert_eq!(store.message_log(&u).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn message_log_is_capped() {
        let store = store();
        let now = Timestamp::now();
        let u = user("u1");

        for i in 0..8 {
            store.log_outgoing(&u, format!("reply {i}"), now.plus_millis(i)).await;
        }

        let log = store.message_log(&u).await.unwrap();
        assert_eq!(log.len(), 5);
        assert_eq!(log[0].text, "reply 3");
        assert!(log.iter().all(|e| e.direction == Direction::Outgoing));
    }

    #[tokio::test]
    async fn debounce_needs_two_close_incoming_messages() {
        let store = store();
        let now = Timestamp::now();
        let u = user("u1");
        let window = Duration::from_millis(2_000);

        store.log_incoming(&u, "hi".into(), now).await;
        assert!(!store.is_debounced(&u, window, now).await);

        store.log_incoming(&u, "hi again".into(), now.plus_millis(100)).await;
        assert!(store.is_debounced(&u, window, now).await);
    }

    #[tokio::test]
    async fn repeated_outgoing_is_detected() {
        let store = store();
        let now = Timestamp::now();
        let u = user("u1");

        store.log_outgoing(&u, "Pick an option".into(), now).await;

        assert!(store.is_repeated_outgoing(&u, "  pick AN option ", now).await);
        assert!(!store.is_repeated_outgoing(&u, "Something else", now).await);
    }

    #[tokio::test]
    async fn introspection_does_not_create_sessions() {
        let store = store();

        assert!(store.snapshot(&user("ghost")).await.is_none());
        assert!(store.message_log(&user("ghost")).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn force_restart_returns_fresh_session() {
        let store = store();
        let now = Timestamp::now();
        let u = user("u1");
        store.move_to(&u, step("support"), now).await;

        let snapshot = store.force_restart(&u, now).await;

        assert_eq!(snapshot.current_step, step("welcome"));
        assert!(snapshot.history.is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Locking
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn checkout_serializes_turns_for_one_user() {
        let store = store();
        let now = Timestamp::now();
        let _lease = store.checkout(&user("u1"), now).await;

        let second = tokio::time::timeout(
            Duration::from_millis(50),
            store.checkout(&user("u1"), now),
        )
        .await;

        assert!(second.is_err(), "second checkout should wait for the first");
    }

    #[tokio::test]
    async fn checkout_does_not_block_other_users() {
        let store = store();
        let now = Timestamp::now();
        let _lease = store.checkout(&user("u1"), now).await;

        let other = tokio::time::timeout(
            Duration::from_millis(500),
            store.checkout(&user("u2"), now),
        )
        .await;

        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn concurrent_turns_are_linearized() {
        let store = Arc::new(store());
        let now = Timestamp::now();
        let mut tasks = Vec::new();

        for _ in 0..20 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                let mut lease = store.checkout(&user("u1"), now).await;
                let before = lease.session().attempts();
                tokio::task::yield_now().await;
                lease.increment_attempts();
                assert_eq!(lease.session().attempts(), before + 1);
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(store.get(&user("u1"), now).await.attempts, 20);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Expiry
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn reap_evicts_only_idle_conversations() {
        let store = store();
        let start = Timestamp::now();
        store.get(&user("idle"), start).await;
        store.get(&user("busy"), start.plus_millis(900)).await;

        let evicted = store.reap_expired(start.plus_millis(1_500)).await;

        assert_eq!(evicted, 1);
        assert!(store.snapshot(&user("idle")).await.is_none());
        assert!(store.snapshot(&user("busy")).await.is_some());
    }

    #[tokio::test]
    async fn reap_skips_conversations_with_a_turn_in_flight() {
        let store = store();
        let start = Timestamp::now();
        let lease = store.checkout(&user("u1"), start).await;

        let evicted = store.reap_expired(start.plus_millis(5_000)).await;
        drop(lease);

        assert_eq!(evicted, 0);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn checkout_replaces_expired_conversation() {
        let store = store();
        let start = Timestamp::now();
        store.move_to(&user("u1"), step("support"), start).await;

        let session = store.get(&user("u1"), start.plus_millis(5_000)).await;

        assert_eq!(session.current_step, step("welcome"));
        assert!(session.history.is_empty());
    }

    #[tokio::test]
    async fn stats_split_active_and_tracked() {
        let store = store();
        let start = Timestamp::now();
        store.get(&user("a"), start).await;
        store.get(&user("b"), start.plus_millis(800)).await;

        let stats = store.stats(start.plus_millis(1_200)).await;

        assert_eq!(
            stats,
            StoreStats {
                active_sessions: 1,
                total_tracked_users: 2,
            }
        );
    }
}
