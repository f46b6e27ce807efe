//! Session introspection for operators.

use std::sync::Arc;

use crate::domain::conversation::{MessageLogEntry, SessionSnapshot};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::{ConversationStore, StoreStats};

/// Read-mostly access to conversations. Only `restart` changes state.
#[derive(Clone)]
pub struct SessionAdmin {
    store: Arc<dyn ConversationStore>,
}

impl SessionAdmin {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// `SessionNotFound` for users without a conversation.
    pub async fn session(&self, user_id: &UserId) -> Result<SessionSnapshot, DomainError> {
        self.store
            .snapshot(user_id)
            .await
            .ok_or_else(|| not_found(user_id))
    }

    /// # Errors
    ///
    /// `SessionNotFound` for users without a conversation.
    pub async fn messages(&self, user_id: &UserId) -> Result<Vec<MessageLogEntry>, DomainError> {
        self.store
            .message_log(user_id)
            .await
            .ok_or_else(|| not_found(user_id))
    }

    /// Puts the user back at the entry step with a clean slate.
    pub async fn restart(&self, user_id: &UserId) -> SessionSnapshot {
        self.store.force_restart(user_id, Timestamp::now()).await
    }

    pub async fn stats(&self) -> StoreStats {
        self.store.stats(Timestamp::now()).await
    }
}

fn not_found(user_id: &UserId) -> DomainError {
    DomainError::new(ErrorCode::SessionNotFound, format!("No session for user {}", user_id))
        .with_detail("user_id", user_id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::{InMemoryConversationStore, StoreSettings};
    use crate::domain::foundation::StepId;

    fn admin() -> (SessionAdmin, Arc<InMemoryConversationStore>) {
        let store = Arc::new(InMemoryConversationStore::new(StoreSettings::new(
            StepId::new("welcome").unwrap(),
        )));
        (SessionAdmin::new(store.clone()), store)
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (admin, _) = admin();
        let ghost = UserId::new("ghost").unwrap();

        let err = admin.session(&ghost).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::SessionNotFound);
        assert!(admin.messages(&ghost).await.is_err());
    }

    #[tokio::test]
    async fn restart_resets_known_user() {
        let (admin, store) = admin();
        let u = UserId::new("u1").unwrap();
        store.move_to(&u, StepId::new("support").unwrap(), Timestamp::now()).await;

        let snapshot = admin.restart(&u).await;

        assert_eq!(snapshot.current_step.as_str(), "welcome");
        assert_eq!(admin.stats().await.total_tracked_users, 1);
    }
}
