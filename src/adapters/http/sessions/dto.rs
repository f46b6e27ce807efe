//! DTOs for session endpoints.

use serde::Serialize;

use crate::domain::conversation::{ContextData, Direction, MessageLogEntry, SessionSnapshot};

/// A user's navigation state.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub user_id: String,
    pub current_step: String,
    pub history: Vec<String>,
    pub attempts: u32,
    pub context: ContextData,
    pub created_at: String,
    pub last_activity: String,
}

impl From<SessionSnapshot> for SessionResponse {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self {
            user_id: snapshot.user_id.to_string(),
            current_step: snapshot.current_step.to_string(),
            history: snapshot.history.iter().map(ToString::to_string).collect(),
            attempts: snapshot.attempts,
            context: snapshot.context,
            created_at: snapshot.created_at.as_datetime().to_rfc3339(),
            last_activity: snapshot.last_activity.as_datetime().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub direction: Direction,
    pub text: String,
    pub timestamp: String,
}

impl From<MessageLogEntry> for MessageResponse {
    fn from(entry: MessageLogEntry) -> Self {
        Self {
            direction: entry.direction,
            text: entry.text,
            timestamp: entry.timestamp.as_datetime().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Session;
    use crate::domain::foundation::{StepId, Timestamp, UserId};

    #[test]
    fn session_response_serializes_history_in_order() {
        let mut session = Session::new(
            UserId::new("u1").unwrap(),
            StepId::new("welcome").unwrap(),
            Timestamp::now(),
        );
        session.move_to(StepId::new("menu").unwrap());

        let response = SessionResponse::from(session.snapshot());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["current_step"], "menu");
        assert_eq!(json["history"], serde_json::json!(["welcome"]));
        assert_eq!(json["attempts"], 0);
    }
}
