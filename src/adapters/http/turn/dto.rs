//! DTOs for the turn endpoint.

use serde::Deserialize;

/// One inbound chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct TurnRequest {
    pub user_id: String,
    pub message: String,
}
