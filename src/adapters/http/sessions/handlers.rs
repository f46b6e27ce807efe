//! HTTP handlers for session endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ApiError;
use crate::application::SessionAdmin;
use crate::domain::foundation::UserId;

use super::dto::{MessageResponse, SessionResponse};

#[derive(Clone)]
pub struct SessionHandlers {
    admin: SessionAdmin,
}

impl SessionHandlers {
    pub fn new(admin: SessionAdmin) -> Self {
        Self { admin }
    }
}

fn parse_user(raw: String) -> Result<UserId, ApiError> {
    UserId::new(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/sessions/stats - Store-wide counters
pub async fn get_stats(State(handlers): State<SessionHandlers>) -> Response {
    (StatusCode::OK, Json(handlers.admin.stats().await)).into_response()
}

/// GET /api/sessions/:user_id - Navigation state for one user
pub async fn get_session(
    State(handlers): State<SessionHandlers>,
    Path(user_id): Path<String>,
) -> Result<Response, ApiError> {
    let user_id = parse_user(user_id)?;
    let snapshot = handlers.admin.session(&user_id).await?;
    Ok((StatusCode::OK, Json(SessionResponse::from(snapshot))).into_response())
}

/// GET /api/sessions/:user_id/messages - Recent messages, oldest first
pub async fn get_messages(
    State(handlers): State<SessionHandlers>,
    Path(user_id): Path<String>,
) -> Result<Response, ApiError> {
    let user_id = parse_user(user_id)?;
    let messages: Vec<MessageResponse> = handlers
        .admin
        .messages(&user_id)
        .await?
        .into_iter()
        .map(MessageResponse::from)
        .collect();
    Ok((StatusCode::OK, Json(messages)).into_response())
}

/// POST /api/sessions/:user_id/restart - Reset a user to the entry step
pub async fn restart_session(
    State(handlers): State<SessionHandlers>,
    Path(user_id): Path<String>,
) -> Result<Response, ApiError> {
    let user_id = parse_user(user_id)?;
    let snapshot = handlers.admin.restart(&user_id).await;
    Ok((StatusCode::OK, Json(SessionResponse::from(snapshot))).into_response())
}
