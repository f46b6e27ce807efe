//! HTTP handler for the turn endpoint.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ApiError;
use crate::application::TurnOrchestrator;
use crate::domain::foundation::UserId;

use super::dto::TurnRequest;

#[derive(Clone)]
pub struct TurnHandlers {
    orchestrator: Arc<TurnOrchestrator>,
}

impl TurnHandlers {
    pub fn new(orchestrator: Arc<TurnOrchestrator>) -> Self {
        Self { orchestrator }
    }
}

/// POST /api/turns - Process one inbound message
pub async fn post_turn(
    State(handlers): State<TurnHandlers>,
    Json(req): Json<TurnRequest>,
) -> Result<Response, ApiError> {
    let user_id = UserId::new(req.user_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    if req.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }

    let response = handlers.orchestrator.process_turn(&user_id, &req.message).await;
    Ok((StatusCode::OK, Json(response)).into_response())
}
