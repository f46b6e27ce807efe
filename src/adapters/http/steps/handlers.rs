//! HTTP handlers for step administration.
//!
//! Request bodies are flow-document steps, the same shape used in flow
//! files.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ApiError;
use crate::application::StepAdmin;
use crate::domain::flow::StepDocument;
use crate::domain::foundation::StepId;

#[derive(Clone)]
pub struct StepHandlers {
    admin: StepAdmin,
}

impl StepHandlers {
    pub fn new(admin: StepAdmin) -> Self {
        Self { admin }
    }
}

/// GET /api/steps - Entry step, registered ids and dangling targets
pub async fn list_steps(State(handlers): State<StepHandlers>) -> Response {
    (StatusCode::OK, Json(handlers.admin.list().await)).into_response()
}

/// PUT /api/steps - Register or replace a step
pub async fn put_step(
    State(handlers): State<StepHandlers>,
    Json(document): Json<StepDocument>,
) -> Result<Response, ApiError> {
    let registered = handlers.admin.register(document).await?;
    let status = if registered.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(registered)).into_response())
}

/// DELETE /api/steps/:id - Remove a step
pub async fn delete_step(
    State(handlers): State<StepHandlers>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = StepId::new(id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    handlers.admin.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
