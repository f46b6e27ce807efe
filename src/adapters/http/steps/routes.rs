//! HTTP routes for step administration.

use axum::{
    routing::{delete, get},
    Router,
};

use super::handlers::{delete_step, list_steps, put_step, StepHandlers};

pub fn step_routes(handlers: StepHandlers) -> Router {
    Router::new()
        .route("/", get(list_steps).put(put_step))
        .route("/:id", delete(delete_step))
        .with_state(handlers)
}
