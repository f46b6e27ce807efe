//! HTTP routes for session endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_messages, get_session, get_stats, restart_session, SessionHandlers};

pub fn session_routes(handlers: SessionHandlers) -> Router {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/:user_id", get(get_session))
        .route("/:user_id/messages", get(get_messages))
        .route("/:user_id/restart", post(restart_session))
        .with_state(handlers)
}
