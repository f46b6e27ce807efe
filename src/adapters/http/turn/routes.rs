//! HTTP routes for the turn endpoint.

use axum::{routing::post, Router};

use super::handlers::{post_turn, TurnHandlers};

pub fn turn_routes(handlers: TurnHandlers) -> Router {
    Router::new()
        .route("/", post(post_turn))
        .with_state(handlers)
}
