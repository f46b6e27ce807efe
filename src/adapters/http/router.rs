//! Top-level HTTP router.
//!
//! ```text
//! GET    /health
//! POST   /api/turns
//! GET    /api/sessions/stats
//! GET    /api/sessions/:user_id
//! GET    /api/sessions/:user_id/messages
//! POST   /api/sessions/:user_id/restart
//! GET    /api/steps
//! PUT    /api/steps
//! DELETE /api/steps/:id
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{http::HeaderValue, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::application::{SessionAdmin, StepAdmin, TurnOrchestrator};
use crate::config::ServerConfig;

use super::sessions::{session_routes, SessionHandlers};
use super::steps::{step_routes, StepHandlers};
use super::turn::{turn_routes, TurnHandlers};

/// Everything the HTTP surface needs.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<TurnOrchestrator>,
    pub sessions: SessionAdmin,
    pub steps: StepAdmin,
}

/// Builds the API router without middleware.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/turns", turn_routes(TurnHandlers::new(state.orchestrator)))
        .nest("/api/sessions", session_routes(SessionHandlers::new(state.sessions)))
        .nest("/api/steps", step_routes(StepHandlers::new(state.steps)))
}

/// Builds the API router with tracing, timeout and CORS layers.
pub fn router(state: AppState, server: &ServerConfig) -> Router {
    api_router(state)
        .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_secs)))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
}

/// Any origin when none are configured.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
