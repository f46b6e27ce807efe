//! Integration tests for the HTTP surface.
//!
//! Requests go through the full router (without network I/O) against the
//! built-in support desk flow.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tower::ServiceExt;

use chatflow::adapters::http::{api_router, AppState};
use chatflow::adapters::{EmbeddedFlowSource, InMemoryConversationStore, StoreSettings};
use chatflow::application::{SessionAdmin, StepAdmin, TurnOrchestrator};
use chatflow::ports::{ConversationStore, FlowSource};

// =============================================================================
// Test Infrastructure
// =============================================================================

async fn app() -> Router {
    let registry = EmbeddedFlowSource::support_desk()
        .load()
        .await
        .unwrap()
        .into_registry()
        .unwrap();
    let store: Arc<dyn ConversationStore> = Arc::new(InMemoryConversationStore::new(
        StoreSettings::new(registry.entry().clone()),
    ));
    let registry = Arc::new(RwLock::new(registry));

    api_router(AppState {
        orchestrator: Arc::new(TurnOrchestrator::new(registry.clone(), store.clone())),
        sessions: SessionAdmin::new(store),
        steps: StepAdmin::new(registry),
    })
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => request.body(Body::from(body.to_string())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

// =============================================================================
// Turns
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let app = app().await;

    let (status, body) = call(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn turn_returns_rendered_step() {
    let app = app().await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/turns",
        Some(json!({ "user_id": "+15550001", "message": "hello" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], "welcome");
    assert_eq!(body["outcome"], "menu_repeated");
    assert_eq!(body["options"].as_array().unwrap().len(), 3);
    assert_eq!(body["terminal"], false);
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn empty_message_is_rejected() {
    let app = app().await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/turns",
        Some(json!({ "user_id": "u1", "message": "   " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn empty_user_id_is_rejected() {
    let app = app().await;

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/turns",
        Some(json!({ "user_id": "", "message": "hi" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn session_endpoints_expose_conversation_state() {
    let app = app().await;
    call(
        &app,
        Method::POST,
        "/api/turns",
        Some(json!({ "user_id": "u1", "message": "1" })),
    )
    .await;

    let (status, session) = call(&app, Method::GET, "/api/sessions/u1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["current_step"], "support_menu");
    assert_eq!(session["history"], json!(["welcome"]));

    let (status, messages) = call(&app, Method::GET, "/api/sessions/u1/messages", None).await;
    assert_eq!(status, StatusCode::OK);
    let messages = messages.as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["direction"], "incoming");
    assert_eq!(messages[0]["text"], "1");

    let (status, stats) = call(&app, Method::GET, "/api/sessions/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_tracked_users"], 1);
    assert_eq!(stats["active_sessions"], 1);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let app = app().await;

    let (status, body) = call(&app, Method::GET, "/api/sessions/ghost", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn restart_endpoint_resets_session() {
    let app = app().await;
    call(
        &app,
        Method::POST,
        "/api/turns",
        Some(json!({ "user_id": "u1", "message": "1" })),
    )
    .await;

    let (status, session) = call(&app, Method::POST, "/api/sessions/u1/restart", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["current_step"], "welcome");
    assert_eq!(session["history"], json!([]));
}

// =============================================================================
// Steps
// =============================================================================

#[tokio::test]
async fn step_listing_includes_entry() {
    let app = app().await;

    let (status, body) = call(&app, Method::GET, "/api/steps", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entry"], "welcome");
    assert!(body["steps"].as_array().unwrap().contains(&json!("support_menu")));
    assert_eq!(body["dangling"], json!([]));
}

#[tokio::test]
async fn put_then_delete_step() {
    let app = app().await;
    let document = json!({
        "id": "survey",
        "text": "How did we do?",
        "options": [{ "key": "good", "label": "Good", "target": "goodbye" }]
    });

    let (status, body) = call(&app, Method::PUT, "/api/steps", Some(document.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "survey");
    assert_eq!(body["created"], true);

    let (status, body) = call(&app, Method::PUT, "/api/steps", Some(document)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created"], false);

    let (status, _) = call(&app, Method::DELETE, "/api/steps/survey", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, Method::DELETE, "/api/steps/survey", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn entry_step_cannot_be_deleted() {
    let app = app().await;

    let (status, body) = call(&app, Method::DELETE, "/api/steps/welcome", None).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn reserved_step_ids_are_rejected() {
    let app = app().await;

    let (status, _) = call(
        &app,
        Method::PUT,
        "/api/steps",
        Some(json!({ "id": "error", "text": "nope" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
