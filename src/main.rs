//! Chatflow server binary.
//!
//! Loads configuration from the environment, builds the step registry from
//! the configured flow (or the built-in support desk flow), starts the
//! session reaper and serves the HTTP API until Ctrl-C.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chatflow::adapters::http::{router, AppState};
use chatflow::adapters::{EmbeddedFlowSource, FileFlowSource, InMemoryConversationStore, StoreSettings};
use chatflow::application::{SessionAdmin, StepAdmin, TurnOrchestrator, TurnSettings};
use chatflow::config::{AppConfig, ServerConfig};
use chatflow::domain::conversation::InputSanitizer;
use chatflow::ports::{ConversationStore, FlowSource};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server);

    let source: Box<dyn FlowSource> = match &config.flow.path {
        Some(path) => Box::new(FileFlowSource::new(path)),
        None => Box::new(EmbeddedFlowSource::support_desk()),
    };
    let registry = source.load().await?.into_registry()?;
    info!(
        flow = %source.describe(),
        entry = %registry.entry(),
        steps = registry.len(),
        "Flow loaded"
    );

    let store = Arc::new(InMemoryConversationStore::new(
        StoreSettings::new(registry.entry().clone())
            .with_log_capacity(config.engine.message_log_cap)
            .with_session_timeout(config.engine.session_timeout()),
    ));
    let reaper = store.start_reaper(config.engine.reaper_interval());

    let registry = Arc::new(RwLock::new(registry));
    let dyn_store: Arc<dyn ConversationStore> = store.clone();
    let orchestrator = TurnOrchestrator::new(registry.clone(), dyn_store.clone())
        .with_settings(TurnSettings {
            debounce_window: config.engine.debounce_window(),
            max_attempts: config.engine.max_attempts,
        })
        .with_sanitizer(InputSanitizer::new(config.engine.max_input_chars));

    let state = AppState {
        orchestrator: Arc::new(orchestrator),
        sessions: SessionAdmin::new(dyn_store),
        steps: StepAdmin::new(registry),
    };
    let app = router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, environment = ?config.server.environment, "Chatflow listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    reaper.stop().await;
    info!("Shutdown complete");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(server.log_level.clone()));

    let registry = tracing_subscriber::registry().with(filter);
    if server.json_logs() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        return;
    }
    info!("Shutdown signal received");
}
