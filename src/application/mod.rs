//! Application layer - use cases over the domain and its ports.
//!
//! The turn orchestrator is the conversational entry point; the admin
//! services back the operational HTTP endpoints.

pub mod handlers;

pub use handlers::{
    DanglingTarget, EngineReplies, RegisteredStep, SessionAdmin, SharedRegistry, StepAdmin,
    StepListing, TurnOrchestrator, TurnOutcome, TurnResponse, TurnSettings,
};
