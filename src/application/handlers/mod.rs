//! Application handlers.
//!
//! - `turn` - Processing inbound messages
//! - `admin` - Session introspection and step administration

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::flow::StepRegistry;

pub mod admin;
pub mod turn;

/// Step registry shared between turns (readers) and administration
/// (writers).
pub type SharedRegistry = Arc<RwLock<StepRegistry>>;

pub use admin::{DanglingTarget, RegisteredStep, SessionAdmin, StepAdmin, StepListing};
pub use turn::{EngineReplies, TurnOrchestrator, TurnOutcome, TurnResponse, TurnSettings};
