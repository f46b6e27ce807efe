//! Turn processing: orchestration, replies and responses.

mod orchestrator;
mod replies;
mod response;

pub use orchestrator::{TurnOrchestrator, TurnSettings};
pub use replies::EngineReplies;
pub use response::{TurnOutcome, TurnResponse};
