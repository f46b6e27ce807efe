//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the engine to the outside world:
//! - `storage` - In-memory conversation store and the session reaper
//! - `flow` - Flow documents loaded from files or compiled in
//! - `http` - REST endpoints for turns and administration

pub mod flow;
pub mod http;
pub mod storage;

pub use flow::{EmbeddedFlowSource, FileFlowSource};
pub use storage::{InMemoryConversationStore, ReaperHandle, SessionReaper, StoreSettings};
