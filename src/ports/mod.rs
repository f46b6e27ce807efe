//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ConversationStore` - Per-user session and message log storage
//! - `FlowSource` - Loading flow documents at startup

mod conversation_store;
mod flow_source;

pub use conversation_store::{ConversationLease, ConversationStore, StoreStats};
pub use flow_source::{FlowSource, FlowSourceError};
