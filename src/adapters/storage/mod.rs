//! Storage Adapters
//!
//! Implementations of the ConversationStore port.
//!
//! ## Available Adapters
//!
//! - **InMemoryConversationStore** - Per-user conversations in process memory
//! - **SessionReaper** - Background eviction of inactive conversations
//!
//! ## Usage
//!
//! ```ignore
//! let store = Arc::new(InMemoryConversationStore::new(StoreSettings::new(entry)));
//! let reaper = store.start_reaper(Duration::from_secs(300));
//! // ...
//! reaper.stop().await;
//! ```

mod in_memory_conversation_store;
mod session_reaper;

pub use in_memory_conversation_store::{InMemoryConversationStore, StoreSettings};
pub use session_reaper::{ReaperHandle, SessionReaper};
