//! Conversation domain module.
//!
//! Per-user conversation state: the session (position in the step graph,
//! backtracking history, attempt counter, context bag) and the bounded
//! message log used for debounce and repeat suppression.

mod context;
mod conversation;
mod input;
mod message_log;
mod session;

pub use context::{ContextData, ContextError, ContextValue, MAX_CONTEXT_KEYS, MAX_CONTEXT_TEXT_CHARS};
pub use conversation::Conversation;
pub use input::{parse_positive_integer, ControlCommand, InputSanitizer, DEFAULT_MAX_INPUT_CHARS};
pub use message_log::{Direction, MessageLog, MessageLogEntry, DEFAULT_LOG_CAPACITY};
pub use session::{Session, SessionSnapshot};
