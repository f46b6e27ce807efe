//! Domain layer containing the conversation engine's business logic.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, errors)
//! - `conversation` - Per-user sessions, message logs, input handling
//! - `flow` - Step graph, transitions, validation, rendering

pub mod conversation;
pub mod flow;
pub mod foundation;
