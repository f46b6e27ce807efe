//! Chatflow - a conversational flow engine.
//!
//! A flow is a graph of steps. Each inbound chat message is one turn: the
//! engine loads the user's session, interprets the input against the
//! current step (navigation commands, validation, option matching),
//! moves the session and renders the next step's prompt.
//!
//! # Layout
//!
//! - [`domain`] - steps, sessions, validation and rendering; no I/O
//! - [`ports`] - the conversation store and flow source seams
//! - [`adapters`] - in-memory store, flow loaders and the HTTP surface
//! - [`application`] - the turn orchestrator and admin handlers
//! - [`config`] - environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
