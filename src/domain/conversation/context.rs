//! Per-session context bag.
//!
//! Step actions use the context bag to remember what the user told them
//! (an email address, a ticket number, a menu choice). The engine itself
//! never writes here. Values are restricted to primitives and the bag is
//! bounded so a misbehaving flow cannot grow a session without limit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Maximum number of distinct keys a session may hold.
pub const MAX_CONTEXT_KEYS: usize = 32;

/// Maximum length (in chars) of a text value.
pub const MAX_CONTEXT_TEXT_CHARS: usize = 1_000;

/// Errors raised when writing to the context bag.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("Context is full: {max} keys already stored")]
    CapacityExceeded { max: usize },

    #[error("Context key cannot be empty")]
    EmptyKey,
}

/// A primitive value stored in the context bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl ContextValue {
    /// Returns the text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContextValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::Text(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::Text(value)
    }
}

impl From<f64> for ContextValue {
    fn from(value: f64) -> Self {
        ContextValue::Number(value)
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        ContextValue::Flag(value)
    }
}

/// Bounded, ordered key/value map scoped to one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextData(BTreeMap<String, ContextValue>);

impl ContextData {
    /// Creates an empty context bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value under `key`.
    ///
    /// Overwriting an existing key always succeeds. Text values longer than
    /// [`MAX_CONTEXT_TEXT_CHARS`] are truncated.
    ///
    /// # Errors
    ///
    /// - `EmptyKey` if the key is blank
    /// - `CapacityExceeded` if the key is new and the bag is full
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ContextValue>,
    ) -> Result<(), ContextError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ContextError::EmptyKey);
        }
        if !self.0.contains_key(&key) && self.0.len() >= MAX_CONTEXT_KEYS {
            return Err(ContextError::CapacityExceeded {
                max: MAX_CONTEXT_KEYS,
            });
        }

        let value = match value.into() {
            ContextValue::Text(text) if text.chars().count() > MAX_CONTEXT_TEXT_CHARS => {
                ContextValue::Text(text.chars().take(MAX_CONTEXT_TEXT_CHARS).collect())
            }
            other => other,
        };

        self.0.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ContextValue> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ContextValue)> {
        self.0.iter()
    }
}
