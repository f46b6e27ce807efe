//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Opaque, stable identifier of a conversation party (phone number, chat id, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty or whitespace only.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a step in the conversation graph.
///
/// Two names are reserved for pseudo-states produced by transition
/// resolution and can never be registered as real steps:
/// [`StepId::VALIDATION_ERROR`] and [`StepId::ERROR`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    /// Pseudo-state: input did not match any option.
    pub const VALIDATION_ERROR: &'static str = "validation_error";

    /// Pseudo-state: the step has no way to route the input.
    pub const ERROR: &'static str = "error";

    /// Creates a new StepId, returning error if empty.
    ///
    /// Surrounding whitespace is trimmed.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("step_id"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks whether this id names one of the reserved pseudo-states.
    pub fn is_reserved(&self) -> bool {
        self.0 == Self::VALIDATION_ERROR || self.0 == Self::ERROR
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StepId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Correlation id for a single processed turn, used in log spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(Uuid);

impl TurnId {
    /// Creates a new random TurnId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_accepts_non_empty_string() {
        let id = UserId::new("5511999990000").unwrap();
        assert_eq!(id.as_str(), "5511999990000");
    }

    #[test]
    fn user_id_rejects_empty_string() {
        let result = UserId::new("");
        match result {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "user_id"),
            _ => panic!("Expected EmptyField error"),
        }
    }

    #[test]
    fn user_id_rejects_whitespace_only() {
        assert!(UserId::new("   ").is_err());
    }

    #[test]
    fn step_id_trims_whitespace() {
        let id = StepId::new("  welcome ").unwrap();
        assert_eq!(id.as_str(), "welcome");
    }

    #[test]
    fn step_id_rejects_empty_string() {
        assert!(StepId::new(" ").is_err());
    }

    #[test]
    fn step_id_reports_reserved_names() {
        assert!(StepId::new("validation_error").unwrap().is_reserved());
        assert!(StepId::new("error").unwrap().is_reserved());
        assert!(!StepId::new("welcome").unwrap().is_reserved());
    }

    #[test]
    fn step_id_parses_from_str() {
        let id: StepId = "open_ticket".parse().unwrap();
        assert_eq!(id.to_string(), "open_ticket");
    }

    #[test]
    fn turn_id_generates_unique_values() {
        assert_ne!(TurnId::new(), TurnId::new());
    }
}
