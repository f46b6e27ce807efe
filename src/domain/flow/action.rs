//! Step actions - side effects attached to a step.
//!
//! An action runs after the step's input passed validation and before
//! the transition is resolved. It may only write to the session's context
//! bag; navigation state stays under the engine's control.

use thiserror::Error;

use crate::domain::conversation::{ContextData, ContextError};
use crate::domain::foundation::{StepId, UserId};

/// Errors raised by step actions.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ActionError {
    #[error("Context update failed: {0}")]
    Context(#[from] ContextError),

    #[error("Action failed: {0}")]
    Failed(String),
}

/// What an action gets to see about the current turn.
#[derive(Debug, Clone, Copy)]
pub struct ActionInput<'a> {
    pub user_id: &'a UserId,
    pub step_id: &'a StepId,
    /// Sanitized, trimmed user input.
    pub input: &'a str,
}

/// Side effect attached to a step.
pub trait StepAction: Send + Sync {
    /// Runs the action, optionally recording values in `context`.
    ///
    /// # Errors
    ///
    /// Any error aborts the turn; the engine resets the session and
    /// reports a generic failure to the user.
    fn execute(&self, call: &ActionInput<'_>, context: &mut ContextData) -> Result<(), ActionError>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> StepAction for F
where
    F: Fn(&ActionInput<'_>, &mut ContextData) -> Result<(), ActionError> + Send + Sync,
{
    fn execute(&self, call: &ActionInput<'_>, context: &mut ContextData) -> Result<(), ActionError> {
        self(call, context)
    }
}

/// Stores the user's input in the context bag under a fixed key.
#[derive(Debug, Clone)]
pub struct CaptureInput {
    key: String,
}

impl CaptureInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl StepAction for CaptureInput {
    fn execute(&self, call: &ActionInput<'_>, context: &mut ContextData) -> Result<(), ActionError> {
        context.insert(self.key.clone(), call.input.trim())?;
        Ok(())
    }

    fn name(&self) -> &str {
        "capture_input"
    }
}
