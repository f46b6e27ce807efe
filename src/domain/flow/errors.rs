//! Error types for the flow domain.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, StepId, ValidationError};

/// Errors raised while defining or administering the step graph.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FlowError {
    #[error("Step not found: {0}")]
    StepNotFound(StepId),

    #[error("Step id '{0}' is reserved")]
    ReservedStepId(StepId),

    #[error("Entry step '{0}' cannot be removed")]
    EntryStepProtected(StepId),

    #[error("Duplicate step id: {0}")]
    DuplicateStep(StepId),

    #[error("Step '{from}' points to unknown step '{to}'")]
    DanglingTarget { from: StepId, to: StepId },

    #[error("Invalid pattern on step '{step}': {reason}")]
    InvalidPattern { step: StepId, reason: String },

    #[error("Invalid step definition: {0}")]
    InvalidDefinition(String),

    #[error("Failed to parse flow document: {0}")]
    Parse(String),
}

impl From<ValidationError> for FlowError {
    fn from(err: ValidationError) -> Self {
        FlowError::InvalidDefinition(err.to_string())
    }
}

impl From<FlowError> for DomainError {
    fn from(err: FlowError) -> Self {
        let code = match &err {
            FlowError::StepNotFound(_) => ErrorCode::StepNotFound,
            FlowError::ReservedStepId(_) => ErrorCode::ReservedStepId,
            FlowError::EntryStepProtected(_) => ErrorCode::EntryStepProtected,
            FlowError::DuplicateStep(_)
            | FlowError::DanglingTarget { .. }
            | FlowError::InvalidPattern { .. }
            | FlowError::InvalidDefinition(_)
            | FlowError::Parse(_) => ErrorCode::InvalidStepDefinition,
        };
        DomainError::new(code, err.to_string())
    }
}
