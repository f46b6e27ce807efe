//! Flow domain module.
//!
//! The step graph: step definitions, transition rules, input validation,
//! step actions, rendering, and declarative flow documents.

mod action;
mod document;
mod errors;
mod registry;
mod render;
mod step;
mod transition;
mod validation;

pub use action::{ActionError, ActionInput, CaptureInput, StepAction};
pub use document::{
    ComputedKind, FlowDocument, NextDocument, OptionDocument, StepDocument, ValidationDocument,
};
pub use errors::FlowError;
pub use registry::StepRegistry;
pub use render::{RenderedStep, StepRenderer};
pub use step::{StepDefinition, StepOption};
pub use transition::{ComputedTarget, Resolution, Transition};
pub use validation::{validate, CustomPredicate, RuleKind, ValidationOutcome, ValidationRule};
