//! Declarative flow documents.
//!
//! A flow is authored as YAML (or JSON) and converted into step
//! definitions. Conversion compiles patterns and checks that the graph is
//! fully wired, so a document that loads is a document that runs.
//!
//! ```yaml
//! entry: welcome
//! steps:
//!   - id: welcome
//!     text: "Hi! How can we help?"
//!     allow_back: false
//!     options:
//!       - { key: support, label: "Technical support", target: support }
//!   - id: support
//!     text: "Describe the problem."
//!     validation: { kind: text, min_length: 5 }
//!     capture: problem
//!     next: welcome
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::StepId;

use super::{
    CaptureInput, ComputedTarget, FlowError, RuleKind, StepDefinition, StepRegistry, Transition,
    ValidationRule,
};

/// A whole flow: entry step plus every step definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowDocument {
    pub entry: String,
    pub steps: Vec<StepDocument>,
}

/// One step as written by a flow author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDocument {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub options: Vec<OptionDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<NextDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationDocument>,
    /// Context key the accepted input is stored under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture: Option<String>,
    #[serde(default = "default_true")]
    pub allow_back: bool,
    #[serde(default = "default_true")]
    pub allow_restart: bool,
    #[serde(default)]
    pub terminal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDocument {
    pub key: String,
    pub label: String,
    pub target: String,
}

/// `next: some_step` or `next: { computed: previous, fallback: some_step }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NextDocument {
    Step(String),
    Computed {
        computed: ComputedKind,
        fallback: String,
    },
}

/// Computed transitions available to documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputedKind {
    /// Top of history, else the fallback.
    Previous,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationDocument {
    #[serde(default)]
    pub kind: RuleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_text: Option<String>,
}

fn default_true() -> bool {
    true
}

impl FlowDocument {
    /// Parses a YAML document.
    ///
    /// # Errors
    ///
    /// `FlowError::Parse` with the parser's message.
    pub fn from_yaml(source: &str) -> Result<Self, FlowError> {
        serde_yaml::from_str(source).map_err(|e| FlowError::Parse(e.to_string()))
    }

    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// `FlowError::Parse` with the parser's message.
    pub fn from_json(source: &str) -> Result<Self, FlowError> {
        serde_json::from_str(source).map_err(|e| FlowError::Parse(e.to_string()))
    }

    /// Converts the document into a fully wired registry.
    ///
    /// # Errors
    ///
    /// Any conversion error of a single step, duplicate or reserved ids,
    /// a missing entry step, or a dangling target.
    pub fn into_registry(self) -> Result<StepRegistry, FlowError> {
        let entry = StepId::new(self.entry)?;
        let steps = self
            .steps
            .into_iter()
            .map(StepDocument::into_definition)
            .collect::<Result<Vec<_>, _>>()?;

        let registry = StepRegistry::from_steps(entry, steps)?;
        registry.check_wiring()?;
        Ok(registry)
    }
}

impl StepDocument {
    /// Converts one step document into a definition.
    ///
    /// Targets are not checked here; a single step may legitimately point
    /// at steps registered later.
    ///
    /// # Errors
    ///
    /// Invalid ids, reserved ids, or a pattern that does not compile.
    pub fn into_definition(self) -> Result<StepDefinition, FlowError> {
        let id = StepId::new(self.id)?;
        if id.is_reserved() {
            return Err(FlowError::ReservedStepId(id));
        }

        let mut step = StepDefinition::new(id.clone(), self.text)
            .allow_back(self.allow_back)
            .allow_restart(self.allow_restart);

        for option in self.options {
            step = step.with_option(option.key, option.label, StepId::new(option.target)?);
        }

        let transition = match self.next {
            None => Transition::OptionTable,
            Some(NextDocument::Step(target)) => Transition::Static(StepId::new(target)?),
            Some(NextDocument::Computed {
                computed: ComputedKind::Previous,
                fallback,
            }) => Transition::Computed(ComputedTarget::previous_or(StepId::new(fallback)?)),
        };
        step = step.with_transition(transition);

        if let Some(validation) = self.validation {
            step = step.with_validation(validation.into_rule(&id)?);
        }
        if let Some(key) = self.capture {
            if key.trim().is_empty() {
                return Err(FlowError::InvalidDefinition(format!(
                    "step '{}' has an empty capture key",
                    id
                )));
            }
            step = step.with_action(CaptureInput::new(key));
        }
        if self.terminal {
            step = step.terminal();
        }
        Ok(step)
    }
}

impl ValidationDocument {
    fn into_rule(self, step: &StepId) -> Result<ValidationRule, FlowError> {
        if self.kind == RuleKind::Custom {
            return Err(FlowError::InvalidDefinition(format!(
                "step '{}': custom rules can only be registered in code",
                step
            )));
        }
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(FlowError::InvalidDefinition(format!(
                    "step '{}': min_length {} exceeds max_length {}",
                    step, min, max
                )));
            }
        }

        let pattern = self
            .pattern
            .map(|p| {
                Regex::new(&p).map_err(|e| FlowError::InvalidPattern {
                    step: step.clone(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        Ok(ValidationRule {
            kind: self.kind,
            required: self.required,
            min_length: self.min_length,
            max_length: self.max_length,
            pattern,
            custom: None,
            error_text: self.error_text,
        })
    }
}
