//! Transition rules - how a step chooses the next step.

use std::fmt;
use std::sync::Arc;

use crate::domain::conversation::Session;
use crate::domain::foundation::StepId;

type ComputeFn = dyn Fn(&str, &Session) -> StepId + Send + Sync;

/// A next-step function of the input and the session.
///
/// The function must be pure: it reads the session but cannot change it.
#[derive(Clone)]
pub struct ComputedTarget {
    name: String,
    compute: Arc<ComputeFn>,
    /// Targets the function is known to produce, for graph checks.
    known_targets: Vec<StepId>,
}

impl ComputedTarget {
    pub fn new(
        name: impl Into<String>,
        compute: impl Fn(&str, &Session) -> StepId + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            compute: Arc::new(compute),
            known_targets: Vec::new(),
        }
    }

    /// Declares a target the function may return so wiring checks can
    /// follow it.
    pub fn with_known_target(mut self, target: StepId) -> Self {
        self.known_targets.push(target);
        self
    }

    /// Returns to the most recently visited step, or `fallback` when the
    /// history is empty.
    pub fn previous_or(fallback: StepId) -> Self {
        let known = fallback.clone();
        Self::new("previous", move |_, session| {
            session
                .previous_step()
                .cloned()
                .unwrap_or_else(|| fallback.clone())
        })
        .with_known_target(known)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn known_targets(&self) -> &[StepId] {
        &self.known_targets
    }

    pub fn evaluate(&self, input: &str, session: &Session) -> StepId {
        (self.compute)(input, session)
    }
}

impl fmt::Debug for ComputedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputedTarget")
            .field("name", &self.name)
            .field("known_targets", &self.known_targets)
            .finish_non_exhaustive()
    }
}

/// Which rule governs the next step.
///
/// Exactly one applies per step; the kind is explicit rather than inferred
/// from which fields happen to be set.
#[derive(Debug, Clone, Default)]
pub enum Transition {
    /// Branch on the step's options (number, key or label match).
    #[default]
    OptionTable,
    /// Always go to the same step.
    Static(StepId),
    /// Ask a function.
    Computed(ComputedTarget),
}

/// Outcome of resolving a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Move to this step (it may still turn out to be unregistered).
    Target(StepId),
    /// The input matched no option (`validation_error`).
    NoMatch,
    /// The step has no way to route any input (`error`).
    Unroutable,
}

impl Resolution {
    /// Maps a raw step id onto a resolution, recognizing the reserved
    /// pseudo-state names.
    pub fn from_step_id(id: StepId) -> Self {
        match id.as_str() {
            StepId::VALIDATION_ERROR => Resolution::NoMatch,
            StepId::ERROR => Resolution::Unroutable,
            _ => Resolution::Target(id),
        }
    }

    /// The identifier this resolution stands for, reserved names included.
    pub fn as_str(&self) -> &str {
        match self {
            Resolution::Target(id) => id.as_str(),
            Resolution::NoMatch => StepId::VALIDATION_ERROR,
            Resolution::Unroutable => StepId::ERROR,
        }
    }
}
