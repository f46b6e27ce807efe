//! Step definitions - the nodes of the conversation graph.

use std::fmt;
use std::sync::Arc;

use crate::domain::foundation::StepId;

use super::{ComputedTarget, StepAction, Transition, ValidationRule};

/// One selectable option of a step. Options are addressable by 1-based
/// position, by exact key, or by a substring of the label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOption {
    pub key: String,
    pub label: String,
    pub target: StepId,
}

impl StepOption {
    pub fn new(key: impl Into<String>, label: impl Into<String>, target: StepId) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            target,
        }
    }
}

/// A node in the conversation graph.
///
/// Immutable once registered; replacing a step means registering a new
/// definition under the same id.
#[derive(Clone)]
pub struct StepDefinition {
    id: StepId,
    text: String,
    options: Vec<StepOption>,
    transition: Transition,
    validation: Option<ValidationRule>,
    action: Option<Arc<dyn StepAction>>,
    allow_back: bool,
    allow_restart: bool,
    terminal: bool,
}

impl StepDefinition {
    /// Creates a step that branches on its (initially empty) options and
    /// honors back/restart commands.
    pub fn new(id: StepId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            options: Vec::new(),
            transition: Transition::OptionTable,
            validation: None,
            action: None,
            allow_back: true,
            allow_restart: true,
            terminal: false,
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, label: impl Into<String>, target: StepId) -> Self {
        self.options.push(StepOption::new(key, label, target));
        self
    }

    pub fn with_options(mut self, options: impl IntoIterator<Item = StepOption>) -> Self {
        self.options.extend(options);
        self
    }

    /// Routes every accepted input to `target`.
    pub fn with_next(mut self, target: StepId) -> Self {
        self.transition = Transition::Static(target);
        self
    }

    /// Routes accepted input through a function.
    pub fn with_computed_next(mut self, target: ComputedTarget) -> Self {
        self.transition = Transition::Computed(target);
        self
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    pub fn with_validation(mut self, rule: ValidationRule) -> Self {
        self.validation = Some(rule);
        self
    }

    pub fn with_action(mut self, action: impl StepAction + 'static) -> Self {
        self.action = Some(Arc::new(action));
        self
    }

    pub fn with_shared_action(mut self, action: Arc<dyn StepAction>) -> Self {
        self.action = Some(action);
        self
    }

    pub fn allow_back(mut self, allow: bool) -> Self {
        self.allow_back = allow;
        self
    }

    pub fn allow_restart(mut self, allow: bool) -> Self {
        self.allow_restart = allow;
        self
    }

    /// Marks the step as the end of a branch (reported to the transport).
    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    pub fn id(&self) -> &StepId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[StepOption] {
        &self.options
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    pub fn validation(&self) -> Option<&ValidationRule> {
        self.validation.as_ref()
    }

    pub fn action(&self) -> Option<&Arc<dyn StepAction>> {
        self.action.as_ref()
    }

    pub fn allows_back(&self) -> bool {
        self.allow_back
    }

    pub fn allows_restart(&self) -> bool {
        self.allow_restart
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Targets known without running any code: option targets, a static
    /// next step, and whatever a computed target declares.
    pub fn static_targets(&self) -> Vec<&StepId> {
        let mut targets: Vec<&StepId> = self.options.iter().map(|o| &o.target).collect();
        match &self.transition {
            Transition::Static(target) => targets.push(target),
            Transition::Computed(computed) => targets.extend(computed.known_targets()),
            Transition::OptionTable => {}
        }
        targets
    }
}

impl fmt::Debug for StepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDefinition")
            .field("id", &self.id)
            .field("text", &self.text)
            .field("options", &self.options)
            .field("transition", &self.transition)
            .field("validation", &self.validation)
            .field("action", &self.action.as_ref().map(|a| a.name().to_string()))
            .field("allow_back", &self.allow_back)
            .field("allow_restart", &self.allow_restart)
            .field("terminal", &self.terminal)
            .finish()
    }
}
