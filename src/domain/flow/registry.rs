//! Step Registry - the conversation graph.
//!
//! Holds step definitions by id and resolves a step's outgoing transition
//! for a given input. The registry always contains its entry step.
//!
//! # Example
//!
//! ```
//! use chatflow::domain::flow::{Resolution, StepDefinition, StepRegistry};
//! use chatflow::domain::conversation::Session;
//! use chatflow::domain::foundation::{StepId, Timestamp, UserId};
//!
//! let welcome = StepId::new("welcome").unwrap();
//! let support = StepId::new("support").unwrap();
//!
//! let mut registry = StepRegistry::new(
//!     StepDefinition::new(welcome.clone(), "Hi!").with_option("support", "Support", support.clone()),
//! )
//! .unwrap();
//! registry.register(StepDefinition::new(support.clone(), "How can we help?")).unwrap();
//!
//! let session = Session::new(UserId::new("u1").unwrap(), welcome.clone(), Timestamp::now());
//! let step = registry.get(&welcome).unwrap();
//! assert_eq!(registry.resolve_transition(step, "1", &session), Resolution::Target(support));
//! ```

use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::domain::conversation::{parse_positive_integer, Session};
use crate::domain::foundation::StepId;

use super::{FlowError, Resolution, StepDefinition, StepOption, Transition};

/// Registered steps keyed by id, plus the designated entry step.
#[derive(Debug, Clone)]
pub struct StepRegistry {
    entry: StepId,
    steps: HashMap<StepId, StepDefinition>,
}

impl StepRegistry {
    /// Creates a registry whose entry step is `entry`.
    ///
    /// # Errors
    ///
    /// Returns `ReservedStepId` if the entry step uses a reserved name.
    pub fn new(entry: StepDefinition) -> Result<Self, FlowError> {
        ensure_not_reserved(entry.id())?;
        let entry_id = entry.id().clone();
        let mut steps = HashMap::new();
        steps.insert(entry_id.clone(), entry);
        Ok(Self {
            entry: entry_id,
            steps,
        })
    }

    /// Builds a registry from a full set of steps.
    ///
    /// Unlike [`register`](Self::register), duplicate ids are rejected
    /// rather than replaced.
    ///
    /// # Errors
    ///
    /// `DuplicateStep`, `ReservedStepId`, or `StepNotFound` when no step
    /// carries the entry id.
    pub fn from_steps(
        entry: StepId,
        steps: impl IntoIterator<Item = StepDefinition>,
    ) -> Result<Self, FlowError> {
        let mut map = HashMap::new();
        for step in steps {
            ensure_not_reserved(step.id())?;
            let id = step.id().clone();
            if map.insert(id.clone(), step).is_some() {
                return Err(FlowError::DuplicateStep(id));
            }
        }
        if !map.contains_key(&entry) {
            return Err(FlowError::StepNotFound(entry));
        }
        Ok(Self { entry, steps: map })
    }

    /// The step every new or reset session starts at.
    pub fn entry(&self) -> &StepId {
        &self.entry
    }

    pub fn entry_step(&self) -> &StepDefinition {
        // The entry id is inserted at construction and can never be removed.
        &self.steps[&self.entry]
    }

    /// Inserts or replaces a step. Returns the previous definition, if any.
    ///
    /// # Errors
    ///
    /// Returns `ReservedStepId` for `validation_error` and `error`.
    pub fn register(&mut self, step: StepDefinition) -> Result<Option<StepDefinition>, FlowError> {
        ensure_not_reserved(step.id())?;
        Ok(self.steps.insert(step.id().clone(), step))
    }

    /// Removes a step.
    ///
    /// # Errors
    ///
    /// `EntryStepProtected` for the entry step, `StepNotFound` if absent.
    pub fn remove(&mut self, id: &StepId) -> Result<StepDefinition, FlowError> {
        if *id == self.entry {
            return Err(FlowError::EntryStepProtected(id.clone()));
        }
        self.steps
            .remove(id)
            .ok_or_else(|| FlowError::StepNotFound(id.clone()))
    }

    pub fn get(&self, id: &StepId) -> Option<&StepDefinition> {
        self.steps.get(id)
    }

    pub fn contains(&self, id: &StepId) -> bool {
        self.steps.contains_key(id)
    }

    /// All registered ids, sorted.
    pub fn step_ids(&self) -> Vec<StepId> {
        let mut ids: Vec<StepId> = self.steps.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Resolves where `step` goes for `input`.
    ///
    /// Priority: computed target, then static target, then the option
    /// table. A computed function may return a reserved id to signal
    /// `NoMatch` or `Unroutable` itself.
    pub fn resolve_transition(
        &self,
        step: &StepDefinition,
        input: &str,
        session: &Session,
    ) -> Resolution {
        match step.transition() {
            Transition::Computed(target) => Resolution::from_step_id(target.evaluate(input, session)),
            Transition::Static(target) => Resolution::Target(target.clone()),
            Transition::OptionTable => match_option(step.options(), input),
        }
    }

    /// Every `(from, to)` pair whose target is not registered.
    pub fn dangling_targets(&self) -> Vec<(StepId, StepId)> {
        let mut dangling: Vec<(StepId, StepId)> = self
            .steps
            .values()
            .flat_map(|step| {
                step.static_targets()
                    .into_iter()
                    .filter(|target| !self.steps.contains_key(*target))
                    .map(move |target| (step.id().clone(), target.clone()))
            })
            .collect();
        dangling.sort();
        dangling.dedup();
        dangling
    }

    /// Fails on the first dangling target.
    ///
    /// # Errors
    ///
    /// Returns `DanglingTarget` naming both ends.
    pub fn check_wiring(&self) -> Result<(), FlowError> {
        match self.dangling_targets().into_iter().next() {
            Some((from, to)) => Err(FlowError::DanglingTarget { from, to }),
            None => Ok(()),
        }
    }

    /// Ids reachable from the entry step by following statically known
    /// targets. Unregistered targets are included but not expanded.
    pub fn reachable_from_entry(&self) -> BTreeSet<StepId> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([self.entry.clone()]);

        while let Some(id) = queue.pop_front() {
            if !seen.insert(id.clone()) {
                continue;
            }
            if let Some(step) = self.steps.get(&id) {
                queue.extend(step.static_targets().into_iter().cloned());
            }
        }
        seen
    }
}

fn ensure_not_reserved(id: &StepId) -> Result<(), FlowError> {
    if id.is_reserved() {
        Err(FlowError::ReservedStepId(id.clone()))
    } else {
        Ok(())
    }
}

/// Matches input against an option table.
///
/// A positive number within range selects by position; otherwise the first
/// option whose key equals, or whose label contains, the input wins.
/// Matching ignores case. Blank input never matches.
fn match_option(options: &[StepOption], input: &str) -> Resolution {
    if options.is_empty() {
        return Resolution::Unroutable;
    }

    let trimmed = input.trim();
    if let Some(k) = parse_positive_integer(trimmed) {
        if k <= options.len() {
            return Resolution::Target(options[k - 1].target.clone());
        }
    }

    if trimmed.is_empty() {
        return Resolution::NoMatch;
    }

    let needle = trimmed.to_lowercase();
    options
        .iter()
        .find(|option| {
            option.key.to_lowercase() == needle || option.label.to_lowercase().contains(&needle)
        })
        .map(|option| Resolution::Target(option.target.clone()))
        .unwrap_or(Resolution::NoMatch)
}
