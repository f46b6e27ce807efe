//! Step graph administration.
//!
//! Writes take the registry's write lock, so they land between turns,
//! never in the middle of one.

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::flow::{FlowError, StepDocument};
use crate::domain::foundation::StepId;

use crate::application::handlers::SharedRegistry;

/// Current shape of the step graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepListing {
    pub entry: StepId,
    pub steps: Vec<StepId>,
    pub dangling: Vec<DanglingTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingTarget {
    pub from: StepId,
    pub to: StepId,
}

/// Result of registering a step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisteredStep {
    pub id: StepId,
    /// False when an existing definition was replaced.
    pub created: bool,
    /// Targets of the new step that are not registered yet.
    pub dangling: Vec<StepId>,
}

#[derive(Clone)]
pub struct StepAdmin {
    registry: SharedRegistry,
}

impl StepAdmin {
    pub fn new(registry: SharedRegistry) -> Self {
        Self { registry }
    }

    pub async fn list(&self) -> StepListing {
        let registry = self.registry.read().await;
        StepListing {
            entry: registry.entry().clone(),
            steps: registry.step_ids(),
            dangling: registry
                .dangling_targets()
                .into_iter()
                .map(|(from, to)| DanglingTarget { from, to })
                .collect(),
        }
    }

    /// Registers or replaces a step.
    ///
    /// Targets that do not exist yet are allowed so a flow can be built
    /// step by step; they are reported back and logged.
    ///
    /// # Errors
    ///
    /// Any `FlowError` from converting the document.
    pub async fn register(&self, document: StepDocument) -> Result<RegisteredStep, FlowError> {
        let definition = document.into_definition()?;
        let id = definition.id().clone();

        let mut registry = self.registry.write().await;
        let dangling: Vec<StepId> = definition
            .static_targets()
            .into_iter()
            .filter(|target| **target != id && !registry.contains(target))
            .cloned()
            .collect();
        let created = registry.register(definition)?.is_none();

        if dangling.is_empty() {
            info!(step = %id, created, "Step registered");
        } else {
            warn!(step = %id, created, ?dangling, "Step registered with unknown targets");
        }
        Ok(RegisteredStep { id, created, dangling })
    }

    /// # Errors
    ///
    /// `EntryStepProtected` or `StepNotFound`.
    pub async fn remove(&self, id: &StepId) -> Result<(), FlowError> {
        self.registry.write().await.remove(id)?;
        info!(step = %id, "Step removed");
        Ok(())
    }
}
