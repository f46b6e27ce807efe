//! FlowSource port - where flow documents come from.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::flow::{FlowDocument, FlowError};

/// Errors raised while loading a flow document.
#[derive(Debug, Error)]
pub enum FlowSourceError {
    #[error("Flow file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read flow: {0}")]
    Io(String),

    #[error(transparent)]
    Invalid(#[from] FlowError),
}

/// Port for loading the step graph at startup.
#[async_trait]
pub trait FlowSource: Send + Sync {
    /// Loads and parses the flow document. Wiring is checked when the
    /// document is turned into a registry.
    async fn load(&self) -> Result<FlowDocument, FlowSourceError>;

    /// Human-readable origin for logs.
    fn describe(&self) -> String;
}
