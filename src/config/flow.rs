//! Flow configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where the step graph comes from
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct FlowConfig {
    /// YAML or JSON flow file; the built-in support-desk flow is used
    /// when unset
    pub path: Option<PathBuf>,
}

impl FlowConfig {
    /// Validate flow configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.path {
            Some(path) if path.as_os_str().is_empty() => Err(ValidationError::EmptyFlowPath),
            _ => Ok(()),
        }
    }
}
