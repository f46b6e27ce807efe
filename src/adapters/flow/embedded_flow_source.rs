//! Flow document compiled into the binary.

use async_trait::async_trait;

use crate::domain::flow::FlowDocument;
use crate::ports::{FlowSource, FlowSourceError};

/// Support-desk flow used when no flow file is configured.
pub const SUPPORT_DESK_FLOW: &str = include_str!("../../../flows/support_desk.yaml");

/// Flow document held in memory.
#[derive(Debug, Clone)]
pub struct EmbeddedFlowSource {
    name: String,
    source: &'static str,
}

impl EmbeddedFlowSource {
    pub fn new(name: impl Into<String>, source: &'static str) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }

    pub fn support_desk() -> Self {
        Self::new("support_desk (built-in)", SUPPORT_DESK_FLOW)
    }
}

#[async_trait]
impl FlowSource for EmbeddedFlowSource {
    async fn load(&self) -> Result<FlowDocument, FlowSourceError> {
        Ok(FlowDocument::from_yaml(self.source)?)
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}
