//! File-based Flow Source Adapter
//!
//! Reads a flow document from disk. `.json` files are parsed as JSON,
//! everything else as YAML.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::flow::FlowDocument;
use crate::ports::{FlowSource, FlowSourceError};

/// Flow document stored in a file.
#[derive(Debug, Clone)]
pub struct FileFlowSource {
    path: PathBuf,
}

impl FileFlowSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_json(&self) -> bool {
        self.path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }
}

#[async_trait]
impl FlowSource for FileFlowSource {
    async fn load(&self) -> Result<FlowDocument, FlowSourceError> {
        if !self.path.exists() {
            return Err(FlowSourceError::NotFound(self.path.clone()));
        }

        let source = fs::read_to_string(&self.path)
            .await
            .map_err(|e| FlowSourceError::Io(e.to_string()))?;

        let document = if self.is_json() {
            FlowDocument::from_json(&source)?
        } else {
            FlowDocument::from_yaml(&source)?
        };
        Ok(document)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
