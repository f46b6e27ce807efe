//! Flow Source Adapters
//!
//! - **FileFlowSource** - YAML or JSON flow documents on disk
//! - **EmbeddedFlowSource** - Flow documents compiled into the binary

mod embedded_flow_source;
mod file_flow_source;

pub use embedded_flow_source::{EmbeddedFlowSource, SUPPORT_DESK_FLOW};
pub use file_flow_source::FileFlowSource;
