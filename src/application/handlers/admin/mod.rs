//! Operator-facing services: session introspection and step administration.

mod session_admin;
mod step_admin;

pub use session_admin::SessionAdmin;
pub use step_admin::{DanglingTarget, RegisteredStep, StepAdmin, StepListing};
