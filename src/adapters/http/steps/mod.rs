//! HTTP adapter for step graph administration.

mod handlers;
mod routes;

pub use handlers::StepHandlers;
pub use routes::step_routes;
