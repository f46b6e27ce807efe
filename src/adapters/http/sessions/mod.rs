//! HTTP adapter for session introspection.

mod dto;
mod handlers;
mod routes;

pub use dto::{MessageResponse, SessionResponse};
pub use handlers::SessionHandlers;
pub use routes::session_routes;
