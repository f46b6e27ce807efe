//! HTTP adapter for inbound chat messages.

mod dto;
mod handlers;
mod routes;

pub use dto::TurnRequest;
pub use handlers::TurnHandlers;
pub use routes::turn_routes;
