//! HTTP adapter - REST surface over the turn orchestrator and admin
//! handlers.
//!
//! Each concern has its own module with handlers and routes; [`router`]
//! composes them.

pub mod error;
pub mod router;
pub mod sessions;
pub mod steps;
pub mod turn;

pub use error::{ApiError, ErrorResponse};
pub use router::{api_router, router, AppState};
