//! HTTP API layer

mod routes;
mod handlers;

pub use handlers::{ErrorResponse, HealthResponse, MenuResponse, MessageResponse};
pub use routes::{create_router, ApiDoc, AppState};
