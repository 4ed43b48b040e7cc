//! HTTP API for monitoring the relay
//!
//! - GET /calls - List active calls
//! - GET /calls/:id - Status of one call
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
