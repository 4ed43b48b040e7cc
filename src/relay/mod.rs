//! Per-call streaming relay
//!
//! - `controller`: provider handshake and START_TRANSCRIPT
//! - `response`: background task draining results into the event store
//! - `lifecycle`: open/close hooks bracketing the call with lifecycle events

mod controller;
mod lifecycle;
mod response;

pub use controller::StreamingSessionController;
pub use lifecycle::{ActiveCall, CallRelay, LifecycleState};
pub use response::RelayTask;
