//! Call session side of the relay
//!
//! - Open parameters handed over by the call session
//! - NATS listener that runs the open/close hooks per call
//! - Registry and statistics of the calls currently active

mod listener;
mod params;
mod registry;
mod stats;

pub use listener::SessionListener;
pub use params::{MediaDescriptor, OpenParams, Participant};
pub use registry::CallRegistry;
pub use stats::{CallProgress, CallStats};
