use crate::session::CallRegistry;

/// Shared application state for HTTP handlers
#[derive(Clone, Default)]
pub struct AppState {
    /// Active calls (call id → progress)
    pub calls: CallRegistry,
}

impl AppState {
    pub fn new(calls: CallRegistry) -> Self {
        Self { calls }
    }
}
