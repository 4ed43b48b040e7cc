use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::stats::{CallProgress, CallStats};

/// Active calls (call id → progress)
#[derive(Clone, Default)]
pub struct CallRegistry {
    calls: Arc<RwLock<HashMap<String, Arc<CallProgress>>>>,
}

impl CallRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a call; returns false if the call id is already tracked
    pub async fn insert(&self, progress: Arc<CallProgress>) -> bool {
        let mut calls = self.calls.write().await;
        if calls.contains_key(progress.call_id()) {
            return false;
        }
        calls.insert(progress.call_id().to_string(), progress);
        true
    }

    pub async fn remove(&self, call_id: &str) -> Option<Arc<CallProgress>> {
        let mut calls = self.calls.write().await;
        calls.remove(call_id)
    }

    pub async fn get(&self, call_id: &str) -> Option<CallStats> {
        let calls = self.calls.read().await;
        calls.get(call_id).map(|progress| progress.snapshot())
    }

    /// Snapshot of every active call, oldest first
    pub async fn list(&self) -> Vec<CallStats> {
        let calls = self.calls.read().await;
        let mut stats: Vec<CallStats> = calls.values().map(|p| p.snapshot()).collect();
        stats.sort_by_key(|s| s.started_at);
        stats
    }
}
