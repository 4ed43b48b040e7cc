use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Live counters for one call, shared between the call and its relay task
#[derive(Debug)]
pub struct CallProgress {
    call_id: String,
    started_at: DateTime<Utc>,
    /// Set once, when the provider acknowledges the stream
    transaction_id: OnceLock<String>,
    segments_written: AtomicUsize,
}

impl CallProgress {
    pub fn new(call_id: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            started_at: Utc::now(),
            transaction_id: OnceLock::new(),
            segments_written: AtomicUsize::new(0),
        }
    }

    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    pub fn set_transaction_id(&self, transaction_id: &str) {
        let _ = self.transaction_id.set(transaction_id.to_string());
    }

    pub fn record_segment(&self) {
        self.segments_written.fetch_add(1, Ordering::SeqCst);
    }

    pub fn segments_written(&self) -> usize {
        self.segments_written.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> CallStats {
        let duration = Utc::now().signed_duration_since(self.started_at);

        CallStats {
            call_id: self.call_id.clone(),
            started_at: self.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            transaction_id: self.transaction_id.get().cloned(),
            segments_written: self.segments_written(),
        }
    }
}

/// Statistics about an active call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallStats {
    pub call_id: String,

    /// When the open hook ran
    pub started_at: DateTime<Utc>,

    /// Time since the open hook ran, in seconds
    pub duration_secs: f64,

    /// Streaming session id, if transcription is running
    pub transaction_id: Option<String>,

    /// Transcript or analytics segments written so far
    pub segments_written: usize,
}
