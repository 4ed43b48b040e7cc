use async_nats::{jetstream, Client};
use async_trait::async_trait;
use tracing::debug;

use super::events::SinkEvent;
use crate::error::SinkError;

/// Durable destination for call lifecycle and transcription events
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn write(&self, event: &SinkEvent) -> Result<(), SinkError>;
}

/// Event store backed by NATS, one subject per call id
pub struct NatsEventStore {
    client: Client,
    jetstream: Option<jetstream::Context>,
    subject_prefix: String,
}

impl NatsEventStore {
    /// Publish with core NATS (fire and forget)
    pub fn new(client: Client, subject_prefix: impl Into<String>) -> Self {
        Self {
            client,
            jetstream: None,
            subject_prefix: subject_prefix.into(),
        }
    }

    /// Publish through JetStream and wait for the stream to acknowledge each event
    pub fn durable(client: Client, subject_prefix: impl Into<String>) -> Self {
        let jetstream = jetstream::new(client.clone());
        Self {
            client,
            jetstream: Some(jetstream),
            subject_prefix: subject_prefix.into(),
        }
    }

    pub fn subject_for(&self, call_id: &str) -> String {
        format!("{}.{}", self.subject_prefix, call_id)
    }
}

#[async_trait]
impl EventStore for NatsEventStore {
    async fn write(&self, event: &SinkEvent) -> Result<(), SinkError> {
        let subject = self.subject_for(event.call_id());
        let payload = serde_json::to_vec(event)?;
        let publish_failed = |e: String| SinkError::Publish {
            subject: subject.clone(),
            message: e,
        };

        match &self.jetstream {
            Some(jetstream) => {
                jetstream
                    .publish(subject.clone(), payload.into())
                    .await
                    .map_err(|e| publish_failed(e.to_string()))?
                    .await
                    .map_err(|e| publish_failed(e.to_string()))?;
            }
            None => {
                self.client
                    .publish(subject.clone(), payload.into())
                    .await
                    .map_err(|e| publish_failed(e.to_string()))?;
            }
        }

        debug!("Wrote {} event to {}", event.marker(), subject);

        Ok(())
    }
}
