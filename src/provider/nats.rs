use async_nats::Client;
use async_stream::stream;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use serde_json::Value;
use tracing::{error, info, warn};

use super::{ResponseStream, StreamingRequest, StreamingSessionHandle, TranscriptionProvider};
use crate::audio::{OutboundMessage, OutboundStream};
use crate::error::ProviderError;
use crate::nats::{AudioStreamMessage, StartStreamReply};

/// Transcription provider reached over NATS request/reply and pub/sub
pub struct NatsTranscriptionProvider {
    client: Client,
    subject_prefix: String,
}

impl NatsTranscriptionProvider {
    pub fn new(client: Client, subject_prefix: impl Into<String>) -> Self {
        Self {
            client,
            subject_prefix: subject_prefix.into(),
        }
    }

    fn session_subject(&self, session_id: &str, suffix: &str) -> String {
        format!("{}.{}.{}", self.subject_prefix, session_id, suffix)
    }
}

#[async_trait]
impl TranscriptionProvider for NatsTranscriptionProvider {
    async fn start_stream(
        &self,
        request: StreamingRequest,
        audio: OutboundStream,
    ) -> Result<StreamingSessionHandle, ProviderError> {
        let subject = format!("{}.start", self.subject_prefix);
        let payload =
            serde_json::to_vec(&request).map_err(|e| ProviderError::Handshake(e.to_string()))?;

        let reply = self
            .client
            .request(subject, payload.into())
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        let reply: StartStreamReply = serde_json::from_slice(&reply.payload)?;
        let session_id = match reply {
            StartStreamReply {
                session_id: Some(id),
                ..
            } => id,
            StartStreamReply { error, .. } => {
                return Err(ProviderError::Handshake(
                    error.unwrap_or_else(|| "reply carried no session id".to_string()),
                ))
            }
        };

        // Subscribe before any audio goes out so no result can be missed
        let results = self
            .client
            .subscribe(self.session_subject(&session_id, "results"))
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        tokio::spawn(pump_audio(
            self.client.clone(),
            session_id.clone(),
            self.session_subject(&session_id, "audio"),
            self.session_subject(&session_id, "end"),
            audio,
        ));

        let responses = result_events(results.map(|msg| msg.payload));

        Ok(StreamingSessionHandle {
            session_id,
            responses,
        })
    }
}

/// Decode result payloads into provider events.
///
/// An empty payload marks the end of the results; if the payloads run out
/// before that marker the stream ends with an error.
fn result_events<S>(payloads: S) -> ResponseStream
where
    S: Stream<Item = Bytes> + Send + 'static,
{
    let mut payloads = Box::pin(payloads);

    stream! {
        loop {
            match payloads.next().await {
                Some(payload) if payload.is_empty() => break,
                Some(payload) => {
                    yield serde_json::from_slice::<Value>(&payload).map_err(ProviderError::from);
                }
                None => {
                    yield Err(ProviderError::Stream(
                        "result subscription closed before end of stream".to_string(),
                    ));
                    break;
                }
            }
        }
    }
    .boxed()
}

/// Forward the outbound stream to the provider, one message at a time
async fn pump_audio(
    client: Client,
    session_id: String,
    audio_subject: String,
    end_subject: String,
    mut audio: OutboundStream,
) {
    let mut chunks = 0usize;

    while let Some(message) = audio.next().await {
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                error!("Stopping audio for session {}: {}", session_id, e);
                break;
            }
        };

        if matches!(message, OutboundMessage::Audio(_)) {
            chunks += 1;
        }

        let payload = match serde_json::to_vec(&AudioStreamMessage::from(&message)) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to encode audio message for session {}: {}", session_id, e);
                break;
            }
        };

        if let Err(e) = client.publish(audio_subject.clone(), payload.into()).await {
            error!("Failed to publish audio for session {}: {}", session_id, e);
            break;
        }
    }

    if let Err(e) = client.publish(end_subject, Bytes::new()).await {
        warn!("Failed to signal end of audio for session {}: {}", session_id, e);
    }

    info!("Audio stream for session {} ended after {} chunks", session_id, chunks);
}
