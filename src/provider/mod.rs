//! Transcription provider seam
//!
//! A provider accepts a handshake request plus the outbound audio stream and
//! answers with a streaming session id and the inbound result stream. Which
//! shape the results take depends on the [`StreamingMode`] the request was
//! built for.

mod mode;
mod nats;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::audio::OutboundStream;
use crate::error::ProviderError;

pub use mode::StreamingMode;
pub use nats::NatsTranscriptionProvider;

/// Inbound provider events, undecoded beyond JSON
pub type ResponseStream = BoxStream<'static, Result<serde_json::Value, ProviderError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaEncoding {
    Pcm,
}

/// Parameters that differ between the two streaming modes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "Mode")]
pub enum ModeParameters {
    /// Channel layout travels in-band as the first outbound message
    CallAnalytics,
    Transcription {
        #[serde(rename = "EnableChannelIdentification")]
        enable_channel_identification: bool,
        #[serde(rename = "NumberOfChannels")]
        number_of_channels: u16,
    },
}

/// Handshake request for a streaming transcription session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamingRequest {
    pub language_code: String,
    pub media_sample_rate_hertz: u32,
    pub media_encoding: MediaEncoding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_redaction_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pii_entity_types: Option<String>,
    #[serde(flatten)]
    pub mode: ModeParameters,
}

/// Provider acknowledgement of a started stream
pub struct StreamingSessionHandle {
    pub session_id: String,
    pub responses: ResponseStream,
}

impl std::fmt::Debug for StreamingSessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingSessionHandle")
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Perform the handshake and start consuming `audio`.
    ///
    /// Returns once the provider has acknowledged the session; audio keeps
    /// flowing in the background until the outbound stream ends.
    async fn start_stream(
        &self,
        request: StreamingRequest,
        audio: OutboundStream,
    ) -> Result<StreamingSessionHandle, ProviderError>;
}
