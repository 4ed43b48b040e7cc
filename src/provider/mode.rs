use serde_json::Value;

use super::{MediaEncoding, ModeParameters, StreamingRequest};
use crate::audio::ChannelConfiguration;
use crate::config::TranscribeConfig;
use crate::session::MediaDescriptor;
use crate::sink::SinkEvent;

/// Streaming mode, chosen once per process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamingMode {
    /// Plain transcription with channel identification
    Transcription,
    /// Call analytics transcription
    CallAnalytics,
}

impl StreamingMode {
    pub fn from_config(config: &TranscribeConfig) -> Self {
        if config.analytics_enabled {
            StreamingMode::CallAnalytics
        } else {
            StreamingMode::Transcription
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StreamingMode::Transcription => "transcription",
            StreamingMode::CallAnalytics => "call analytics",
        }
    }

    /// In-band channel configuration this mode needs ahead of the audio
    pub fn channel_configuration(self) -> Option<ChannelConfiguration> {
        match self {
            StreamingMode::CallAnalytics => Some(ChannelConfiguration::two_party()),
            StreamingMode::Transcription => None,
        }
    }

    /// Build the handshake request for one call
    pub fn request(
        self,
        config: &TranscribeConfig,
        media: Option<&MediaDescriptor>,
    ) -> StreamingRequest {
        let sample_rate = media
            .map(|m| m.rate)
            .filter(|&rate| rate > 0)
            .unwrap_or(config.default_sample_rate);

        let mode = match self {
            StreamingMode::CallAnalytics => ModeParameters::CallAnalytics,
            StreamingMode::Transcription => ModeParameters::Transcription {
                enable_channel_identification: true,
                number_of_channels: media
                    .map(|m| m.channels.len() as u16)
                    .filter(|&n| n > 0)
                    .unwrap_or(config.default_channel_count),
            },
        };

        StreamingRequest {
            language_code: config.language_code.clone(),
            media_sample_rate_hertz: sample_rate,
            media_encoding: MediaEncoding::Pcm,
            vocabulary_name: config.vocabulary_name().map(str::to_string),
            content_redaction_type: config.redaction_type().map(str::to_string),
            pii_entity_types: config.pii_entities().map(str::to_string),
            mode,
        }
    }

    /// Map one inbound provider event to the record written to the event store.
    ///
    /// Transcription results without a `TranscriptEvent` payload produce nothing.
    pub fn translate(self, event: Value, call_id: &str, transaction_id: &str) -> Option<SinkEvent> {
        match self {
            StreamingMode::CallAnalytics => Some(SinkEvent::analytics(event, call_id, transaction_id)),
            StreamingMode::Transcription => match event {
                Value::Object(mut fields) => fields
                    .remove("TranscriptEvent")
                    .map(|transcript| SinkEvent::transcript(transcript, call_id, transaction_id)),
                _ => None,
            },
        }
    }
}
