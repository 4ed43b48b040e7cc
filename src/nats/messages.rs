use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::audio::{ChannelConfiguration, MediaFormat, MediaFrame, OutboundMessage};

/// Audio frame published by the call session
#[derive(Debug, Serialize, Deserialize)]
pub struct AudioFrameMessage {
    pub session_id: String,
    pub sequence: u32,
    pub pcm: String, // Base64-encoded payload in `format`
    #[serde(default = "default_format")]
    pub format: MediaFormat,
    pub sample_rate: u32,
    pub channels: u16,
    pub timestamp: String, // RFC3339 timestamp
    #[serde(rename = "final", default)]
    pub final_frame: bool,
}

fn default_format() -> MediaFormat {
    MediaFormat::L16
}

impl AudioFrameMessage {
    /// Decode into a media frame; `None` for an empty final marker
    pub fn into_frame(self) -> Result<Option<MediaFrame>, base64::DecodeError> {
        if self.pcm.is_empty() {
            return Ok(None);
        }

        let data = base64::engine::general_purpose::STANDARD.decode(&self.pcm)?;
        Ok(Some(MediaFrame::new(
            self.format,
            self.channels,
            self.sample_rate,
            Bytes::from(data),
        )))
    }
}

/// Outbound stream message as sent to the provider
#[derive(Debug, Serialize, Deserialize)]
pub enum AudioStreamMessage {
    ConfigurationEvent(ChannelConfiguration),
    AudioEvent(AudioEvent),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AudioEvent {
    pub audio_chunk: String, // Base64-encoded L16
}

impl From<&OutboundMessage> for AudioStreamMessage {
    fn from(message: &OutboundMessage) -> Self {
        match message {
            OutboundMessage::Configuration(configuration) => {
                AudioStreamMessage::ConfigurationEvent(configuration.clone())
            }
            OutboundMessage::Audio(chunk) => AudioStreamMessage::AudioEvent(AudioEvent {
                audio_chunk: base64::engine::general_purpose::STANDARD.encode(chunk),
            }),
        }
    }
}

/// Provider reply to a stream start request
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StartStreamReply {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
