use serde::{Deserialize, Serialize};

use crate::audio::MediaFormat;

/// Media negotiated for the call by the session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaDescriptor {
    pub format: MediaFormat,
    /// Channel names in interleaving order (e.g. ["external", "internal"])
    pub channels: Vec<String>,
    /// Sample rate in Hz
    pub rate: u32,
}

/// Originating and destination numbers of the call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Participant {
    pub ani: Option<String>,
    pub dnis: Option<String>,
}

/// Parameters the session hands to the open hook
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenParams {
    /// Stable for the lifetime of the call; used as the call id
    pub conversation_id: String,

    #[serde(default)]
    pub media: Option<MediaDescriptor>,

    #[serde(default)]
    pub participant: Participant,
}

impl OpenParams {
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            media: None,
            participant: Participant::default(),
        }
    }

    pub fn with_media(mut self, media: MediaDescriptor) -> Self {
        self.media = Some(media);
        self
    }

    pub fn with_participant(mut self, ani: impl Into<String>, dnis: impl Into<String>) -> Self {
        self.participant = Participant {
            ani: Some(ani.into()),
            dnis: Some(dnis.into()),
        };
        self
    }
}
