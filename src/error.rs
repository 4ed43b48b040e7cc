use thiserror::Error;

/// Malformed audio frame handed over by the session
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame declares zero channels")]
    NoChannels,

    #[error("{len} byte payload is not a whole number of {channels}-channel sample frames")]
    Misaligned { len: usize, channels: u16 },
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider connection failed: {0}")]
    Connection(String),

    #[error("provider rejected stream: {0}")]
    Handshake(String),

    #[error("provider stream failed: {0}")]
    Stream(String),

    #[error("undecodable provider event: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to encode sink event: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to publish to {subject}: {message}")]
    Publish { subject: String, message: String },
}

/// Failures of one call's relay, grouped by where they happen
#[derive(Debug, Error)]
pub enum RelayError {
    /// Provider handshake failed; the call has no streaming leg
    #[error("transcription setup failed: {0}")]
    Setup(#[source] ProviderError),

    #[error("reading transcription results failed: {0}")]
    Inbound(#[source] ProviderError),

    #[error("writing transcription result failed: {0}")]
    Write(#[source] SinkError),

    /// A lifecycle marker could not be written
    #[error("failed to write {marker} event: {source}")]
    Bracket {
        marker: &'static str,
        #[source]
        source: SinkError,
    },
}

impl RelayError {
    pub fn bracket(marker: &'static str, source: SinkError) -> Self {
        Self::Bracket { marker, source }
    }
}
