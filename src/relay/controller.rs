use futures::stream::{self, Stream};
use std::sync::Arc;
use tracing::{info, warn};

use crate::audio::{outbound_stream, MediaFrame, OutboundStream};
use crate::config::TranscribeConfig;
use crate::error::RelayError;
use crate::provider::{StreamingMode, StreamingSessionHandle, TranscriptionProvider};
use crate::session::MediaDescriptor;
use crate::sink::{EventStore, SinkEvent, TranscriptStatus};

/// Opens streaming transcription sessions for calls
pub struct StreamingSessionController {
    provider: Arc<dyn TranscriptionProvider>,
    store: Arc<dyn EventStore>,
    config: Arc<TranscribeConfig>,
    mode: StreamingMode,
}

impl StreamingSessionController {
    pub fn new(
        provider: Arc<dyn TranscriptionProvider>,
        store: Arc<dyn EventStore>,
        config: Arc<TranscribeConfig>,
    ) -> Self {
        let mode = StreamingMode::from_config(&config);
        info!("Streaming mode: {}", mode.name());

        Self {
            provider,
            store,
            config,
            mode,
        }
    }

    pub fn mode(&self) -> StreamingMode {
        self.mode
    }

    /// Outbound stream for a call's frames, with the channel configuration this mode needs
    pub fn outbound<S>(&self, frames: S) -> OutboundStream
    where
        S: Stream<Item = MediaFrame> + Send + 'static,
    {
        outbound_stream(frames, self.mode.channel_configuration())
    }

    /// Start the provider stream and write START_TRANSCRIPT once it is acknowledged.
    ///
    /// Segments can only be produced from the returned handle, so none can be
    /// written ahead of the status event. If START_TRANSCRIPT cannot be written
    /// the outbound audio is cut off and the provider sees end of stream.
    pub async fn start_streaming(
        &self,
        call_id: &str,
        media: Option<&MediaDescriptor>,
        outbound: OutboundStream,
    ) -> Result<StreamingSessionHandle, RelayError> {
        let request = self.mode.request(&self.config, media);
        info!(
            "Starting {} stream for call {} ({} Hz, {})",
            self.mode.name(),
            call_id,
            request.media_sample_rate_hertz,
            request.language_code
        );

        let (outbound, abort) = stream::abortable(outbound);

        let handle = self
            .provider
            .start_stream(request, Box::pin(outbound))
            .await
            .map_err(RelayError::Setup)?;

        info!(
            "Received initial response for call {}. Session Id: {}",
            call_id, handle.session_id
        );

        let started = self
            .store
            .write(&SinkEvent::status(
                call_id,
                TranscriptStatus::StartTranscript,
                &handle.session_id,
            ))
            .await;
        if let Err(e) = started {
            warn!("Stopping audio for call {}: START_TRANSCRIPT not written", call_id);
            abort.abort();
            return Err(RelayError::bracket("START_TRANSCRIPT", e));
        }

        Ok(handle)
    }
}
