use futures::stream::Stream;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use super::controller::StreamingSessionController;
use super::response::RelayTask;
use crate::audio::MediaFrame;
use crate::config::Config;
use crate::error::RelayError;
use crate::provider::TranscriptionProvider;
use crate::session::{CallProgress, CallStats, OpenParams};
use crate::sink::{CallStatus, EventStore, SinkEvent, TranscriptStatus};

/// Where a call is in its bracketing lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    Idle,
    /// Call START written, streaming not (yet) acknowledged
    StreamingStarted,
    /// START_TRANSCRIPT written and the response relay running
    StreamingActive,
    Closed,
}

/// Open hook for calls: brackets each call with lifecycle events around its
/// transcription stream
pub struct CallRelay {
    controller: StreamingSessionController,
    store: Arc<dyn EventStore>,
    drain_grace: Duration,
}

impl CallRelay {
    pub fn new(
        config: &Config,
        provider: Arc<dyn TranscriptionProvider>,
        store: Arc<dyn EventStore>,
    ) -> Self {
        let controller = StreamingSessionController::new(
            provider,
            Arc::clone(&store),
            Arc::new(config.transcribe.clone()),
        );

        Self {
            controller,
            store,
            drain_grace: Duration::from_millis(config.relay.drain_grace_ms),
        }
    }

    /// Run the open hook for one call.
    ///
    /// Fails only when the call START event cannot be written. A failed
    /// provider handshake is logged and leaves the call open without a
    /// streaming leg.
    pub async fn open<S>(&self, params: OpenParams, frames: S) -> Result<ActiveCall, RelayError>
    where
        S: Stream<Item = MediaFrame> + Send + 'static,
    {
        let progress = Arc::new(CallProgress::new(params.conversation_id.clone()));
        self.open_with_progress(params, frames, progress).await
    }

    /// Like `open`, recording into progress the caller already tracks
    pub async fn open_with_progress<S>(
        &self,
        params: OpenParams,
        frames: S,
        progress: Arc<CallProgress>,
    ) -> Result<ActiveCall, RelayError>
    where
        S: Stream<Item = MediaFrame> + Send + 'static,
    {
        let call_id = params.conversation_id.clone();
        info!("Conversation Id: {}", call_id);
        if let Some(media) = &params.media {
            info!("Channels supported: {:?}", media.channels);
        }

        let mut call = ActiveCall {
            progress,
            params,
            state: LifecycleState::Idle,
            transaction_id: None,
            setup_error: None,
            relay: None,
            store: Arc::clone(&self.store),
            drain_grace: self.drain_grace,
        };

        let start = SinkEvent::call(
            &call_id,
            CallStatus::Start,
            call.params.participant.ani.clone(),
            call.params.participant.dnis.clone(),
        );
        if let Err(e) = self.store.write(&start).await {
            error!("Failed to write START for call {}: {}", call_id, e);
            return Err(RelayError::bracket("START", e));
        }
        call.state = LifecycleState::StreamingStarted;

        let outbound = self.controller.outbound(frames);
        match self
            .controller
            .start_streaming(&call_id, call.params.media.as_ref(), outbound)
            .await
        {
            Ok(handle) => {
                call.progress.set_transaction_id(&handle.session_id);
                call.relay = Some(RelayTask::spawn(
                    self.controller.mode(),
                    handle.session_id.clone(),
                    handle.responses,
                    Arc::clone(&self.store),
                    Arc::clone(&call.progress),
                ));
                call.transaction_id = Some(handle.session_id);
                call.state = LifecycleState::StreamingActive;
            }
            Err(e) => {
                error!("Transcription setup failed for call {}: {}", call_id, e);
                call.setup_error = Some(e);
            }
        }

        Ok(call)
    }
}

/// A call whose open hook has run; `close` is its close hook
pub struct ActiveCall {
    params: OpenParams,
    state: LifecycleState,
    transaction_id: Option<String>,
    setup_error: Option<RelayError>,
    relay: Option<RelayTask>,
    progress: Arc<CallProgress>,
    store: Arc<dyn EventStore>,
    drain_grace: Duration,
}

impl ActiveCall {
    pub fn call_id(&self) -> &str {
        &self.params.conversation_id
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Streaming session id issued by the provider
    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    /// Why the streaming leg could not be set up, if it could not
    pub fn setup_error(&self) -> Option<&RelayError> {
        self.setup_error.as_ref()
    }

    pub fn progress(&self) -> Arc<CallProgress> {
        Arc::clone(&self.progress)
    }

    /// Whether the response relay has run to completion
    pub fn relay_finished(&self) -> bool {
        self.relay.as_ref().map_or(true, RelayTask::is_finished)
    }

    /// Close hook: END_TRANSCRIPT (when streaming was set up), then call END.
    ///
    /// Does not wait for the response relay unless a drain grace is
    /// configured; trailing segments may still land after END. Write
    /// failures are logged only.
    pub async fn close(mut self) -> CallStats {
        let call_id = self.params.conversation_id.clone();

        if let Some(transaction_id) = self.transaction_id.clone() {
            if let Some(relay) = self.relay.take() {
                if !self.drain_grace.is_zero() {
                    relay.drain(self.drain_grace).await;
                }
            }

            let end_transcript =
                SinkEvent::status(&call_id, TranscriptStatus::EndTranscript, &transaction_id);
            if let Err(e) = self.store.write(&end_transcript).await {
                error!("Failed to write END_TRANSCRIPT for call {}: {}", call_id, e);
            }
        } else {
            warn!("Call {} closed without a transcription session", call_id);
        }

        let end = SinkEvent::call(
            &call_id,
            CallStatus::End,
            self.params.participant.ani.clone(),
            self.params.participant.dnis.clone(),
        );
        if let Err(e) = self.store.write(&end).await {
            error!("Failed to write END for call {}: {}", call_id, e);
        }

        self.state = LifecycleState::Closed;
        info!("Close handler executed for call {}", call_id);

        self.progress.snapshot()
    }
}
