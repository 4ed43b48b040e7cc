// Binding to the call session collaborator over NATS.
//
// The session publishes open parameters on `<prefix>.open`, audio frames on
// `<prefix>.<call id>.audio` and a close marker on `<prefix>.<call id>.close`.
// Each call runs the relay's open hook, then its close hook once the close
// marker arrives.

use anyhow::{Context, Result};
use async_nats::Client;
use async_stream::stream;
use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

use super::params::OpenParams;
use super::registry::CallRegistry;
use super::stats::CallProgress;
use crate::audio::MediaFrame;
use crate::nats::AudioFrameMessage;
use crate::relay::CallRelay;

#[derive(Clone)]
pub struct SessionListener {
    client: Client,
    subject_prefix: String,
    relay: Arc<CallRelay>,
    registry: CallRegistry,
}

impl SessionListener {
    pub fn new(
        client: Client,
        subject_prefix: impl Into<String>,
        relay: Arc<CallRelay>,
        registry: CallRegistry,
    ) -> Self {
        Self {
            client,
            subject_prefix: subject_prefix.into(),
            relay,
            registry,
        }
    }

    /// Accept calls until the open subscription ends
    pub async fn run(self) -> Result<()> {
        let subject = format!("{}.open", self.subject_prefix);
        let mut opens = self
            .client
            .subscribe(subject.clone())
            .await
            .context("Failed to subscribe to session open events")?;

        info!("Listening for calls on {}", subject);

        while let Some(msg) = opens.next().await {
            let params: OpenParams = match serde_json::from_slice(&msg.payload) {
                Ok(params) => params,
                Err(e) => {
                    warn!("Failed to parse open message: {}", e);
                    continue;
                }
            };

            let Some(progress) = admit_call(&self.registry, &params.conversation_id).await else {
                continue;
            };

            let listener = self.clone();
            tokio::spawn(async move {
                let call_id = params.conversation_id.clone();
                if let Err(e) = listener.handle_call(params, progress).await {
                    error!("Call {} failed: {:#}", call_id, e);
                }
                listener.registry.remove(&call_id).await;
            });
        }

        info!("Session open subscription ended");

        Ok(())
    }

    async fn handle_call(&self, params: OpenParams, progress: Arc<CallProgress>) -> Result<()> {
        let call_id = params.conversation_id.clone();

        // Subscribe before opening so no frame or close marker is missed
        let mut close = self
            .client
            .subscribe(format!("{}.{}.close", self.subject_prefix, call_id))
            .await
            .context("Failed to subscribe to close events")?;
        let audio = self
            .client
            .subscribe(format!("{}.{}.audio", self.subject_prefix, call_id))
            .await
            .context("Failed to subscribe to audio frames")?;

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let payloads = audio.map(|msg| msg.payload);
        let frames = audio_frames(call_id.clone(), payloads, stop_rx);

        let call = self
            .relay
            .open_with_progress(params, frames, progress)
            .await
            .context("Failed to open call")?;

        // A dropped subscription counts as a close
        close.next().await;

        let _ = stop_tx.send(());
        let stats = call.close().await;

        info!(
            "Call {} closed after {:.1}s ({} segments)",
            call_id, stats.duration_secs, stats.segments_written
        );

        Ok(())
    }
}

/// Call ids end up as NATS subject tokens, so they may not contain token
/// separators, wildcards or whitespace
pub fn is_valid_call_id(call_id: &str) -> bool {
    !call_id.is_empty()
        && !call_id
            .chars()
            .any(|c| matches!(c, '.' | '*' | '>') || c.is_whitespace())
}

/// Check an incoming call id and reserve it in the registry.
///
/// Returns the progress tracked for the call, or None when the id is unusable
/// or already taken.
async fn admit_call(registry: &CallRegistry, call_id: &str) -> Option<Arc<CallProgress>> {
    if !is_valid_call_id(call_id) {
        warn!("Rejecting call with invalid id {:?}", call_id);
        return None;
    }

    let progress = Arc::new(CallProgress::new(call_id));
    if !registry.insert(Arc::clone(&progress)).await {
        warn!("Call {} is already active", call_id);
        return None;
    }

    Some(progress)
}

/// Decode audio frame payloads until the session marks the last one or
/// `stop` resolves
fn audio_frames<S, F>(
    call_id: String,
    payloads: S,
    stop: F,
) -> impl Stream<Item = MediaFrame> + Send
where
    S: Stream<Item = Bytes> + Send + 'static,
    F: Future + Send + 'static,
    F::Output: Send,
{
    let mut payloads = Box::pin(payloads);

    let frames = stream! {
        while let Some(payload) = payloads.next().await {
            let message: AudioFrameMessage = match serde_json::from_slice(&payload) {
                Ok(message) => message,
                Err(e) => {
                    warn!("Dropping unparseable audio message for call {}: {}", call_id, e);
                    continue;
                }
            };

            let final_frame = message.final_frame;
            match message.into_frame() {
                Ok(Some(frame)) => yield frame,
                Ok(None) => {}
                Err(e) => warn!("Dropping undecodable audio for call {}: {}", call_id, e),
            }

            if final_frame {
                break;
            }
        }
    };

    frames.take_until(stop)
}
