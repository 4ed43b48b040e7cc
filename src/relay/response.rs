// Response relay: drains a provider result stream into the event store on
// its own task. Failures end the task and are only logged.

use futures::stream::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::RelayError;
use crate::provider::{ResponseStream, StreamingMode};
use crate::session::CallProgress;
use crate::sink::EventStore;

/// Handle to a running response relay
pub struct RelayTask {
    call_id: String,
    handle: JoinHandle<()>,
}

impl RelayTask {
    pub fn spawn(
        mode: StreamingMode,
        transaction_id: String,
        responses: ResponseStream,
        store: Arc<dyn EventStore>,
        progress: Arc<CallProgress>,
    ) -> Self {
        let call_id = progress.call_id().to_string();

        let handle = tokio::spawn(async move {
            info!("Response relay started for call {}", progress.call_id());

            match relay_responses(mode, &transaction_id, responses, store.as_ref(), &progress).await
            {
                Ok(written) => info!(
                    "Transcription results stream ended for call {} ({} segments)",
                    progress.call_id(),
                    written
                ),
                Err(e) => error!(
                    "Error processing transcription results for call {}: {}",
                    progress.call_id(),
                    e
                ),
            }
        });

        Self { call_id, handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait up to `grace` for the relay to finish; it keeps running if it does not.
    pub async fn drain(self, grace: Duration) -> bool {
        match tokio::time::timeout(grace, self.handle).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                error!("Response relay for call {} panicked: {}", self.call_id, e);
                true
            }
            Err(_) => {
                warn!(
                    "Response relay for call {} still running after {:?}",
                    self.call_id, grace
                );
                false
            }
        }
    }
}

/// Translate and write every inbound event, in order, one at a time
async fn relay_responses(
    mode: StreamingMode,
    transaction_id: &str,
    mut responses: ResponseStream,
    store: &dyn EventStore,
    progress: &CallProgress,
) -> Result<usize, RelayError> {
    let mut written = 0usize;

    while let Some(event) = responses.next().await {
        let event = event.map_err(RelayError::Inbound)?;

        let Some(record) = mode.translate(event, progress.call_id(), transaction_id) else {
            debug!("Skipping non-transcript event for call {}", progress.call_id());
            continue;
        };

        store.write(&record).await.map_err(RelayError::Write)?;
        progress.record_segment();
        written += 1;
    }

    Ok(written)
}
