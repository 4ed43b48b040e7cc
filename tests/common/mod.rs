// Test doubles for the relay's external collaborators.
#![allow(dead_code)]

use async_trait::async_trait;
use callstream_relay::error::{ProviderError, SinkError};
use callstream_relay::provider::ResponseStream;
use callstream_relay::{
    Config, EventStore, MediaFrame, OutboundMessage, OutboundStream, SinkEvent, StreamingRequest,
    StreamingSessionHandle, TranscriptionProvider,
};
use futures::channel::mpsc;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Event store that keeps every write in memory
#[derive(Default)]
pub struct RecordingStore {
    events: Mutex<Vec<SinkEvent>>,
    fail_on: Option<Box<dyn Fn(&SinkEvent) -> bool + Send + Sync>>,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Store that rejects every event matching `predicate`
    pub fn failing_on<F>(predicate: F) -> Arc<Self>
    where
        F: Fn(&SinkEvent) -> bool + Send + Sync + 'static,
    {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
            fail_on: Some(Box::new(predicate)),
        })
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn markers(&self) -> Vec<&'static str> {
        self.events().iter().map(SinkEvent::marker).collect()
    }

    pub fn position(&self, marker: &str) -> Option<usize> {
        self.markers().iter().position(|m| *m == marker)
    }
}

#[async_trait]
impl EventStore for RecordingStore {
    async fn write(&self, event: &SinkEvent) -> Result<(), SinkError> {
        if let Some(fail_on) = &self.fail_on {
            if fail_on(event) {
                return Err(SinkError::Publish {
                    subject: format!("test.{}", event.call_id()),
                    message: "injected failure".to_string(),
                });
            }
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Provider that replays a scripted response stream and records what it was sent
pub struct ScriptedProvider {
    session_id: String,
    fail_handshake: bool,
    responses: Mutex<Option<ResponseStream>>,
    requests: Mutex<Vec<StreamingRequest>>,
    outbound: Arc<Mutex<Vec<OutboundMessage>>>,
    audio_task: Mutex<Option<JoinHandle<()>>>,
}

impl ScriptedProvider {
    fn with_stream(responses: ResponseStream, fail_handshake: bool) -> Arc<Self> {
        Arc::new(Self {
            session_id: "session-1".to_string(),
            fail_handshake,
            responses: Mutex::new(Some(responses)),
            requests: Mutex::new(Vec::new()),
            outbound: Arc::new(Mutex::new(Vec::new())),
            audio_task: Mutex::new(None),
        })
    }

    /// Provider answering with a fixed list of results
    pub fn replying(responses: Vec<Result<Value, ProviderError>>) -> Arc<Self> {
        Self::with_stream(stream::iter(responses).boxed(), false)
    }

    /// Provider whose results are pushed by the test; dropping the sender ends them
    pub fn channel() -> (
        Arc<Self>,
        mpsc::UnboundedSender<Result<Value, ProviderError>>,
    ) {
        let (tx, rx) = mpsc::unbounded();
        (Self::with_stream(rx.boxed(), false), tx)
    }

    /// Provider that rejects every handshake
    pub fn rejecting() -> Arc<Self> {
        Self::with_stream(stream::empty().boxed(), true)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn requests(&self) -> Vec<StreamingRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Everything the relay streamed out, once the frame stream has ended
    pub async fn outbound(&self) -> Vec<OutboundMessage> {
        let task = self.audio_task.lock().unwrap().take();
        if let Some(task) = task {
            task.await.unwrap();
        }
        self.outbound.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscriptionProvider for ScriptedProvider {
    async fn start_stream(
        &self,
        request: StreamingRequest,
        mut audio: OutboundStream,
    ) -> Result<StreamingSessionHandle, ProviderError> {
        self.requests.lock().unwrap().push(request);

        if self.fail_handshake {
            return Err(ProviderError::Handshake("simulated rejection".to_string()));
        }

        let outbound = Arc::clone(&self.outbound);
        let task = tokio::spawn(async move {
            while let Some(Ok(message)) = audio.next().await {
                outbound.lock().unwrap().push(message);
            }
        });
        *self.audio_task.lock().unwrap() = Some(task);

        let responses = self
            .responses
            .lock()
            .unwrap()
            .take()
            .expect("provider started twice");

        Ok(StreamingSessionHandle {
            session_id: self.session_id.clone(),
            responses,
        })
    }
}

pub fn test_config(analytics_enabled: bool) -> Config {
    let mut config = Config::load_with_env(None, |_| None).unwrap();
    config.transcribe.analytics_enabled = analytics_enabled;
    config
}

pub fn silent_frames(count: usize) -> impl futures::Stream<Item = MediaFrame> + Send + 'static {
    let frames: Vec<MediaFrame> = (0..count)
        .map(|_| MediaFrame::from_samples(&[0i16; 320], 2, 8000))
        .collect();
    stream::iter(frames)
}

/// Poll until `done` holds, giving up after a second
pub async fn wait_until<F: Fn() -> bool>(done: F) {
    for _ in 0..200 {
        if done() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}
