pub mod audio;
pub mod config;
pub mod error;
pub mod http;
pub mod nats;
pub mod provider;
pub mod relay;
pub mod session;
pub mod sink;

pub use audio::{
    outbound_stream, ChannelConfiguration, ChannelDefinition, MediaFormat, MediaFrame,
    OutboundMessage, OutboundStream, ParticipantRole,
};
pub use config::{Config, TranscribeConfig};
pub use error::{FrameError, ProviderError, RelayError, SinkError};
pub use http::{create_router, AppState};
pub use provider::{
    NatsTranscriptionProvider, StreamingMode, StreamingRequest, StreamingSessionHandle,
    TranscriptionProvider,
};
pub use relay::{ActiveCall, CallRelay, LifecycleState, StreamingSessionController};
pub use session::{CallRegistry, CallStats, MediaDescriptor, OpenParams, SessionListener};
pub use sink::{EventStore, NatsEventStore, SinkEvent};
