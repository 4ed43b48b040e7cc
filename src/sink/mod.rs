//! Event store records and the stores they are written to

mod events;
mod store;

pub use events::{
    CallEvent, CallStatus, ChannelLayout, Segment, SinkEvent, StatusEvent, TranscriptStatus,
};
pub use store::{EventStore, NatsEventStore};
