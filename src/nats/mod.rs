pub mod client;
pub mod messages;

pub use client::connect;
pub use messages::{AudioEvent, AudioFrameMessage, AudioStreamMessage, StartStreamReply};
