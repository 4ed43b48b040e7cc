// Outbound audio stream for one call.
//
// Turns the session's frame stream into the protocol messages the
// transcription stream expects: an optional channel configuration first,
// then one audio chunk per frame. Nothing is read ahead of the consumer.

use async_stream::stream;
use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use super::frame::MediaFrame;
use crate::error::FrameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantRole {
    Customer,
    Agent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChannelDefinition {
    pub channel_id: u8,
    pub participant_role: ParticipantRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChannelConfiguration {
    pub channel_definitions: Vec<ChannelDefinition>,
}

impl ChannelConfiguration {
    /// Channel 0 carries the customer, channel 1 the agent
    pub fn two_party() -> Self {
        Self {
            channel_definitions: vec![
                ChannelDefinition {
                    channel_id: 0,
                    participant_role: ParticipantRole::Customer,
                },
                ChannelDefinition {
                    channel_id: 1,
                    participant_role: ParticipantRole::Agent,
                },
            ],
        }
    }
}

/// Message on the outbound transcription stream
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundMessage {
    Configuration(ChannelConfiguration),
    /// Linear 16-bit LE PCM
    Audio(Bytes),
}

pub type OutboundStream = Pin<Box<dyn Stream<Item = Result<OutboundMessage, FrameError>> + Send>>;

/// Build the outbound stream for one call.
///
/// When `configuration` is set it is yielded exactly once, before any audio,
/// even if the session never produces a frame. A malformed frame is yielded
/// as an error and ends the stream.
pub fn outbound_stream<S>(frames: S, configuration: Option<ChannelConfiguration>) -> OutboundStream
where
    S: Stream<Item = MediaFrame> + Send + 'static,
{
    Box::pin(stream! {
        if let Some(configuration) = configuration {
            yield Ok(OutboundMessage::Configuration(configuration));
        }

        let mut frames = Box::pin(frames);
        while let Some(frame) = frames.next().await {
            match frame.as_l16() {
                Ok(chunk) => yield Ok(OutboundMessage::Audio(chunk)),
                Err(e) => {
                    yield Err(e);
                    break;
                }
            }
        }
    })
}
