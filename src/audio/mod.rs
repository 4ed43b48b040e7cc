pub mod frame;
pub mod outbound;

pub use frame::{MediaFormat, MediaFrame};
pub use outbound::{
    outbound_stream, ChannelConfiguration, ChannelDefinition, OutboundMessage, OutboundStream,
    ParticipantRole,
};
