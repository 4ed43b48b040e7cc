// Tests for the frame adapter and the outbound stream generator

mod common;

use bytes::Bytes;
use callstream_relay::{
    outbound_stream, ChannelConfiguration, FrameError, MediaFormat, MediaFrame, OutboundMessage,
};
use common::silent_frames;
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_l16_frame_is_not_copied() {
    let frame = MediaFrame::from_samples(&[100, -200, 300, -400], 2, 8000);

    let chunk = frame.as_l16().unwrap();

    assert_eq!(chunk.len(), 8);
    assert_eq!(chunk.as_ptr(), frame.data.as_ptr(), "L16 chunk should view the frame buffer");
}

#[test]
fn test_l16_little_endian_layout() {
    let frame = MediaFrame::from_samples(&[1, -2], 1, 8000);
    let chunk = frame.as_l16().unwrap();

    assert_eq!(&chunk[..], &[0x01, 0x00, 0xFE, 0xFF]);
}

#[test]
fn test_pcmu_frame_decodes_to_l16() {
    // 0xFF is mu-law silence; 2 channels x 4 samples
    let frame = MediaFrame::new(MediaFormat::Pcmu, 2, 8000, Bytes::from_static(&[0xFF; 8]));

    let chunk = frame.as_l16().unwrap();

    assert_eq!(chunk.len(), 16);
    assert!(chunk.iter().all(|&b| b == 0));
}

#[test]
fn test_misaligned_frame_is_rejected() {
    // 3 bytes cannot hold whole 16-bit stereo sample frames
    let frame = MediaFrame::new(MediaFormat::L16, 2, 8000, Bytes::from_static(&[0, 0, 0]));

    match frame.as_l16() {
        Err(FrameError::Misaligned { len, channels }) => {
            assert_eq!(len, 3);
            assert_eq!(channels, 2);
        }
        other => panic!("expected misaligned error, got {:?}", other),
    }
}

#[test]
fn test_zero_channel_frame_is_rejected() {
    let frame = MediaFrame::new(MediaFormat::L16, 0, 8000, Bytes::from_static(&[0, 0]));
    assert!(matches!(frame.as_l16(), Err(FrameError::NoChannels)));
}

#[tokio::test]
async fn test_configuration_is_first_and_only_once() {
    let messages: Vec<_> = outbound_stream(silent_frames(3), Some(ChannelConfiguration::two_party()))
        .collect()
        .await;

    assert_eq!(messages.len(), 4);
    assert!(matches!(
        messages[0],
        Ok(OutboundMessage::Configuration(_))
    ));
    let configurations = messages
        .iter()
        .filter(|m| matches!(m, Ok(OutboundMessage::Configuration(_))))
        .count();
    assert_eq!(configurations, 1);
}

#[tokio::test]
async fn test_configuration_sent_without_frames() {
    let messages: Vec<_> = outbound_stream(silent_frames(0), Some(ChannelConfiguration::two_party()))
        .collect()
        .await;

    assert_eq!(messages.len(), 1);
    match &messages[0] {
        Ok(OutboundMessage::Configuration(configuration)) => {
            assert_eq!(configuration.channel_definitions.len(), 2);
        }
        other => panic!("expected configuration, got {:?}", other),
    }
}

#[tokio::test]
async fn test_no_configuration_in_plain_mode() {
    let messages: Vec<_> = outbound_stream(silent_frames(2), None).collect().await;

    assert_eq!(messages.len(), 2);
    assert!(messages
        .iter()
        .all(|m| matches!(m, Ok(OutboundMessage::Audio(_)))));
}

#[tokio::test]
async fn test_malformed_frame_ends_stream() {
    let frames = stream::iter(vec![
        MediaFrame::from_samples(&[0, 0], 2, 8000),
        MediaFrame::new(MediaFormat::L16, 2, 8000, Bytes::from_static(&[0])),
        MediaFrame::from_samples(&[0, 0], 2, 8000),
    ]);

    let messages: Vec<_> = outbound_stream(frames, None).collect().await;

    assert_eq!(messages.len(), 2);
    assert!(matches!(messages[0], Ok(OutboundMessage::Audio(_))));
    assert!(matches!(messages[1], Err(FrameError::Misaligned { .. })));
}

#[tokio::test]
async fn test_frames_are_pulled_on_demand() {
    let pulled = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&pulled);
    let frames = silent_frames(3).inspect(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let mut outbound = outbound_stream(frames, Some(ChannelConfiguration::two_party()));
    assert_eq!(pulled.load(Ordering::SeqCst), 0);

    // Configuration does not touch the frame source
    outbound.next().await;
    assert_eq!(pulled.load(Ordering::SeqCst), 0);

    outbound.next().await;
    assert_eq!(pulled.load(Ordering::SeqCst), 1);

    outbound.next().await;
    assert_eq!(pulled.load(Ordering::SeqCst), 2);
}
