// Tests for building the provider handshake request from configuration

use callstream_relay::provider::ModeParameters;
use callstream_relay::{MediaDescriptor, MediaFormat, StreamingMode, TranscribeConfig};

fn media(rate: u32, channels: usize) -> MediaDescriptor {
    MediaDescriptor {
        format: MediaFormat::L16,
        channels: (0..channels).map(|i| format!("ch{}", i)).collect(),
        rate,
    }
}

fn redaction(enabled: bool, kind: Option<&str>, entities: Option<&str>) -> TranscribeConfig {
    TranscribeConfig {
        content_redaction_enabled: enabled,
        content_redaction_type: kind.map(str::to_string),
        pii_entity_types: entities.map(str::to_string),
        ..TranscribeConfig::default()
    }
}

#[test]
fn test_pii_redaction_carries_type_and_entities() {
    let config = redaction(true, Some("PII"), Some("NAME,ADDRESS"));

    for mode in [StreamingMode::CallAnalytics, StreamingMode::Transcription] {
        let request = mode.request(&config, None);
        assert_eq!(request.content_redaction_type.as_deref(), Some("PII"));
        assert_eq!(request.pii_entity_types.as_deref(), Some("NAME,ADDRESS"));
    }
}

#[test]
fn test_disabled_redaction_carries_nothing() {
    let config = redaction(false, Some("PII"), Some("NAME,ADDRESS"));

    let request = StreamingMode::CallAnalytics.request(&config, None);

    assert_eq!(request.content_redaction_type, None);
    assert_eq!(request.pii_entity_types, None);
}

#[test]
fn test_entities_ignored_for_non_pii_redaction() {
    let config = redaction(true, Some("PHI"), Some("NAME,ADDRESS"));

    let request = StreamingMode::CallAnalytics.request(&config, None);

    assert_eq!(request.content_redaction_type.as_deref(), Some("PHI"));
    assert_eq!(request.pii_entity_types, None);
}

#[test]
fn test_redaction_enabled_without_type() {
    let config = redaction(true, None, Some("NAME"));

    let request = StreamingMode::Transcription.request(&config, None);

    assert_eq!(request.content_redaction_type, None);
    assert_eq!(request.pii_entity_types, None);
}

#[test]
fn test_sample_rate_from_session_or_default() {
    let config = TranscribeConfig::default();

    let request = StreamingMode::CallAnalytics.request(&config, Some(&media(16000, 2)));
    assert_eq!(request.media_sample_rate_hertz, 16000);

    let request = StreamingMode::CallAnalytics.request(&config, None);
    assert_eq!(request.media_sample_rate_hertz, 8000);
}

#[test]
fn test_channel_count_from_session_or_default() {
    let config = TranscribeConfig::default();

    let request = StreamingMode::Transcription.request(&config, Some(&media(8000, 1)));
    assert_eq!(
        request.mode,
        ModeParameters::Transcription {
            enable_channel_identification: true,
            number_of_channels: 1,
        }
    );

    for session_media in [None, Some(media(8000, 0))] {
        let request = StreamingMode::Transcription.request(&config, session_media.as_ref());
        assert_eq!(
            request.mode,
            ModeParameters::Transcription {
                enable_channel_identification: true,
                number_of_channels: 2,
            }
        );
    }
}

#[test]
fn test_empty_vocabulary_is_omitted() {
    let mut config = TranscribeConfig::default();
    config.custom_vocabulary_name = Some(String::new());
    assert_eq!(StreamingMode::CallAnalytics.request(&config, None).vocabulary_name, None);

    config.custom_vocabulary_name = Some("call-terms".to_string());
    assert_eq!(
        StreamingMode::CallAnalytics
            .request(&config, None)
            .vocabulary_name
            .as_deref(),
        Some("call-terms")
    );
}

#[test]
fn test_analytics_request_wire_shape() {
    let config = redaction(true, Some("PII"), Some("NAME"));
    let request = StreamingMode::CallAnalytics.request(&config, None);

    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(json["Mode"], "CallAnalytics");
    assert_eq!(json["LanguageCode"], "en-US");
    assert_eq!(json["MediaSampleRateHertz"], 8000);
    assert_eq!(json["MediaEncoding"], "pcm");
    assert_eq!(json["ContentRedactionType"], "PII");
    assert_eq!(json["PiiEntityTypes"], "NAME");
    assert!(json.get("NumberOfChannels").is_none());
    assert!(json.get("VocabularyName").is_none());
}

#[test]
fn test_transcription_request_wire_shape() {
    let request = StreamingMode::Transcription.request(&TranscribeConfig::default(), None);

    let json = serde_json::to_string(&request).unwrap();
    assert!(json.contains("\"Mode\":\"Transcription\""));
    assert!(json.contains("\"EnableChannelIdentification\":true"));
    assert!(json.contains("\"NumberOfChannels\":2"));
    assert!(!json.contains("ContentRedactionType"));

    let parsed: callstream_relay::StreamingRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, request);
}
