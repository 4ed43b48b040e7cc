use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallStatus {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TranscriptStatus {
    StartTranscript,
    EndTranscript,
}

/// Channel layout of the relayed audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelLayout {
    Stereo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallEvent {
    pub call_id: String,
    pub event_status: CallStatus,
    pub channel: ChannelLayout,
    pub from_number: Option<String>,
    pub to_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent {
    pub call_id: String,
    pub event_status: TranscriptStatus,
    pub channel: ChannelLayout,
    /// Streaming session id issued by the provider
    pub transaction_id: String,
    pub created_at: DateTime<Utc>,
}

/// Raw provider event tagged with the call it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub event: serde_json::Value,
    pub call_id: String,
    pub transaction_id: String,
    pub created_at: DateTime<Utc>,
}

/// Record written to the event store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SinkEvent {
    CallEvent(CallEvent),
    StatusEvent(StatusEvent),
    TranscriptSegment(Segment),
    AnalyticsSegment(Segment),
}

impl SinkEvent {
    pub fn call(
        call_id: &str,
        status: CallStatus,
        from_number: Option<String>,
        to_number: Option<String>,
    ) -> Self {
        SinkEvent::CallEvent(CallEvent {
            call_id: call_id.to_string(),
            event_status: status,
            channel: ChannelLayout::Stereo,
            from_number,
            to_number,
            created_at: Utc::now(),
        })
    }

    pub fn status(call_id: &str, status: TranscriptStatus, transaction_id: &str) -> Self {
        SinkEvent::StatusEvent(StatusEvent {
            call_id: call_id.to_string(),
            event_status: status,
            channel: ChannelLayout::Stereo,
            transaction_id: transaction_id.to_string(),
            created_at: Utc::now(),
        })
    }

    pub fn transcript(event: serde_json::Value, call_id: &str, transaction_id: &str) -> Self {
        SinkEvent::TranscriptSegment(Segment::new(event, call_id, transaction_id))
    }

    pub fn analytics(event: serde_json::Value, call_id: &str, transaction_id: &str) -> Self {
        SinkEvent::AnalyticsSegment(Segment::new(event, call_id, transaction_id))
    }

    pub fn call_id(&self) -> &str {
        match self {
            SinkEvent::CallEvent(e) => &e.call_id,
            SinkEvent::StatusEvent(e) => &e.call_id,
            SinkEvent::TranscriptSegment(s) | SinkEvent::AnalyticsSegment(s) => &s.call_id,
        }
    }

    /// Short name for logs
    pub fn marker(&self) -> &'static str {
        match self {
            SinkEvent::CallEvent(e) => match e.event_status {
                CallStatus::Start => "START",
                CallStatus::End => "END",
            },
            SinkEvent::StatusEvent(e) => match e.event_status {
                TranscriptStatus::StartTranscript => "START_TRANSCRIPT",
                TranscriptStatus::EndTranscript => "END_TRANSCRIPT",
            },
            SinkEvent::TranscriptSegment(_) => "TRANSCRIPT_SEGMENT",
            SinkEvent::AnalyticsSegment(_) => "ANALYTICS_SEGMENT",
        }
    }
}

impl Segment {
    fn new(event: serde_json::Value, call_id: &str, transaction_id: &str) -> Self {
        Self {
            event,
            call_id: call_id.to_string(),
            transaction_id: transaction_id.to_string(),
            created_at: Utc::now(),
        }
    }
}
