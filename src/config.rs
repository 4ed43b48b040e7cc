use anyhow::Result;
use serde::Deserialize;

/// Environment variables recognised on top of the config file, mapped to config keys.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("AWS_REGION", "transcribe.region"),
    ("TRANSCRIBE_LANGUAGE_CODE", "transcribe.language_code"),
    ("CUSTOM_VOCABULARY_NAME", "transcribe.custom_vocabulary_name"),
    ("CONTENT_REDACTION_TYPE", "transcribe.content_redaction_type"),
    ("TRANSCRIBE_PII_ENTITY_TYPES", "transcribe.pii_entity_types"),
    ("NATS_URL", "nats.url"),
];

/// Flag variables; only the exact value `true` switches a flag on
const ENV_FLAGS: &[(&str, &str)] = &[
    ("IS_CONTENT_REDACTION_ENABLED", "transcribe.content_redaction_enabled"),
    ("IS_TCA_ENABLED", "transcribe.analytics_enabled"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub nats: NatsConfig,
    pub transcribe: TranscribeConfig,
    pub relay: RelaySettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    pub url: String,
    /// Subject prefix the session collaborator publishes open/audio/close events on
    pub session_prefix: String,
    /// Subject prefix of the transcription provider
    pub provider_prefix: String,
    /// Subject prefix for sink events (one subject per call id)
    pub sink_prefix: String,
    /// Publish sink events through JetStream and wait for the ack
    pub durable: bool,
}

/// Transcription settings, fixed for the lifetime of the process
#[derive(Debug, Clone, Deserialize)]
pub struct TranscribeConfig {
    pub region: String,
    pub language_code: String,
    pub custom_vocabulary_name: Option<String>,
    pub content_redaction_enabled: bool,
    pub content_redaction_type: Option<String>,
    /// Comma separated entity list, e.g. "NAME,ADDRESS"
    pub pii_entity_types: Option<String>,
    /// Call analytics mode instead of plain transcription
    pub analytics_enabled: bool,
    /// Used when the session does not report a sample rate
    pub default_sample_rate: u32,
    /// Used when the session does not report its channels
    pub default_channel_count: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelaySettings {
    /// How long the close hook waits for in-flight results (0 = never wait)
    pub drain_grace_ms: u64,
}

impl TranscribeConfig {
    pub fn vocabulary_name(&self) -> Option<&str> {
        non_empty(&self.custom_vocabulary_name)
    }

    /// Redaction type to send, only when redaction is enabled
    pub fn redaction_type(&self) -> Option<&str> {
        if self.content_redaction_enabled {
            non_empty(&self.content_redaction_type)
        } else {
            None
        }
    }

    /// PII entity list to send, only for enabled PII redaction
    pub fn pii_entities(&self) -> Option<&str> {
        match self.redaction_type() {
            Some("PII") => non_empty(&self.pii_entity_types),
            _ => None,
        }
    }
}

impl Default for TranscribeConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            language_code: "en-US".to_string(),
            custom_vocabulary_name: None,
            content_redaction_enabled: true,
            content_redaction_type: None,
            pii_entity_types: None,
            analytics_enabled: true,
            default_sample_rate: 8000,
            default_channel_count: 2,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl Config {
    /// Load defaults, then the optional config file, then environment overrides
    pub fn load(path: Option<&str>) -> Result<Self> {
        Self::load_with_env(path, |name| std::env::var(name).ok())
    }

    pub fn load_with_env<F>(path: Option<&str>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = config::Config::builder()
            .set_default("service.name", "callstream-relay")?
            .set_default("service.http.bind", "0.0.0.0")?
            .set_default("service.http.port", 8080)?
            .set_default("nats.url", "nats://localhost:4222")?
            .set_default("nats.session_prefix", "audiohook")?
            .set_default("nats.provider_prefix", "transcribe")?
            .set_default("nats.sink_prefix", "lca.calls")?
            .set_default("nats.durable", false)?
            .set_default("transcribe.region", "us-east-1")?
            .set_default("transcribe.language_code", "en-US")?
            .set_default("transcribe.content_redaction_enabled", true)?
            .set_default("transcribe.analytics_enabled", true)?
            .set_default("transcribe.default_sample_rate", 8000)?
            .set_default("transcribe.default_channel_count", 2)?
            .set_default("relay.drain_grace_ms", 0)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        for &(var, key) in ENV_OVERRIDES {
            if let Some(value) = env(var).filter(|v| !v.is_empty()) {
                builder = builder.set_override(key, value)?;
            }
        }

        for &(var, key) in ENV_FLAGS {
            if let Some(value) = env(var).filter(|v| !v.is_empty()) {
                builder = builder.set_override(key, value == "true")?;
            }
        }

        let settings = builder.build()?;

        Ok(settings.try_deserialize()?)
    }
}
