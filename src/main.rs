use anyhow::{Context, Result};
use callstream_relay::{
    create_router, nats, AppState, CallRegistry, CallRelay, Config, EventStore, NatsEventStore,
    NatsTranscriptionProvider, SessionListener, TranscriptionProvider,
};
use clap::Parser;
use std::future::IntoFuture;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "callstream-relay", about = "Relay live call audio into streaming transcription")]
struct Args {
    /// Config file (without extension)
    #[arg(long, default_value = "config/callstream-relay")]
    config: String,

    /// Override the HTTP status port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut cfg = Config::load(Some(args.config.as_str()))?;
    if let Some(port) = args.http_port {
        cfg.service.http.port = port;
    }

    info!("Starting {} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!(
        "Transcription: region {}, language {}, analytics {}",
        cfg.transcribe.region, cfg.transcribe.language_code, cfg.transcribe.analytics_enabled
    );

    let client = nats::connect(&cfg.nats.url).await?;

    let store: Arc<dyn EventStore> = if cfg.nats.durable {
        Arc::new(NatsEventStore::durable(client.clone(), cfg.nats.sink_prefix.clone()))
    } else {
        Arc::new(NatsEventStore::new(client.clone(), cfg.nats.sink_prefix.clone()))
    };
    let provider: Arc<dyn TranscriptionProvider> = Arc::new(NatsTranscriptionProvider::new(
        client.clone(),
        cfg.nats.provider_prefix.clone(),
    ));

    let relay = Arc::new(CallRelay::new(&cfg, provider, store));
    let registry = CallRegistry::new();
    let listener = SessionListener::new(
        client,
        cfg.nats.session_prefix.clone(),
        relay,
        registry.clone(),
    );

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let tcp = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind HTTP server to {}", addr))?;
    info!("HTTP status API listening on {}", addr);

    let app = create_router(AppState::new(registry));

    tokio::select! {
        result = listener.run() => {
            if let Err(e) = result {
                error!("Session listener stopped: {:#}", e);
            }
        }
        result = axum::serve(tcp, app).into_future() => {
            result.context("HTTP server failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
        }
    }

    Ok(())
}
