use anyhow::{Context, Result};
use async_nats::Client;
use tracing::info;

/// Connect to NATS server
pub async fn connect(url: &str) -> Result<Client> {
    info!("Connecting to NATS at {}", url);

    let client = async_nats::connect(url)
        .await
        .context("Failed to connect to NATS")?;

    info!("Connected to NATS successfully");

    Ok(client)
}
