//! `maitred gateway` — Start the HTTP server.

use maitred_config::AppConfig;
use tracing::info;

pub async fn run(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port {
        config.gateway.port = port;
    }

    info!(
        host = %config.gateway.host,
        port = config.gateway.port,
        "Starting Maitred gateway"
    );
    maitred_gateway::start(config).await
}
