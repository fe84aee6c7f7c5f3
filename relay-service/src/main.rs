use dotenvy::dotenv;
use relay_service::config::{get_configuration, region_from_arn};
use relay_service::observability::init_tracing;
use relay_service::services::upstream::UpstreamClient;
use relay_service::startup::build_router;
use relay_service::AppState;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing("info");

    relay_service::services::metrics::init_metrics();

    let region = region_from_arn(configuration.invocation_arn.as_deref().unwrap_or_default());
    let upstream = Arc::new(UpstreamClient::new(configuration.upstream.clone()));
    info!(base_url = %upstream.base_url(), %region, "Initialized upstream client");

    let app = build_router(AppState::new(upstream, region));

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting relay-service on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
