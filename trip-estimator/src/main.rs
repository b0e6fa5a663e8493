use tracing::info;
use tracing_subscriber::EnvFilter;

use trip_estimator::cache::CachedMapplsClient;
use trip_estimator::config::ServerConfig;
use trip_estimator::mappls::MapplsClient;
use trip_estimator::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();

    // Create Mappls client
    let client = MapplsClient::new(config.mappls)?;

    // Create cached client
    let cached = CachedMapplsClient::new(client, &config.cache);

    // Build app state
    let state = AppState::new(cached, config.estimator);

    // Create router
    let app = create_router(state);

    // Bind and serve
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "trip estimator listening");
    info!("  GET  /health                      - Health check");
    info!("  GET  /api/mappls/route            - Estimate trip cost (query string)");
    info!("  POST /api/estimate                - Estimate trip cost (JSON body)");
    info!("  GET  /api/mappls/search           - Place search");
    info!("  GET  /api/mappls/reverse-geocode  - Reverse geocode");

    axum::serve(listener, app).await?;
    Ok(())
}
