//! HTTP gateway in front of the OpenWeather current-weather API.
//!
//! Exposes `/`, `/health`, `/metrics` and `/weather/{city}`; the fetch and
//! reshape logic lives in `weather-core`.

pub mod app;
pub mod error;
pub mod metrics;

use anyhow::{Context, Result};
use tracing::info;
use weather_core::Config;

pub use app::{AppState, router};
pub use error::ApiError;
pub use metrics::GatewayMetrics;

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: Config) -> Result<()> {
    let metrics = GatewayMetrics::new().context("Failed to register metrics")?;
    let state = AppState::from_config(&config, metrics)?;
    let app = router(state, &config.server)?;

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(
        address = %addr,
        upstream = %config.provider.base_url,
        timeout_secs = config.provider.timeout_secs,
        "Weather gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Weather gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
