//! Router, shared state and request handlers.

use std::{sync::Arc, time::Instant};

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::PathRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, instrument, warn};
use weather_core::{
    Config, ServerConfig, WeatherError, WeatherProvider, WeatherResponse, provider_from_config,
};

use crate::{error::ApiError, metrics::GatewayMetrics};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key was configured; lookups then fail without
    /// touching the network.
    provider: Option<Arc<dyn WeatherProvider>>,
    metrics: GatewayMetrics,
}

impl AppState {
    pub fn new(provider: Option<Arc<dyn WeatherProvider>>, metrics: GatewayMetrics) -> Self {
        Self { provider, metrics }
    }

    /// Build the provider from config. A missing API key is tolerated (and
    /// logged); any other construction failure is returned.
    pub fn from_config(config: &Config, metrics: GatewayMetrics) -> Result<Self> {
        let provider: Option<Arc<dyn WeatherProvider>> =
            match provider_from_config(&config.provider) {
                Ok(provider) => Some(Arc::from(provider)),
                Err(WeatherError::MissingApiKey) => {
                    warn!("OPENWEATHER_API_KEY is not set; /weather requests will fail with 500");
                    None
                }
                Err(e) => return Err(e).context("Failed to construct weather provider"),
            };

        Ok(Self::new(provider, metrics))
    }
}

/// Assemble the full gateway: routes, CORS and request tracing.
pub fn router(state: AppState, server: &ServerConfig) -> Result<Router> {
    Ok(Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/weather/:city", get(weather))
        .layer(cors_layer(&server.cors_origins)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Credentialed CORS for the configured origins. Methods and headers are
/// mirrored from the request, since `*` is not allowed with credentials.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::mirror_request()
    } else {
        let values = origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("Invalid CORS origin: {origin:?}"))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Weather Dashboard API is running! 🌤️" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "weather-api" }))
}

async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(body) => {
            ([(header::CONTENT_TYPE, state.metrics.content_type())], body).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Counts the attempt before anything can fail, including path decoding.
#[instrument(skip_all, fields(city))]
async fn weather(
    State(state): State<AppState>,
    city: Result<Path<String>, PathRejection>,
) -> Result<Json<WeatherResponse>, ApiError> {
    let started = Instant::now();
    state.metrics.record_request();

    let Path(city) = city.map_err(|rejection| WeatherError::InvalidCity(rejection.body_text()))?;
    tracing::Span::current().record("city", city.as_str());

    let provider = state.provider.as_ref().ok_or(WeatherError::MissingApiKey)?;
    let weather = provider.current_weather(&city).await?;

    state.metrics.observe_duration(started.elapsed());

    Ok(Json(weather))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_layer_rejects_invalid_origin() {
        let err = cors_layer(&["http://bad\norigin".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Invalid CORS origin"));
    }

    #[test]
    fn from_config_tolerates_missing_key() {
        let state =
            AppState::from_config(&Config::default(), GatewayMetrics::new().unwrap()).unwrap();
        assert!(state.provider.is_none());
    }

    #[test]
    fn from_config_builds_provider_when_key_present() {
        let mut config = Config::default();
        config.provider.api_key = Some("KEY".into());

        let state = AppState::from_config(&config, GatewayMetrics::new().unwrap()).unwrap();
        assert!(state.provider.is_some());
    }
}
