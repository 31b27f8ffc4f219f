use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{info, warn};
use weather_core::WeatherError;

/// HTTP-facing wrapper that turns a [`WeatherError`] into an `ErrorResponse`
/// body with the matching status code.
#[derive(Debug)]
pub struct ApiError(pub WeatherError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            WeatherError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            WeatherError::InvalidCity(_) => StatusCode::BAD_REQUEST,
            WeatherError::CityNotFound { .. } => StatusCode::NOT_FOUND,
            WeatherError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            WeatherError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self.0 {
            WeatherError::CityNotFound { status: upstream } => {
                info!(upstream_status = upstream, "Weather lookup returned no city")
            }
            WeatherError::Unavailable(source) => {
                warn!(error = %source, "Weather provider unreachable")
            }
            other => warn!(error = %other, kind = other.kind(), "Weather lookup failed"),
        }

        (status, Json(self.0.to_response())).into_response()
    }
}
