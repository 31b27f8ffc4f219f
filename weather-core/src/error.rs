use thiserror::Error;

use crate::model::ErrorResponse;

/// Every way a weather lookup can fail.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("API key not configured")]
    MissingApiKey,

    /// The city path segment could not be decoded.
    #[error("Invalid city: {0}")]
    InvalidCity(String),

    /// Any non-200 answer from the provider. The real status is kept for logs
    /// only; callers always see "City not found".
    #[error("City not found")]
    CityNotFound { status: u16 },

    #[error("Weather service unavailable")]
    Unavailable(#[source] reqwest::Error),

    #[error("{0}")]
    Unexpected(String),
}

impl WeatherError {
    /// Stable machine-readable kind, used as `ErrorResponse::error`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingApiKey => "configuration_error",
            Self::InvalidCity(_) => "invalid_request",
            Self::CityNotFound { .. } => "city_not_found",
            Self::Unavailable(_) => "service_unavailable",
            Self::Unexpected(_) => "internal_error",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse { error: self.kind().to_string(), message: self.to_string() }
    }
}
