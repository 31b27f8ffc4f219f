use serde::{Deserialize, Serialize};

/// Current conditions for a city, reshaped from the provider's payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    /// Canonical city name as reported by the provider.
    pub city: String,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Title-cased condition text, e.g. "Light Rain".
    pub description: String,
    /// Relative humidity, percent.
    pub humidity: u8,
    /// Metres per second.
    pub wind_speed: f64,
    /// Provider icon code, e.g. "10d".
    pub icon: String,
    /// ISO 3166 country code.
    pub country: String,
}

/// Uniform body for every error the gateway returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
