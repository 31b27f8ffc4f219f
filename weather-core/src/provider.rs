use crate::{
    ProviderConfig, WeatherError, WeatherResponse, provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current weather for a city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, city: &str) -> Result<WeatherResponse, WeatherError>;
}

/// Construct the OpenWeather provider from config.
///
/// Fails with [`WeatherError::MissingApiKey`] before any client is built when
/// no key is configured.
pub fn provider_from_config(
    config: &ProviderConfig,
) -> Result<Box<dyn WeatherProvider>, WeatherError> {
    let api_key = config.api_key().ok_or(WeatherError::MissingApiKey)?;

    let provider =
        OpenWeatherProvider::new(api_key.to_owned(), config.base_url.clone(), config.timeout())
            .map_err(|e| WeatherError::Unexpected(format!("Failed to build HTTP client: {e}")))?;

    Ok(Box::new(provider))
}
