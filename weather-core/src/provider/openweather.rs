use async_trait::async_trait;
use reqwest::{Client, StatusCode, redirect};
use serde::{Deserialize, Deserializer, de};
use std::{fmt, time::Duration};
use tracing::{Level, debug};

use crate::{WeatherError, model::WeatherResponse};

use super::WeatherProvider;

/// Client for OpenWeather's `/weather` (current conditions) endpoint.
#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(
        api_key: String,
        base_url: String,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        // A 3xx from the provider is a failed lookup, not something to chase.
        let mut builder = Client::builder().redirect(redirect::Policy::none());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: builder.build()?,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/weather", self.base_url)
    }
}

impl fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    #[serde(deserialize_with = "integral_percent")]
    humidity: u8,
}

/// Accepts `81` as well as `81.0`; rejects fractions and out-of-range values.
fn integral_percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.fract() != 0.0 || !(0.0..=f64::from(u8::MAX)).contains(&value) {
        return Err(de::Error::custom(format!("humidity must be a whole percentage, got {value}")));
    }
    Ok(value as u8)
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
}

impl TryFrom<OwCurrentResponse> for WeatherResponse {
    type Error = WeatherError;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        let condition = parsed.weather.into_iter().next().ok_or_else(|| {
            WeatherError::Unexpected("OpenWeather response contained no weather entries".into())
        })?;

        Ok(WeatherResponse {
            city: parsed.name,
            temperature: parsed.main.temp,
            description: title_case(&condition.description),
            humidity: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
            icon: condition.icon,
            country: parsed.sys.country,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<WeatherResponse, WeatherError> {
        let res = self
            .http
            .get(self.endpoint())
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .map_err(WeatherError::Unavailable)?;

        let status = res.status();
        if status != StatusCode::OK {
            if tracing::enabled!(Level::DEBUG) {
                let body = res.text().await.unwrap_or_default();
                debug!(%status, body = %truncate_body(&body), city, "OpenWeather lookup rejected");
            }
            return Err(WeatherError::CityNotFound { status: status.as_u16() });
        }

        let body = res.text().await.map_err(WeatherError::Unavailable)?;

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Unexpected(e.to_string()))?;

        parsed.try_into()
    }
}

/// Upper-case the first letter of every alphabetic run and lower-case the
/// rest: `"light RAIN"` becomes `"Light Rain"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }

    out
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
