//! Core library for the weather gateway.
//!
//! This crate defines:
//! - Configuration resolution (defaults, TOML file, environment)
//! - The `WeatherProvider` abstraction and its OpenWeather implementation
//! - Shared domain models (responses, error bodies) and error kinds
//!
//! It is used by `weather-gateway`, but carries no HTTP server code itself.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;

pub use config::{Config, ProviderConfig, ServerConfig};
pub use error::WeatherError;
pub use model::{ErrorResponse, WeatherResponse};
pub use provider::{WeatherProvider, provider_from_config};
