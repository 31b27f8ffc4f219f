use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:4200";

/// Upstream provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Upstream request timeout in seconds. `0` waits indefinitely.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ProviderConfig {
    /// Returns the API key, treating an empty string as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Listener and CORS settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Top-level configuration, resolved once at startup.
///
/// Example TOML:
/// ```toml
/// [provider]
/// api_key = "..."
/// base_url = "https://api.openweathermap.org/data/2.5"
///
/// [server]
/// port = 8000
/// cors_origins = ["http://localhost:4200"]
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Load the config file (if any), then overlay the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = Self::from_file(path)?;
        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    /// Read the config file. An explicit path must exist; the platform default
    /// is optional and yields defaults when missing.
    pub fn from_file(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_config_file_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Overlay environment variables, fetched through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENWEATHER_API_KEY") {
            self.provider.api_key = Some(key);
        }
        if let Some(url) = lookup("OPENWEATHER_BASE_URL").filter(|url| !url.is_empty()) {
            self.provider.base_url = url;
        }
        if let Some(secs) = lookup("OPENWEATHER_TIMEOUT_SECS") {
            self.provider.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid OPENWEATHER_TIMEOUT_SECS: {secs:?}"))?;
        }
        if let Some(host) = lookup("WEATHER_HOST").filter(|host| !host.is_empty()) {
            self.server.host = host;
        }
        if let Some(port) = lookup("WEATHER_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid WEATHER_PORT: {port:?}"))?;
        }
        if let Some(origins) = lookup("WEATHER_CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }

        Ok(())
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Platform config path, e.g. `~/.config/weather-gateway/config.toml`.
    pub fn default_config_file_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "weather-task", "weather-gateway")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// The explicit path if given, otherwise the platform default.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::default_config_file_path()
                .ok_or_else(|| anyhow!("Could not determine platform config directory")),
        }
    }

    /// Copy with the API key masked, for display.
    pub fn redacted(&self) -> Self {
        let mut cfg = self.clone();
        if let Some(key) = cfg.provider.api_key.as_mut() {
            *key = mask(key);
        }
        cfg
    }
}

fn mask(key: &str) -> String {
    let len = key.chars().count();
    if len <= 4 {
        return "****".to_string();
    }
    let tail: String = key.chars().skip(len - 4).collect();
    format!("****{tail}")
}
