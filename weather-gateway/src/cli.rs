use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use weather_core::Config;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-gateway", version, about = "Weather gateway HTTP service")]
pub struct Cli {
    /// TOML config file; defaults to the platform config directory.
    #[arg(long, global = true, env = "WEATHER_GATEWAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Defaults to `serve`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server.
    Serve {
        /// Overrides `server.host` / WEATHER_HOST.
        #[arg(long)]
        host: Option<String>,

        /// Overrides `server.port` / WEATHER_PORT.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Store the OpenWeather API key and base URL in the config file.
    Configure,

    /// Print the resolved configuration with the API key masked.
    ShowConfig,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config_path = self.config.as_deref();

        match self.command.unwrap_or(Command::Serve { host: None, port: None }) {
            Command::Serve { host, port } => {
                let mut config = Config::load(config_path)?;
                if let Some(host) = host {
                    config.server.host = host;
                }
                if let Some(port) = port {
                    config.server.port = port;
                }

                weather_gateway::serve(config).await?;
            }
            Command::Configure => {
                let path = Config::resolve_path(config_path)?;
                let mut config =
                    if path.exists() { Config::from_file(Some(&path))? } else { Config::default() };

                let api_key = Password::new("OpenWeather API key:")
                    .with_display_mode(PasswordDisplayMode::Masked)
                    .without_confirmation()
                    .prompt()
                    .context("Failed to read API key")?;

                let base_url = Text::new("OpenWeather base URL:")
                    .with_default(&config.provider.base_url)
                    .prompt()
                    .context("Failed to read base URL")?;

                config.provider.api_key = Some(api_key.trim().to_string());
                config.provider.base_url = base_url.trim().to_string();
                config.save(&path)?;

                println!("Saved configuration to {}", path.display());
            }
            Command::ShowConfig => {
                let config = Config::load(config_path)?;
                let rendered = toml::to_string_pretty(&config.redacted())
                    .context("Failed to serialize configuration")?;
                print!("{rendered}");
            }
        }

        Ok(())
    }
}
