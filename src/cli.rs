//! Command-line flags. Every flag can also come from the environment.

use std::time::Duration;

use clap::Parser;

use crate::config::{ServerConfig, Settings};
use crate::Error;

#[derive(Debug, Parser)]
#[command(
    name = "player-equivalence",
    version,
    about = "Ask a hosted LLM for today's equivalent of a cricket player"
)]
pub struct Cli {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "localhost")]
    pub host: String,

    /// Port to bind
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Path the chain routes are mounted under
    #[arg(long, env = "CHAIN_PATH", default_value = "/chain")]
    pub path: String,

    /// Model identifier sent to the provider
    #[arg(long)]
    pub model: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long)]
    pub base_url: Option<String>,

    /// Upstream request timeout, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            path: self.path.clone(),
        }
    }

    /// Apply flag overrides on top of environment settings.
    pub fn apply(&self, mut settings: Settings) -> Result<Settings, Error> {
        if let Some(model) = &self.model {
            settings = settings.with_model(model.clone());
        }
        if let Some(base_url) = &self.base_url {
            settings = settings.with_base_url(base_url.clone());
        }
        if let Some(secs) = self.timeout_secs {
            let timeout: Duration = Settings::checked_timeout(secs)?;
            settings = settings.with_timeout(timeout);
        }
        Ok(settings)
    }
}
