//! Process configuration, read once at startup.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use crate::providers::groq::{GroqProvider, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::{EquivalenceChain, Error};

pub const API_KEY_VAR: &str = "GROQ_API_KEY";
pub const DEFAULT_MODEL: &str = "Gemma2-9b-It";

/// Settings for the remote model. Immutable once built.
#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub temperature: Option<f32>,
}

// The key never reaches logs.
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl Settings {
    /// Create settings with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            temperature: None,
        }
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read settings through `lookup`, which returns the value of a variable if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                Error::config(format!("{API_KEY_VAR} environment variable is required"))
            })?;

        let mut settings = Self::new(api_key);

        if let Some(model) = lookup("GROQ_MODEL").filter(|m| !m.trim().is_empty()) {
            settings.model = model;
        }
        if let Some(base_url) = lookup("GROQ_BASE_URL").filter(|u| !u.trim().is_empty()) {
            settings.base_url = base_url;
        }
        if let Some(secs) = lookup("GROQ_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                Error::config(format!("Invalid GROQ_TIMEOUT_SECS '{secs}': expected whole seconds"))
            })?;
            settings.timeout = Self::checked_timeout(secs)?;
        }
        if let Some(temperature) = lookup("GROQ_TEMPERATURE") {
            let value: f32 = temperature.trim().parse().map_err(|_| {
                Error::config(format!("Invalid GROQ_TEMPERATURE '{temperature}'"))
            })?;
            settings.temperature = Some(value);
        }

        Ok(settings)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn checked_timeout(secs: u64) -> Result<Duration, Error> {
        if secs == 0 {
            return Err(Error::config("Timeout must be at least one second"));
        }
        Ok(Duration::from_secs(secs))
    }

    /// Build the provider and the chain that uses it.
    pub fn build_chain(&self) -> Result<EquivalenceChain, Error> {
        let provider = GroqProvider::with_options(
            self.api_key.clone(),
            self.base_url.clone(),
            self.timeout,
        )?;

        let chain = EquivalenceChain::new(Arc::new(provider), self.model.clone());
        Ok(match self.temperature {
            Some(temperature) => chain.with_temperature(temperature),
            None => chain,
        })
    }
}

/// Where the HTTP listener binds and where the chain routes are mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8000,
            path: "/chain".to_string(),
        }
    }
}

impl ServerConfig {
    /// Normalize the mount path: leading slash, no trailing slash.
    pub fn normalized_path(&self) -> Result<String, Error> {
        let trimmed = self.path.trim().trim_matches('/');
        if trimmed.contains(char::is_whitespace) || trimmed.contains("//") {
            return Err(Error::config(format!("Invalid route path '{}'", self.path)));
        }
        Ok(format!("/{trimmed}"))
    }
}
