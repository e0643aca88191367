//! API server configuration.

use moc_dialogue::{BotConfig, DialogueResult};
use serde::Deserialize;

/// Top-level API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port (PORT env var).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path of the bot TOML config (MOC_CONFIG env var).
    #[serde(default)]
    pub bot_config: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    10000
}

impl ApiConfig {
    /// Load config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(port = %raw, "invalid PORT, using default");
                default_port()
            }),
            None => default_port(),
        };
        Self {
            port,
            bot_config: lookup("MOC_CONFIG").filter(|p| !p.is_empty()),
            ..Self::default()
        }
    }

    /// Bot configuration from `bot_config`, or the defaults when unset.
    pub fn load_bot_config(&self) -> DialogueResult<BotConfig> {
        match &self.bot_config {
            Some(path) => {
                tracing::info!(path, "loading bot config");
                BotConfig::from_file(path)
            }
            None => Ok(BotConfig::default()),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bot_config: None,
        }
    }
}
