//! Configuration loading and validation for the order desk.
//!
//! Uses serde_yaml to load YAML configuration files with support for
//! environment variable overrides for sensitive credentials.

mod app;
mod error;
mod exchange;
mod preferences;
mod recorder;

pub use app::AppConfig;
pub use error::ConfigError;
pub use exchange::ExchangeConfig;
pub use preferences::PreferencesConfig;
pub use recorder::RecorderConfig;

use serde::Deserialize;
use std::{env, fs};

/// Root configuration structure for the order desk.
///
/// Required sections: app, exchange, preferences.
/// Optional sections: recorder.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Application-level settings like name and environment.
    pub app: AppConfig,
    /// Exchange connection settings.
    pub exchange: ExchangeConfig,
    /// Risk-preference source settings.
    pub preferences: PreferencesConfig,
    /// Trade persistence (optional).
    pub recorder: Option<RecorderConfig>,
}

impl Config {
    /// Load configuration from a YAML file at the given path.
    ///
    /// First loads environment variables from `.env` file (if exists),
    /// then loads YAML config and credentials from environment variables:
    /// - `BINANCE_API_KEY`, `BINANCE_API_SECRET`
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore error if not found)
        dotenvy::dotenv().ok();

        let content = fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        config.load_credentials_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Load credentials from environment variables.
    fn load_credentials_from_env(&mut self) {
        if !self.exchange.enabled {
            return;
        }

        self.exchange.api_key = env::var("BINANCE_API_KEY").unwrap_or_default();
        self.exchange.api_secret = env::var("BINANCE_API_SECRET").unwrap_or_default();
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.app.name.is_empty() {
            return Err(ConfigError::Validation("app.name is required".into()));
        }

        if self.preferences.path.is_empty() {
            return Err(ConfigError::Validation(
                "preferences.path is required".into(),
            ));
        }

        if !self.exchange.enabled {
            return Err(ConfigError::Validation(
                "exchange must be enabled".into(),
            ));
        }

        // Only require credentials in production/staging
        let is_production = self.app.env != "development";
        if is_production && (self.exchange.api_key.is_empty() || self.exchange.api_secret.is_empty())
        {
            return Err(ConfigError::Validation(
                "exchange API credentials not found (set BINANCE_API_KEY and BINANCE_API_SECRET env vars)"
                    .into(),
            ));
        }

        if let Some(rate_limit) = self.exchange.rate_limit {
            if rate_limit <= 0 {
                return Err(ConfigError::Validation(
                    "exchange.rate_limit must be positive".into(),
                ));
            }
        }

        if let Some(ref recorder) = self.recorder {
            if recorder.enabled && recorder.path.is_empty() {
                return Err(ConfigError::Validation(
                    "recorder.path is required when the recorder is enabled".into(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
