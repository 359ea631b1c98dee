//! Exchange configuration.

use serde::Deserialize;

/// Settings for the exchange connection.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// Whether trading against the exchange is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Enable testnet/sandbox mode.
    #[serde(default)]
    pub testnet: bool,
    /// API key (loaded from environment variable).
    #[serde(skip)]
    pub api_key: String,
    /// API secret (loaded from environment variable).
    #[serde(skip)]
    pub api_secret: String,
    /// Maximum API requests per minute.
    pub rate_limit: Option<i32>,
}
