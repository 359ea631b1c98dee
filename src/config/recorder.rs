//! Trade recorder configuration.

use serde::Deserialize;

/// Trade persistence settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RecorderConfig {
    /// Whether executed trades should be persisted.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Path to the SQLite database file.
    #[serde(default = "default_path")]
    pub path: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_true() -> bool {
    true
}

fn default_path() -> String {
    "trades.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}
