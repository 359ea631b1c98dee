//! Risk-preference source configuration.

use serde::Deserialize;

/// Settings for the risk-preference source.
#[derive(Debug, Clone, Deserialize)]
pub struct PreferencesConfig {
    /// Path to the preferences file holding soft_risk and hard_risk.
    pub path: String,
}
