//! File-backed preference source.
//!
//! The source is a small text record, one `key = value` pair per line:
//!
//! ```text
//! # risk settings
//! soft_risk = 10%
//! hard_risk = 0.20
//! ```
//!
//! Values are either a percentage ("10%" -> 0.10) or a plain decimal
//! fraction ("0.10"). Both keys are required and must land in (0, 1].

use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use super::{PreferenceError, PreferenceSource, RiskPreferences};

/// FilePreferenceSource reads risk preferences from a text file.
pub struct FilePreferenceSource {
    path: PathBuf,
}

impl FilePreferenceSource {
    /// Creates a source reading from the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PreferenceSource for FilePreferenceSource {
    fn load(&self) -> Result<RiskPreferences, PreferenceError> {
        let content = fs::read_to_string(&self.path)?;
        parse_preferences(&content)
    }
}

/// Parses the preference record format.
pub(super) fn parse_preferences(content: &str) -> Result<RiskPreferences, PreferenceError> {
    let mut soft_risk = None;
    let mut hard_risk = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(PreferenceError::Parse(format!(
                "expected 'key = value', got {:?}",
                line
            )));
        };

        match key.trim() {
            "soft_risk" => soft_risk = Some(parse_fraction("soft_risk", value.trim())?),
            "hard_risk" => hard_risk = Some(parse_fraction("hard_risk", value.trim())?),
            other => {
                return Err(PreferenceError::Parse(format!(
                    "unknown preference key {:?}",
                    other
                )));
            }
        }
    }

    let soft_risk =
        soft_risk.ok_or_else(|| PreferenceError::Parse("soft_risk is missing".to_string()))?;
    let hard_risk =
        hard_risk.ok_or_else(|| PreferenceError::Parse("hard_risk is missing".to_string()))?;

    Ok(RiskPreferences {
        soft_risk,
        hard_risk,
    })
}

/// Parses a single risk value: "10%" or "0.10".
fn parse_fraction(field: &'static str, value: &str) -> Result<Decimal, PreferenceError> {
    let (raw, divisor) = match value.strip_suffix('%') {
        Some(percent) => (percent.trim(), Decimal::ONE_HUNDRED),
        None => (value, Decimal::ONE),
    };

    let parsed = Decimal::from_str(raw)
        .map_err(|e| PreferenceError::Parse(format!("{}: {}", field, e)))?;
    let fraction = parsed / divisor;

    if fraction <= Decimal::ZERO || fraction > Decimal::ONE {
        return Err(PreferenceError::OutOfRange {
            field,
            value: fraction,
        });
    }

    Ok(fraction)
}
