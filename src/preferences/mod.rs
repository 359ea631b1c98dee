//! Risk-preference loading and caching.
//!
//! Preferences are read once from a source, cached for the process
//! lifetime, and only re-read on an explicit reload. A source failure
//! never blocks trading: the store degrades to fixed fallback values.

mod file;

pub use file::FilePreferenceSource;

use rust_decimal::Decimal;
use std::sync::RwLock;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::RiskLevel;

/// Preference loading errors.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// Source could not be read.
    #[error("failed to read preferences: {0}")]
    Read(#[from] std::io::Error),

    /// Source content is malformed.
    #[error("failed to parse preferences: {0}")]
    Parse(String),

    /// A risk value is outside the valid (0, 1] range.
    #[error("risk value out of range: {field}={value}")]
    OutOfRange { field: &'static str, value: Decimal },
}

/// RiskPreferences is the pair of risk fractions that sizes every order.
/// Both values are fractions in (0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskPreferences {
    /// SoftRisk is the fraction applied by soft-risk styles.
    pub soft_risk: Decimal,
    /// HardRisk is the fraction applied by hard-risk styles.
    pub hard_risk: Decimal,
}

impl RiskPreferences {
    /// Fixed defaults applied when the configured source cannot be read:
    /// 10% soft, 20% hard.
    pub fn fallback() -> Self {
        Self {
            soft_risk: Decimal::new(10, 2),
            hard_risk: Decimal::new(20, 2),
        }
    }

    /// Returns the risk fraction for the given level.
    pub fn risk_for(&self, level: RiskLevel) -> Decimal {
        match level {
            RiskLevel::Soft => self.soft_risk,
            RiskLevel::Hard => self.hard_risk,
        }
    }
}

/// PreferenceSource supplies risk preferences from an external source.
pub trait PreferenceSource: Send + Sync {
    /// Load reads and parses the preferences.
    fn load(&self) -> Result<RiskPreferences, PreferenceError>;
}

/// PreferenceStore caches a [`RiskPreferences`] value loaded from a source.
///
/// The first `get` performs exactly one load (double-checked under the
/// write lock, so concurrent first callers never trigger duplicates);
/// steady-state reads take only the read lock. The cached value is
/// replaced as a whole, never mutated in place.
pub struct PreferenceStore {
    source: Box<dyn PreferenceSource>,
    cached: RwLock<Option<RiskPreferences>>,
}

impl PreferenceStore {
    /// Creates a store over the given source. Nothing is loaded until
    /// the first `get` or `reload`.
    pub fn new(source: Box<dyn PreferenceSource>) -> Self {
        Self {
            source,
            cached: RwLock::new(None),
        }
    }

    /// Returns the cached preferences, loading them from the source on
    /// the first call. Load failures degrade to the fallback pair.
    pub fn get(&self) -> RiskPreferences {
        if let Ok(guard) = self.cached.read() {
            if let Some(prefs) = *guard {
                return prefs;
            }
        }

        let mut guard = match self.cached.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Another caller may have finished the first load while we
        // waited for the write lock.
        if let Some(prefs) = *guard {
            return prefs;
        }

        let prefs = self.load_or_fallback();
        *guard = Some(prefs);
        info!(
            soft_risk = %prefs.soft_risk,
            hard_risk = %prefs.hard_risk,
            "risk preferences loaded"
        );
        prefs
    }

    /// Re-reads the source unconditionally. A successful reload replaces
    /// the cached value; a failed reload keeps the previous value in
    /// place (it never blanks a working cache). A failed reload with an
    /// empty cache degrades to the fallback pair, same as a first load.
    pub fn reload(&self) -> RiskPreferences {
        let mut guard = match self.cached.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        match self.source.load() {
            Ok(prefs) => {
                *guard = Some(prefs);
                info!(
                    soft_risk = %prefs.soft_risk,
                    hard_risk = %prefs.hard_risk,
                    "risk preferences reloaded"
                );
                prefs
            }
            Err(e) => match *guard {
                Some(prefs) => {
                    warn!(
                        error = %e,
                        soft_risk = %prefs.soft_risk,
                        hard_risk = %prefs.hard_risk,
                        "preferences reload failed, keeping cached values"
                    );
                    prefs
                }
                None => {
                    let prefs = RiskPreferences::fallback();
                    warn!(
                        error = %e,
                        soft_risk = %prefs.soft_risk,
                        hard_risk = %prefs.hard_risk,
                        "preferences reload failed with empty cache, using fallback values"
                    );
                    *guard = Some(prefs);
                    prefs
                }
            },
        }
    }

    fn load_or_fallback(&self) -> RiskPreferences {
        match self.source.load() {
            Ok(prefs) => prefs,
            Err(e) => {
                let prefs = RiskPreferences::fallback();
                warn!(
                    error = %e,
                    soft_risk = %prefs.soft_risk,
                    hard_risk = %prefs.hard_risk,
                    "failed to load preferences, using fallback values"
                );
                prefs
            }
        }
    }
}
