//! Order execution error types.

use crate::exchanges::ExchangeError;

/// Order error type. Every failed execution surfaces exactly one of
/// these, identifying the stage that failed.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// Style token outside the canonical set. Recoverable at the caller.
    #[error("unknown order style: {0:?}")]
    UnknownStyle(String),

    /// Malformed order state detected before any network call.
    #[error("order validation failed: {0}")]
    Validation(String),

    /// Sizing produced a quantity the exchange would not accept, or the
    /// exchange rejected the order for a business reason.
    #[error("order execution failed: {0}")]
    Execution(String),

    /// Exchange client failure (network, auth, API), cause preserved.
    #[error("exchange error: {0}")]
    Exchange(#[from] ExchangeError),
}
