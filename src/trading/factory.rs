//! Order factory: resolves a style token to a concrete order.

use std::sync::Arc;

use crate::domain::{OrderStyle, normalize_symbol};
use crate::exchanges::Exchange;
use crate::preferences::RiskPreferences;
use crate::trading::{MarketOrder, OrderError};

/// Creates an order for the given style token. The token must match the
/// canonical set exactly; anything else fails with
/// [`OrderError::UnknownStyle`] before any exchange call is made.
pub fn create_order(
    style_token: &str,
    exchange: Arc<dyn Exchange>,
    symbol: &str,
    preferences: RiskPreferences,
) -> Result<MarketOrder, OrderError> {
    let style = OrderStyle::parse(style_token)
        .ok_or_else(|| OrderError::UnknownStyle(style_token.to_string()))?;

    Ok(MarketOrder::new(
        style,
        exchange,
        normalize_symbol(symbol),
        preferences,
    ))
}
