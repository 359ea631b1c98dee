//! The market order entity: one style applied to one symbol, sized from
//! a preferences snapshot and executed exactly once.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::{OrderResult, OrderSide, OrderStatus, OrderStyle, RiskLevel};
use crate::exchanges::Exchange;
use crate::preferences::RiskPreferences;
use crate::trading::{OrderError, sizing};

/// MarketOrder is a transient order created by the factory, validated,
/// executed once, and discarded. The (side, risk level) pair comes from
/// the style's decomposition; sizing dispatches on the side in one
/// closed match instead of per-variant subclasses.
pub struct MarketOrder {
    style: OrderStyle,
    side: OrderSide,
    risk_level: RiskLevel,
    symbol: String,
    preferences: RiskPreferences,
    exchange: Arc<dyn Exchange>,
}

impl std::fmt::Debug for MarketOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketOrder")
            .field("style", &self.style)
            .field("side", &self.side)
            .field("risk_level", &self.risk_level)
            .field("symbol", &self.symbol)
            .field("preferences", &self.preferences)
            .field("exchange", &self.exchange.name())
            .finish()
    }
}

impl MarketOrder {
    pub(super) fn new(
        style: OrderStyle,
        exchange: Arc<dyn Exchange>,
        symbol: String,
        preferences: RiskPreferences,
    ) -> Self {
        Self {
            style,
            side: style.side(),
            risk_level: style.risk_level(),
            symbol,
            preferences,
            exchange,
        }
    }

    /// Returns the order side.
    pub fn side(&self) -> OrderSide {
        self.side
    }

    /// Returns the risk level.
    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    /// Returns the normalized symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Checks the order state before any network call.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.symbol.is_empty() {
            return Err(OrderError::Validation("symbol is empty".to_string()));
        }
        let fraction = self.preferences.risk_for(self.risk_level);
        if fraction <= Decimal::ZERO || fraction > Decimal::ONE {
            return Err(OrderError::Validation(format!(
                "risk fraction {} is outside (0, 1]",
                fraction
            )));
        }
        Ok(())
    }

    /// Executes the order: queries the relevant balance, sizes the
    /// quantity against the symbol filters, and submits a market order.
    /// Consumes the order; it is never retried or reused.
    pub async fn execute(self) -> Result<OrderResult, OrderError> {
        let fraction = self.preferences.risk_for(self.risk_level);

        let filters = self.exchange.get_symbol_filters(&self.symbol).await?;
        if !filters.is_trading() {
            return Err(OrderError::Execution(format!(
                "symbol {} is not trading (status {})",
                self.symbol, filters.status
            )));
        }

        let quantity = match self.side {
            OrderSide::Buy => {
                let quote_balance = self.exchange.get_balance(&filters.quote_asset).await?;
                let price = self.exchange.get_price(&self.symbol).await?;
                info!(
                    symbol = %self.symbol,
                    quote_asset = %filters.quote_asset,
                    balance = %quote_balance,
                    fraction = %fraction,
                    price = %price,
                    "sizing market buy"
                );
                sizing::buy_quantity(quote_balance, fraction, price, &filters)?
            }
            OrderSide::Sell => {
                let base_balance = self.exchange.get_balance(&filters.base_asset).await?;
                let price = self.exchange.get_price(&self.symbol).await?;
                info!(
                    symbol = %self.symbol,
                    base_asset = %filters.base_asset,
                    balance = %base_balance,
                    fraction = %fraction,
                    price = %price,
                    "sizing market sell"
                );
                sizing::sell_quantity(base_balance, fraction, price, &filters)?
            }
        };

        info!(
            style = %self.style,
            symbol = %self.symbol,
            quantity = %quantity,
            "placing market order"
        );

        let fill = self
            .exchange
            .place_market_order(&self.symbol, self.side, quantity)
            .await?;

        if fill.status == OrderStatus::Rejected {
            return Err(OrderError::Execution(format!(
                "exchange rejected order {} for {}",
                fill.order_id, self.symbol
            )));
        }

        Ok(OrderResult {
            order_id: fill.order_id,
            symbol: self.symbol,
            style: self.style,
            side: self.side,
            risk_level: self.risk_level,
            risk_fraction: fraction,
            status: fill.status,
            quantity,
            avg_price: fill.avg_price,
            notional: fill.cumulative_quote_qty,
            executed_at: Utc::now(),
        })
    }
}
