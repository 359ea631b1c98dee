//! Core business entities for risk-sized market orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::OrderStyle;

/// OrderSide represents the direction of an order (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// OrderSideBuy indicates a buy order.
    Buy,
    /// OrderSideSell indicates a sell order.
    Sell,
}

impl OrderSide {
    /// Returns the exchange wire representation ("BUY" or "SELL").
    pub fn as_exchange_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

/// RiskLevel selects which configured risk percentage sizes an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// RiskLevelSoft sizes the order with the smaller configured fraction.
    Soft,
    /// RiskLevelHard sizes the order with the larger configured fraction.
    Hard,
}

/// OrderStatus represents the state reported by the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// OrderStatusPending indicates the order is accepted but not yet filled.
    Pending,
    /// OrderStatusFilled indicates the order has been completely filled.
    Filled,
    /// OrderStatusPartiallyFilled indicates a partial fill.
    PartiallyFilled,
    /// OrderStatusRejected indicates the exchange refused the order.
    Rejected,
}

impl OrderStatus {
    /// Maps Binance order states to OrderStatus.
    pub fn from_exchange(state: &str) -> Self {
        match state {
            "FILLED" => OrderStatus::Filled,
            "PARTIALLY_FILLED" => OrderStatus::PartiallyFilled,
            "REJECTED" | "EXPIRED" | "CANCELED" => OrderStatus::Rejected,
            _ => OrderStatus::Pending,
        }
    }
}

/// SymbolFilters holds the trading constraints for a symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolFilters {
    /// Symbol is the exchange symbol (e.g., "BTCUSDT").
    pub symbol: String,
    /// Status is the exchange trading status (e.g., "TRADING", "HALT").
    pub status: String,
    /// BaseAsset is the asset being bought or sold (e.g., "BTC").
    pub base_asset: String,
    /// QuoteAsset is the asset the symbol is priced in (e.g., "USDT").
    pub quote_asset: String,
    /// StepSize is the quantity granularity; quantities must be a multiple of it.
    pub step_size: Decimal,
    /// MinQty is the smallest quantity the exchange accepts.
    pub min_qty: Decimal,
    /// MinNotional is the smallest order value in quote asset, if enforced.
    pub min_notional: Option<Decimal>,
}

impl SymbolFilters {
    /// Returns true if the symbol is open for trading.
    pub fn is_trading(&self) -> bool {
        self.status == "TRADING"
    }
}

/// Fill is the exchange response to a submitted market order.
#[derive(Debug, Clone)]
pub struct Fill {
    /// OrderID is the identifier assigned by the exchange.
    pub order_id: String,
    /// Status is the order state reported by the exchange.
    pub status: OrderStatus,
    /// ExecutedQty is the base-asset quantity actually filled.
    pub executed_qty: Decimal,
    /// CumulativeQuoteQty is the total quote-asset value of the fill.
    pub cumulative_quote_qty: Decimal,
    /// AvgPrice is the average fill price.
    pub avg_price: Decimal,
}

/// OrderResult is the immutable outcome record of one executed order.
/// Produced once per execution and handed to the trade recorder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResult {
    /// OrderID is the identifier assigned by the exchange.
    pub order_id: String,
    /// Symbol is the normalized exchange symbol.
    pub symbol: String,
    /// Style is the order style token that produced this order.
    pub style: OrderStyle,
    /// Side indicates buy or sell.
    pub side: OrderSide,
    /// RiskLevel is the level that selected the risk fraction.
    pub risk_level: RiskLevel,
    /// RiskFraction is the fraction of balance the order was sized with.
    pub risk_fraction: Decimal,
    /// Status is the state reported by the exchange.
    pub status: OrderStatus,
    /// Quantity is the base-asset quantity submitted.
    pub quantity: Decimal,
    /// AvgPrice is the average fill price.
    pub avg_price: Decimal,
    /// Notional is the total quote-asset value of the fill.
    pub notional: Decimal,
    /// ExecutedAt is when the result was produced.
    pub executed_at: DateTime<Utc>,
}
