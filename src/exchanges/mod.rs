//! Exchange integration abstractions and implementations.

pub mod binance;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::{Fill, OrderSide, SymbolFilters};

/// Exchange errors.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Symbol is not supported or not tradable on this exchange.
    #[error("symbol {0} is not supported")]
    SymbolNotSupported(String),

    /// Insufficient funds for the operation.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// The exchange rate limit was hit.
    #[error("rate limit exceeded: {0}")]
    RateLimited(String),

    /// Connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// API error from the exchange.
    #[error("API error: {0}")]
    Api(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for exchange operations.
pub type Result<T> = std::result::Result<T, ExchangeError>;

/// Exchange defines the operations the order core needs from a trading
/// venue: balance queries, symbol metadata, and market-order submission.
#[async_trait]
pub trait Exchange: Send + Sync {
    /// Name returns the unique identifier of this exchange (e.g., "binance").
    fn name(&self) -> &str;

    /// Ping checks API connectivity. Used once at startup.
    async fn ping(&self) -> Result<()>;

    /// GetBalance returns the available (free) balance for a single asset.
    /// Assets with no balance return zero.
    async fn get_balance(&self, asset: &str) -> Result<Decimal>;

    /// GetPrice fetches the current price for a symbol.
    async fn get_price(&self, symbol: &str) -> Result<Decimal>;

    /// GetSymbolFilters fetches trading constraints for a symbol.
    /// Returns SymbolNotSupported if the exchange does not list it.
    async fn get_symbol_filters(&self, symbol: &str) -> Result<SymbolFilters>;

    /// PlaceMarketOrder submits a market order and returns the fill.
    /// The quantity is in base asset and must already respect the
    /// symbol's step size and minimum quantity.
    async fn place_market_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
    ) -> Result<Fill>;
}
