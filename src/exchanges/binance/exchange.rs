use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::{Fill, OrderSide, OrderStatus, SymbolFilters};
use crate::exchanges::binance::Client;
use crate::exchanges::{Exchange, ExchangeError, Result};

const EXCHANGE_NAME: &str = "binance";

/// Maximum acceptable clock drift between local and server time.
/// Signed requests fail when the local timestamp drifts too far.
const MAX_CLOCK_DRIFT: Duration = Duration::from_secs(5);

/// Binance spot exchange implementation.
pub struct BinanceExchange {
    client: Client,
}

impl BinanceExchange {
    /// Creates a new BinanceExchange from the application config.
    pub fn from_config(config: &Config) -> Result<Self> {
        if !config.exchange.enabled {
            return Err(ExchangeError::Internal(format!(
                "{} is not enabled",
                EXCHANGE_NAME
            )));
        }

        Ok(Self {
            client: Client::from_config(&config.exchange),
        })
    }
}

#[async_trait]
impl Exchange for BinanceExchange {
    fn name(&self) -> &str {
        EXCHANGE_NAME
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .ping()
            .await
            .map_err(|e| ExchangeError::Connection(format!("connect to binance: {}", e)))?;

        let server_time = self
            .client
            .get_server_time()
            .await
            .map_err(|e| ExchangeError::Connection(format!("connect to binance: {}", e)))?;

        let local_time = chrono::Utc::now();
        let drift = (local_time - server_time).abs();

        info!(
            server_time = %server_time,
            clock_drift = ?drift,
            "connected to binance"
        );

        if drift > chrono::Duration::from_std(MAX_CLOCK_DRIFT).unwrap_or_default() {
            warn!(drift = ?drift, "significant clock drift detected");
        }

        Ok(())
    }

    async fn get_balance(&self, asset: &str) -> Result<Decimal> {
        let body = self
            .client
            .request(Method::GET, "/api/v3/account", None, true)
            .await
            .map_err(|e| map_client_error(e, asset))?;

        let account: AccountResponse = serde_json::from_slice(&body)
            .map_err(|e| ExchangeError::Api(format!("parse account: {}", e)))?;

        let free = match account.balances.iter().find(|b| b.asset == asset) {
            Some(b) => Decimal::from_str(&b.free).map_err(|e| {
                ExchangeError::Api(format!("parse balance {:?} for {}: {}", b.free, asset, e))
            })?,
            None => Decimal::ZERO,
        };

        debug!(asset = %asset, free = %free, "fetched balance");

        Ok(free)
    }

    async fn get_price(&self, symbol: &str) -> Result<Decimal> {
        let mut params = HashMap::new();
        params.insert("symbol".to_string(), symbol.to_string());

        let body = self
            .client
            .request(Method::GET, "/api/v3/ticker/price", Some(params), false)
            .await
            .map_err(|e| map_client_error(e, symbol))?;

        let resp: TickerPriceResponse = serde_json::from_slice(&body)
            .map_err(|e| ExchangeError::Api(format!("parse ticker price: {}", e)))?;

        Decimal::from_str(&resp.price)
            .map_err(|e| ExchangeError::Api(format!("parse price {:?}: {}", resp.price, e)))
    }

    async fn get_symbol_filters(&self, symbol: &str) -> Result<SymbolFilters> {
        let mut params = HashMap::new();
        params.insert("symbol".to_string(), symbol.to_string());

        let body = self
            .client
            .request(Method::GET, "/api/v3/exchangeInfo", Some(params), false)
            .await
            .map_err(|e| map_client_error(e, symbol))?;

        let resp: ExchangeInfoResponse = serde_json::from_slice(&body)
            .map_err(|e| ExchangeError::Api(format!("parse exchange info: {}", e)))?;

        let info = resp
            .symbols
            .into_iter()
            .find(|s| s.symbol == symbol)
            .ok_or_else(|| ExchangeError::SymbolNotSupported(symbol.to_string()))?;

        info.to_filters()
    }

    async fn place_market_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
    ) -> Result<Fill> {
        let mut params = HashMap::new();
        params.insert("symbol".to_string(), symbol.to_string());
        params.insert("side".to_string(), side.as_exchange_str().to_string());
        params.insert("type".to_string(), "MARKET".to_string());
        params.insert("quantity".to_string(), quantity.to_string());

        let body = self
            .client
            .request(Method::POST, "/api/v3/order", Some(params), true)
            .await
            .map_err(|e| map_client_error(e, symbol))?;

        let resp: PlaceOrderResponse = serde_json::from_slice(&body)
            .map_err(|e| ExchangeError::Api(format!("parse order response: {}", e)))?;

        resp.to_fill()
    }
}

/// Binance ticker price response.
#[derive(Debug, Deserialize)]
struct TickerPriceResponse {
    #[allow(dead_code)]
    symbol: String,
    price: String,
}

/// Binance account response (balances only).
#[derive(Debug, Deserialize)]
struct AccountResponse {
    balances: Vec<AssetBalance>,
}

/// Individual asset balance.
#[derive(Debug, Deserialize)]
struct AssetBalance {
    asset: String,
    free: String,
    #[allow(dead_code)]
    locked: String,
}

/// Binance exchange info response.
#[derive(Debug, Deserialize)]
struct ExchangeInfoResponse {
    symbols: Vec<SymbolInfo>,
}

/// Per-symbol metadata from exchange info.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SymbolInfo {
    symbol: String,
    status: String,
    base_asset: String,
    quote_asset: String,
    filters: Vec<FilterInfo>,
}

/// A single symbol filter. Binance returns a heterogeneous list keyed
/// by filterType; only the lot-size and notional filters matter here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilterInfo {
    filter_type: String,
    step_size: Option<String>,
    min_qty: Option<String>,
    min_notional: Option<String>,
}

impl SymbolInfo {
    fn to_filters(self) -> Result<SymbolFilters> {
        let lot_size = self
            .filters
            .iter()
            .find(|f| f.filter_type == "LOT_SIZE")
            .ok_or_else(|| {
                ExchangeError::Api(format!("LOT_SIZE filter missing for {}", self.symbol))
            })?;

        let step_size = parse_filter_decimal(&self.symbol, "stepSize", &lot_size.step_size)?;
        let min_qty = parse_filter_decimal(&self.symbol, "minQty", &lot_size.min_qty)?;

        // Older symbols report MIN_NOTIONAL, newer ones NOTIONAL.
        let min_notional = self
            .filters
            .iter()
            .find(|f| f.filter_type == "NOTIONAL" || f.filter_type == "MIN_NOTIONAL")
            .and_then(|f| f.min_notional.as_deref())
            .and_then(|v| Decimal::from_str(v).ok());

        Ok(SymbolFilters {
            symbol: self.symbol,
            status: self.status,
            base_asset: self.base_asset,
            quote_asset: self.quote_asset,
            step_size,
            min_qty,
            min_notional,
        })
    }
}

fn parse_filter_decimal(symbol: &str, field: &str, value: &Option<String>) -> Result<Decimal> {
    let raw = value
        .as_deref()
        .ok_or_else(|| ExchangeError::Api(format!("{} missing for {}", field, symbol)))?;
    Decimal::from_str(raw)
        .map_err(|e| ExchangeError::Api(format!("parse {} for {}: {}", field, symbol, e)))
}

/// Binance place order response (FULL response type).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaceOrderResponse {
    order_id: i64,
    status: String,
    executed_qty: String,
    #[serde(rename = "cummulativeQuoteQty")]
    cumulative_quote_qty: String,
}

impl PlaceOrderResponse {
    fn to_fill(self) -> Result<Fill> {
        let executed_qty = Decimal::from_str(&self.executed_qty).map_err(|e| {
            ExchangeError::Api(format!("parse executedQty {:?}: {}", self.executed_qty, e))
        })?;
        let cumulative_quote_qty = Decimal::from_str(&self.cumulative_quote_qty).map_err(|e| {
            ExchangeError::Api(format!(
                "parse cummulativeQuoteQty {:?}: {}",
                self.cumulative_quote_qty, e
            ))
        })?;
        let avg_price = if executed_qty.is_zero() {
            Decimal::ZERO
        } else {
            cumulative_quote_qty / executed_qty
        };

        Ok(Fill {
            order_id: self.order_id.to_string(),
            status: OrderStatus::from_exchange(&self.status),
            executed_qty,
            cumulative_quote_qty,
            avg_price,
        })
    }
}

/// Maps Binance client errors to exchange errors.
fn map_client_error(err: super::client::ClientError, context: &str) -> ExchangeError {
    use super::client::ClientError;

    match err {
        ClientError::Api(api_err) => match api_err.code {
            -2010 => ExchangeError::InsufficientFunds,
            -1121 => ExchangeError::SymbolNotSupported(context.to_string()),
            -1003 | -1015 => ExchangeError::RateLimited(api_err.message),
            _ => ExchangeError::Api(format!("binance error for {}: {}", context, api_err)),
        },
        ClientError::RateLimitExceeded { current, limit } => {
            ExchangeError::RateLimited(format!("{}/{} per minute", current, limit))
        }
        ClientError::Request(e) => ExchangeError::Connection(e.to_string()),
        other => ExchangeError::Api(format!("{}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_response(executed_qty: &str, cumulative_quote_qty: &str) -> PlaceOrderResponse {
        PlaceOrderResponse {
            order_id: 42,
            status: "FILLED".to_string(),
            executed_qty: executed_qty.to_string(),
            cumulative_quote_qty: cumulative_quote_qty.to_string(),
        }
    }

    #[test]
    fn test_to_fill_computes_average_price() {
        let fill = order_response("0.025", "1000").to_fill().unwrap();

        assert_eq!(fill.order_id, "42");
        assert_eq!(fill.status, OrderStatus::Filled);
        assert_eq!(fill.executed_qty, Decimal::new(25, 3));
        assert_eq!(fill.avg_price, Decimal::new(40_000, 0));
    }

    #[test]
    fn test_to_fill_zero_executed_qty_has_zero_average_price() {
        let fill = order_response("0", "0").to_fill().unwrap();
        assert_eq!(fill.avg_price, Decimal::ZERO);
    }

    #[test]
    fn test_to_fill_malformed_quantity_is_api_error() {
        let err = order_response("garbage", "1000").to_fill().unwrap_err();
        assert!(matches!(err, ExchangeError::Api(_)));
        assert!(err.to_string().contains("executedQty"));

        let err = order_response("0.025", "garbage").to_fill().unwrap_err();
        assert!(matches!(err, ExchangeError::Api(_)));
        assert!(err.to_string().contains("cummulativeQuoteQty"));
    }
}
