//! Order execution core.
//!
//! Ties together style resolution, risk-based sizing, exchange
//! submission, and best-effort trade recording.

mod error;
mod factory;
mod order;
pub mod sizing;

pub use error::OrderError;
pub use factory::create_order;
pub use order::MarketOrder;

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{OrderResult, OrderStyle};
use crate::exchanges::Exchange;
use crate::preferences::PreferenceStore;
use crate::recorder::TradeRecorder;

/// OrderManager is the public entry point for order execution. It holds
/// no per-call state: each request produces one transient [`MarketOrder`]
/// sized against a fresh preferences snapshot.
pub struct OrderManager {
    exchange: Arc<dyn Exchange>,
    preferences: Arc<PreferenceStore>,
    recorder: Option<Arc<dyn TradeRecorder>>,
}

impl OrderManager {
    /// Creates a manager over an exchange and a preference store.
    pub fn new(exchange: Arc<dyn Exchange>, preferences: Arc<PreferenceStore>) -> Self {
        Self {
            exchange,
            preferences,
            recorder: None,
        }
    }

    /// Attaches a trade recorder. Recording is best-effort: a recorder
    /// failure never unwinds a trade the exchange already accepted.
    pub fn with_recorder(mut self, recorder: Arc<dyn TradeRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Returns true iff the style token is in the canonical set.
    /// Pure; never touches the exchange.
    pub fn validate_order_style(&self, style: &str) -> bool {
        OrderStyle::parse(style).is_some()
    }

    /// Returns the canonical style tokens in stable order, for UI
    /// population.
    pub fn available_order_styles(&self) -> Vec<&'static str> {
        OrderStyle::ALL.iter().map(|s| s.as_str()).collect()
    }

    /// Executes one order: resolves the style, validates, sizes, and
    /// submits it, then forwards the result to the trade recorder.
    pub async fn execute_order(
        &self,
        style: &str,
        symbol: &str,
    ) -> Result<OrderResult, OrderError> {
        let preferences = self.preferences.get();
        let order = create_order(style, Arc::clone(&self.exchange), symbol, preferences)?;
        order.validate()?;

        let result = order.execute().await?;

        info!(
            style = %result.style,
            symbol = %result.symbol,
            quantity = %result.quantity,
            avg_price = %result.avg_price,
            notional = %result.notional,
            status = ?result.status,
            "order executed"
        );

        if let Some(ref recorder) = self.recorder {
            if let Err(e) = recorder.record_trade(&result).await {
                warn!(
                    order_id = %result.order_id,
                    error = %e,
                    "failed to record trade"
                );
            }
        }

        Ok(result)
    }
}
