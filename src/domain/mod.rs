//! Domain models for risk-sized order execution.

mod order;
mod style;

pub use order::{Fill, OrderResult, OrderSide, OrderStatus, RiskLevel, SymbolFilters};
pub use style::OrderStyle;

/// Normalizes a user-supplied symbol to the exchange form: uppercased,
/// with the USDT quote suffix appended when missing ("btc" -> "BTCUSDT").
pub fn normalize_symbol(symbol: &str) -> String {
    let upper = symbol.trim().to_uppercase();
    if upper.is_empty() || upper.contains("USDT") {
        upper
    } else {
        format!("{}USDT", upper)
    }
}
