//! Position sizing against exchange quantity constraints.
//!
//! Quantities are always rounded down to the symbol's step size, never
//! up: oversizing would spend more than the risk fraction allows.

use rust_decimal::Decimal;
use tracing::warn;

use crate::domain::SymbolFilters;
use crate::trading::OrderError;

/// Rounds a quantity down to the nearest multiple of the step size.
/// A non-positive step size passes the quantity through unchanged.
pub fn round_to_step(quantity: Decimal, step_size: Decimal) -> Decimal {
    if step_size <= Decimal::ZERO {
        warn!(step_size = %step_size, "invalid step size, using raw quantity");
        return quantity;
    }
    (quantity / step_size).floor() * step_size
}

/// Computes the base-asset quantity for a buy: spend
/// `quote_balance * fraction` at the given price, rounded down to the
/// step size. Fails when the result is below the exchange minimums.
pub fn buy_quantity(
    quote_balance: Decimal,
    fraction: Decimal,
    price: Decimal,
    filters: &SymbolFilters,
) -> Result<Decimal, OrderError> {
    if price <= Decimal::ZERO {
        return Err(OrderError::Execution(format!(
            "invalid price {} for {}",
            price, filters.symbol
        )));
    }

    let quantity = round_to_step(quote_balance * fraction / price, filters.step_size);
    check_min_qty(quantity, filters)?;
    check_min_notional(quantity, price, filters)?;
    Ok(quantity)
}

/// Computes the base-asset quantity for a sell: `base_balance * fraction`
/// rounded down to the step size. Fails below the exchange minimums.
pub fn sell_quantity(
    base_balance: Decimal,
    fraction: Decimal,
    price: Decimal,
    filters: &SymbolFilters,
) -> Result<Decimal, OrderError> {
    if price <= Decimal::ZERO {
        return Err(OrderError::Execution(format!(
            "invalid price {} for {}",
            price, filters.symbol
        )));
    }

    let quantity = round_to_step(base_balance * fraction, filters.step_size);
    check_min_qty(quantity, filters)?;
    check_min_notional(quantity, price, filters)?;
    Ok(quantity)
}

fn check_min_qty(quantity: Decimal, filters: &SymbolFilters) -> Result<(), OrderError> {
    if quantity <= Decimal::ZERO || quantity < filters.min_qty {
        return Err(OrderError::Execution(format!(
            "computed quantity {} {} is below minimum {}",
            quantity, filters.base_asset, filters.min_qty
        )));
    }
    Ok(())
}

// The exchange enforces the notional filter on the quantity it receives,
// so the check runs after step rounding, on both sides.
fn check_min_notional(
    quantity: Decimal,
    price: Decimal,
    filters: &SymbolFilters,
) -> Result<(), OrderError> {
    if let Some(min_notional) = filters.min_notional {
        let notional = quantity * price;
        if notional < min_notional {
            return Err(OrderError::Execution(format!(
                "notional {} {} is below minimum {}",
                notional, filters.quote_asset, min_notional
            )));
        }
    }
    Ok(())
}
