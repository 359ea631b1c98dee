//! Order style vocabulary and its decomposition into side and risk level.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{OrderSide, RiskLevel};

/// OrderStyle is the external-facing token selecting a (side, risk level)
/// order policy. The set is closed: every token maps to exactly one
/// variant, and anything else is rejected by [`OrderStyle::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStyle {
    /// "Hard_Buy": buy sized with the hard risk fraction.
    HardBuy,
    /// "Hard_Sell": sell sized with the hard risk fraction.
    HardSell,
    /// "Soft_Buy": buy sized with the soft risk fraction.
    SoftBuy,
    /// "Soft_Sell": sell sized with the soft risk fraction.
    SoftSell,
}

impl OrderStyle {
    /// ALL is the canonical style set in stable order, used for UI population.
    pub const ALL: [OrderStyle; 4] = [
        OrderStyle::HardBuy,
        OrderStyle::HardSell,
        OrderStyle::SoftBuy,
        OrderStyle::SoftSell,
    ];

    /// Parses a style token. Matching is case-sensitive and exact;
    /// returns None for anything outside the canonical set.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "Hard_Buy" => Some(OrderStyle::HardBuy),
            "Hard_Sell" => Some(OrderStyle::HardSell),
            "Soft_Buy" => Some(OrderStyle::SoftBuy),
            "Soft_Sell" => Some(OrderStyle::SoftSell),
            _ => None,
        }
    }

    /// Returns the canonical token for this style.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStyle::HardBuy => "Hard_Buy",
            OrderStyle::HardSell => "Hard_Sell",
            OrderStyle::SoftBuy => "Soft_Buy",
            OrderStyle::SoftSell => "Soft_Sell",
        }
    }

    /// Returns the order side this style stands for.
    pub fn side(&self) -> OrderSide {
        match self {
            OrderStyle::HardBuy | OrderStyle::SoftBuy => OrderSide::Buy,
            OrderStyle::HardSell | OrderStyle::SoftSell => OrderSide::Sell,
        }
    }

    /// Returns the risk level this style stands for.
    pub fn risk_level(&self) -> RiskLevel {
        match self {
            OrderStyle::HardBuy | OrderStyle::HardSell => RiskLevel::Hard,
            OrderStyle::SoftBuy | OrderStyle::SoftSell => RiskLevel::Soft,
        }
    }
}

impl fmt::Display for OrderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
