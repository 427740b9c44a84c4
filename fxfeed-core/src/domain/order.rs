//! Order taxonomy as seen by the fill policy.
//!
//! The host owns the order lifecycle (submission, cancellation, persistence);
//! this crate only needs direction, kind, and the threshold prices.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

/// Order kind and its price parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderType {
    /// Fill immediately at the quoted side (or reference price fallback).
    Market,
    /// Priced like market at the session open event.
    MarketOnOpen,
    /// Priced like market at the session close event.
    MarketOnClose,
    /// Fill at limit price or better.
    Limit { limit_price: f64 },
    /// Becomes market once the quote reaches the stop.
    StopMarket { stop_price: f64 },
    /// Stop-market on the order's current (host-maintained) stop price.
    TrailingStop { stop_price: f64 },
    /// Triggers at stop, then fills only within the limit.
    StopLimit { stop_price: f64, limit_price: f64 },
    /// Triggers when touched, then fills only within the limit.
    LimitIfTouched { trigger_price: f64, limit_price: f64 },
}

impl OrderType {
    pub fn limit_price(&self) -> Option<f64> {
        match self {
            OrderType::Limit { limit_price }
            | OrderType::StopLimit { limit_price, .. }
            | OrderType::LimitIfTouched { limit_price, .. } => Some(*limit_price),
            _ => None,
        }
    }

    pub fn stop_price(&self) -> Option<f64> {
        match self {
            OrderType::StopMarket { stop_price }
            | OrderType::TrailingStop { stop_price }
            | OrderType::StopLimit { stop_price, .. } => Some(*stop_price),
            _ => None,
        }
    }

    pub fn trigger_price(&self) -> Option<f64> {
        match self {
            OrderType::LimitIfTouched { trigger_price, .. } => Some(*trigger_price),
            _ => None,
        }
    }

    /// Market-family orders always fill, falling back to the reference price
    /// when no quote is cached. Resting orders remain pending instead.
    pub fn is_market_family(&self) -> bool {
        matches!(
            self,
            OrderType::Market | OrderType::MarketOnOpen | OrderType::MarketOnClose
        )
    }
}

/// One order as handed in per evaluation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub symbol: String,
    pub side: OrderSide,
    #[serde(flatten)]
    pub order_type: OrderType,
}

impl Order {
    pub fn new(symbol: impl Into<String>, side: OrderSide, order_type: OrderType) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type,
        }
    }
}
