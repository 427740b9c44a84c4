//! Fill-pricing policy: decide fill/no-fill and a price per evaluation event.
//!
//! All comparisons use the cached quote's close on the relevant side: buys
//! price off the ask, sells off the bid. Fill prices clamp to the
//! worst-of(quote, requested) so a fill never reports a price more favorable
//! than the stated limit/stop, even when the quote overshot it.
//!
//! Absence of a usable quote is not an error: market-family orders fall back
//! to the reference asset price so a backtest never stalls, resting orders
//! remain pending until a later event supplies a quote.

use crate::domain::{Order, OrderSide, OrderType, QuoteBar};

/// Outcome of one order-evaluation event. `Pending` means the order stays in
/// the host's book and is re-evaluated on the next event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillDecision {
    Filled { price: f64 },
    Pending,
}

impl FillDecision {
    pub fn price(&self) -> Option<f64> {
        match self {
            FillDecision::Filled { price } => Some(*price),
            FillDecision::Pending => None,
        }
    }
}

/// Dispatch on order kind. `reference_price` is the host's raw asset price,
/// used only on the no-quote fallback paths.
pub fn evaluate(order: &Order, quote: Option<&QuoteBar>, reference_price: f64) -> FillDecision {
    match order.order_type {
        OrderType::Market | OrderType::MarketOnOpen | OrderType::MarketOnClose => {
            market_fill(order.side, quote, reference_price)
        }
        OrderType::Limit { limit_price } => limit_fill(order.side, limit_price, quote),
        OrderType::StopMarket { stop_price } => {
            stop_market_fill(order.side, stop_price, quote, reference_price)
        }
        OrderType::TrailingStop { stop_price } => {
            trailing_stop_fill(order.side, stop_price, quote, reference_price)
        }
        OrderType::StopLimit {
            stop_price,
            limit_price,
        } => stop_limit_fill(order.side, stop_price, limit_price, quote),
        OrderType::LimitIfTouched {
            trigger_price,
            limit_price,
        } => limit_if_touched_fill(order.side, trigger_price, limit_price, quote),
    }
}

/// Market (and MOO/MOC): always fills. Buys lift the ask close, sells hit
/// the bid close; without a quote the reference price is used.
pub fn market_fill(
    side: OrderSide,
    quote: Option<&QuoteBar>,
    reference_price: f64,
) -> FillDecision {
    let price = match quote {
        Some(qb) => match side {
            OrderSide::Buy => qb.ask.close,
            OrderSide::Sell => qb.bid.close,
        },
        None => reference_price,
    };
    FillDecision::Filled { price }
}

/// Limit: buy fills when ask ≤ limit at min(ask, limit); sell fills when
/// bid ≥ limit at max(bid, limit). No quote → pending.
pub fn limit_fill(side: OrderSide, limit_price: f64, quote: Option<&QuoteBar>) -> FillDecision {
    let Some(qb) = quote else {
        return FillDecision::Pending;
    };
    match side {
        OrderSide::Buy if qb.ask.close <= limit_price => FillDecision::Filled {
            price: qb.ask.close.min(limit_price),
        },
        OrderSide::Sell if qb.bid.close >= limit_price => FillDecision::Filled {
            price: qb.bid.close.max(limit_price),
        },
        _ => FillDecision::Pending,
    }
}

/// Stop-market: buy triggers when ask ≥ stop (fill at max(ask, stop)), sell
/// when bid ≤ stop (fill at min(bid, stop)).
///
/// Without a quote the trigger is evaluated against the reference price and
/// fills at it. That can trigger a stop a live bid/ask might not have
/// touched; kept as the established behavior of the original model.
pub fn stop_market_fill(
    side: OrderSide,
    stop_price: f64,
    quote: Option<&QuoteBar>,
    reference_price: f64,
) -> FillDecision {
    let Some(qb) = quote else {
        let triggered = match side {
            OrderSide::Buy => reference_price >= stop_price,
            OrderSide::Sell => reference_price <= stop_price,
        };
        return if triggered {
            FillDecision::Filled {
                price: reference_price,
            }
        } else {
            FillDecision::Pending
        };
    };
    match side {
        OrderSide::Buy if qb.ask.close >= stop_price => FillDecision::Filled {
            price: qb.ask.close.max(stop_price),
        },
        OrderSide::Sell if qb.bid.close <= stop_price => FillDecision::Filled {
            price: qb.bid.close.min(stop_price),
        },
        _ => FillDecision::Pending,
    }
}

/// Trailing stop: identical to stop-market on the order's current stop
/// price. The host maintains the trail; this policy only prices it.
pub fn trailing_stop_fill(
    side: OrderSide,
    current_stop_price: f64,
    quote: Option<&QuoteBar>,
    reference_price: f64,
) -> FillDecision {
    stop_market_fill(side, current_stop_price, quote, reference_price)
}

/// Stop-limit: trigger like a stop, then fill only within the limit.
/// Buy: ask ≥ stop and ask ≤ limit, at min(ask, limit). No quote → pending.
pub fn stop_limit_fill(
    side: OrderSide,
    stop_price: f64,
    limit_price: f64,
    quote: Option<&QuoteBar>,
) -> FillDecision {
    let Some(qb) = quote else {
        return FillDecision::Pending;
    };
    match side {
        OrderSide::Buy if qb.ask.close >= stop_price && qb.ask.close <= limit_price => {
            FillDecision::Filled {
                price: qb.ask.close.min(limit_price),
            }
        }
        OrderSide::Sell if qb.bid.close <= stop_price && qb.bid.close >= limit_price => {
            FillDecision::Filled {
                price: qb.bid.close.max(limit_price),
            }
        }
        _ => FillDecision::Pending,
    }
}

/// Limit-if-touched: trigger opposite to a stop, then apply the limit.
/// Buy: ask ≤ trigger and ask ≤ limit, at min(ask, limit). No quote → pending.
pub fn limit_if_touched_fill(
    side: OrderSide,
    trigger_price: f64,
    limit_price: f64,
    quote: Option<&QuoteBar>,
) -> FillDecision {
    let Some(qb) = quote else {
        return FillDecision::Pending;
    };
    match side {
        OrderSide::Buy if qb.ask.close <= trigger_price && qb.ask.close <= limit_price => {
            FillDecision::Filled {
                price: qb.ask.close.min(limit_price),
            }
        }
        OrderSide::Sell if qb.bid.close >= trigger_price && qb.bid.close >= limit_price => {
            FillDecision::Filled {
                price: qb.bid.close.max(limit_price),
            }
        }
        _ => FillDecision::Pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Granularity, Ohlc};
    use chrono::{TimeZone, Utc};

    fn quote(bid_close: f64, ask_close: f64) -> QuoteBar {
        QuoteBar::new(
            Utc.with_ymd_and_hms(2025, 7, 10, 0, 0, 0).unwrap(),
            Granularity::M1,
            Ohlc::new(bid_close, bid_close, bid_close, bid_close),
            Ohlc::new(ask_close, ask_close, ask_close, ask_close),
        )
    }

    #[test]
    fn market_buy_lifts_the_ask() {
        let qb = quote(1.1735, 1.1737);
        let decision = market_fill(OrderSide::Buy, Some(&qb), 1.1736);
        assert_eq!(decision, FillDecision::Filled { price: 1.1737 });
    }

    #[test]
    fn market_sell_hits_the_bid() {
        let qb = quote(1.1735, 1.1737);
        let decision = market_fill(OrderSide::Sell, Some(&qb), 1.1736);
        assert_eq!(decision, FillDecision::Filled { price: 1.1735 });
    }

    #[test]
    fn market_without_quote_falls_back_to_reference() {
        let decision = market_fill(OrderSide::Buy, None, 1.1736);
        assert_eq!(decision, FillDecision::Filled { price: 1.1736 });
    }

    #[test]
    fn limit_sell_clamps_to_worst_of_quote_and_limit() {
        // bid overshot the limit: fill at the better-for-counterparty bid
        let qb = quote(1.1742, 1.1744);
        let decision = limit_fill(OrderSide::Sell, 1.1740, Some(&qb));
        assert_eq!(decision, FillDecision::Filled { price: 1.1742 });

        // bid below the limit: stays pending
        let qb = quote(1.1738, 1.1740);
        assert_eq!(limit_fill(OrderSide::Sell, 1.1740, Some(&qb)), FillDecision::Pending);
    }

    #[test]
    fn limit_buy_fills_at_or_below_limit() {
        let qb = quote(1.1730, 1.1732);
        let decision = limit_fill(OrderSide::Buy, 1.1735, Some(&qb));
        assert_eq!(decision, FillDecision::Filled { price: 1.1732 });

        let qb = quote(1.1736, 1.1738);
        assert_eq!(limit_fill(OrderSide::Buy, 1.1735, Some(&qb)), FillDecision::Pending);
    }

    #[test]
    fn limit_without_quote_remains_pending() {
        assert_eq!(limit_fill(OrderSide::Buy, 1.1735, None), FillDecision::Pending);
    }

    #[test]
    fn stop_market_buy_triggers_on_ask_at_or_above_stop() {
        let qb = quote(1.1748, 1.1752);
        let decision = stop_market_fill(OrderSide::Buy, 1.1750, Some(&qb), 0.0);
        assert_eq!(decision, FillDecision::Filled { price: 1.1752 });

        let qb = quote(1.1744, 1.1746);
        assert_eq!(
            stop_market_fill(OrderSide::Buy, 1.1750, Some(&qb), 0.0),
            FillDecision::Pending
        );
    }

    #[test]
    fn stop_market_sell_fills_no_better_than_the_stop() {
        // bid gapped below the stop: clamp keeps the worse price (the bid)
        let qb = quote(1.1720, 1.1722);
        let decision = stop_market_fill(OrderSide::Sell, 1.1730, Some(&qb), 0.0);
        assert_eq!(decision, FillDecision::Filled { price: 1.1720 });
    }

    #[test]
    fn stop_market_fallback_uses_reference_price_both_ways() {
        // triggered
        let decision = stop_market_fill(OrderSide::Buy, 1.1750, None, 1.1751);
        assert_eq!(decision, FillDecision::Filled { price: 1.1751 });
        // not triggered
        assert_eq!(
            stop_market_fill(OrderSide::Buy, 1.1750, None, 1.1749),
            FillDecision::Pending
        );
    }

    #[test]
    fn trailing_stop_delegates_to_stop_market() {
        let qb = quote(1.1720, 1.1722);
        assert_eq!(
            trailing_stop_fill(OrderSide::Sell, 1.1730, Some(&qb), 0.0),
            stop_market_fill(OrderSide::Sell, 1.1730, Some(&qb), 0.0)
        );
    }

    #[test]
    fn stop_limit_buy_respects_both_thresholds() {
        // triggered and inside the limit
        let qb = quote(1.1750, 1.1752);
        let decision = stop_limit_fill(OrderSide::Buy, 1.1750, 1.1755, Some(&qb));
        assert_eq!(decision, FillDecision::Filled { price: 1.1752 });

        // triggered but past the limit: pending despite trigger being met
        let qb = quote(1.1758, 1.1760);
        assert_eq!(
            stop_limit_fill(OrderSide::Buy, 1.1750, 1.1755, Some(&qb)),
            FillDecision::Pending
        );

        // not triggered
        let qb = quote(1.1744, 1.1746);
        assert_eq!(
            stop_limit_fill(OrderSide::Buy, 1.1750, 1.1755, Some(&qb)),
            FillDecision::Pending
        );

        // no quote
        assert_eq!(
            stop_limit_fill(OrderSide::Buy, 1.1750, 1.1755, None),
            FillDecision::Pending
        );
    }

    #[test]
    fn stop_limit_sell_mirror_case() {
        let qb = quote(1.1726, 1.1728);
        let decision = stop_limit_fill(OrderSide::Sell, 1.1730, 1.1725, Some(&qb));
        assert_eq!(decision, FillDecision::Filled { price: 1.1726 });
    }

    #[test]
    fn limit_if_touched_triggers_opposite_to_stop() {
        // buy LIT: ask dipped to the trigger
        let qb = quote(1.1728, 1.1730);
        let decision = limit_if_touched_fill(OrderSide::Buy, 1.1732, 1.1731, Some(&qb));
        assert_eq!(decision, FillDecision::Filled { price: 1.1730 });

        // touched but limit violated
        let qb = quote(1.1728, 1.1730);
        assert_eq!(
            limit_if_touched_fill(OrderSide::Buy, 1.1732, 1.1729, Some(&qb)),
            FillDecision::Pending
        );

        // sell LIT: bid rallied to the trigger
        let qb = quote(1.1745, 1.1747);
        let decision = limit_if_touched_fill(OrderSide::Sell, 1.1743, 1.1744, Some(&qb));
        assert_eq!(decision, FillDecision::Filled { price: 1.1745 });
    }

    #[test]
    fn evaluate_dispatches_by_kind() {
        let qb = quote(1.1735, 1.1737);

        let order = Order::new("EURUSD", OrderSide::Buy, OrderType::Market);
        assert_eq!(
            evaluate(&order, Some(&qb), 1.1736),
            FillDecision::Filled { price: 1.1737 }
        );

        let order = Order::new(
            "EURUSD",
            OrderSide::Sell,
            OrderType::Limit { limit_price: 1.1740 },
        );
        assert_eq!(evaluate(&order, Some(&qb), 1.1736), FillDecision::Pending);

        let order = Order::new(
            "EURUSD",
            OrderSide::Sell,
            OrderType::TrailingStop { stop_price: 1.1736 },
        );
        assert_eq!(
            evaluate(&order, Some(&qb), 1.1736),
            FillDecision::Filled { price: 1.1735 }
        );

        let order = Order::new("EURUSD", OrderSide::Buy, OrderType::MarketOnClose);
        assert_eq!(
            evaluate(&order, None, 1.1736),
            FillDecision::Filled { price: 1.1736 }
        );
    }
}
