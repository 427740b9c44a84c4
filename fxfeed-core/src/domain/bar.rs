//! Quote and trade bars — the timestamped units ingestion produces.
//!
//! Both bar kinds carry `start`, `end`, and `period` with the invariant
//! `end == start + period`; constructors compute `end` so a hand-built bar
//! cannot violate it.

use super::granularity::Granularity;
use super::ohlc::Ohlc;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Serde adapter: `chrono::Duration` as whole seconds.
mod duration_secs {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, ser: S) -> Result<S::Ok, S::Error> {
        d.num_seconds().serialize(ser)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Duration, D::Error> {
        i64::deserialize(de).map(Duration::seconds)
    }
}

/// One sampling interval's bid and ask OHLC.
///
/// No ordering is enforced across bid vs ask: an inverted book (bid above
/// ask) is accepted as ingested. The optional `trade`/`trade_volume` fields
/// carry the new-format passthrough columns; they never substitute for
/// bid/ask anywhere in this crate's pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteBar {
    pub bid: Ohlc,
    pub ask: Ohlc,
    /// Raw trade OHLC forwarded from the new CSV format, if present.
    pub trade: Option<Ohlc>,
    /// Trade volume forwarded from the new CSV format, if present.
    pub trade_volume: Option<u64>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(with = "duration_secs")]
    pub period: Duration,
}

impl QuoteBar {
    pub fn new(start: DateTime<Utc>, granularity: Granularity, bid: Ohlc, ask: Ohlc) -> Self {
        let period = granularity.period();
        Self {
            bid,
            ask,
            trade: None,
            trade_volume: None,
            start,
            end: start + period,
            period,
        }
    }

    /// Attach the new-format trade passthrough columns.
    pub fn with_trade(mut self, trade: Ohlc, volume: u64) -> Self {
        self.trade = Some(trade);
        self.trade_volume = Some(volume);
        self
    }

    /// Midpoint of bid and ask closes.
    pub fn mid_close(&self) -> f64 {
        (self.bid.close + self.ask.close) / 2.0
    }

    /// Closing spread. Negative for an inverted book.
    pub fn spread_close(&self) -> f64 {
        self.ask.close - self.bid.close
    }
}

/// One sampling interval's trade OHLC plus volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeBar {
    pub ohlc: Ohlc,
    pub volume: u64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(with = "duration_secs")]
    pub period: Duration,
}

impl TradeBar {
    pub fn new(start: DateTime<Utc>, granularity: Granularity, ohlc: Ohlc, volume: u64) -> Self {
        let period = granularity.period();
        Self {
            ohlc,
            volume,
            start,
            end: start + period,
            period,
        }
    }
}
