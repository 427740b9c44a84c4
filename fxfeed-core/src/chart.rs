//! Chart sample derivation — the pure half of the host's plotting helper.
//!
//! The host renders charts; this module only derives the values to plot from
//! a quote bar: a mid OHLC path, the raw bid/ask paths, and the closing
//! spread, plus the per-prefix series naming scheme.

use crate::domain::{Ohlc, QuoteBar};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chart series a prefix registers with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesKind {
    Quotes,
    Bid,
    Ask,
    Trades,
    Spread,
}

impl SeriesKind {
    fn suffix(&self) -> &'static str {
        match self {
            SeriesKind::Quotes => "Quotes",
            SeriesKind::Bid => "Bid",
            SeriesKind::Ask => "Ask",
            SeriesKind::Trades => "Trades",
            SeriesKind::Spread => "Spread",
        }
    }
}

/// Chart name for a symbol prefix, e.g. `EURUSD_IMPORT_Spread`.
pub fn series_name(prefix: &str, kind: SeriesKind) -> String {
    format!("{prefix}_{}", kind.suffix())
}

/// One plottable sample derived from a quote bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSample {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Embedded trade OHLC when the new-format columns are present,
    /// otherwise the bid/ask midpoint per component.
    pub mid: Ohlc,
    pub bid: Ohlc,
    pub ask: Ohlc,
    /// Closing spread; negative for an inverted book.
    pub spread: f64,
}

impl QuoteSample {
    pub fn from_quote(bar: &QuoteBar) -> Self {
        let mid = bar
            .trade
            .unwrap_or_else(|| Ohlc::midpoint(&bar.bid, &bar.ask));
        Self {
            start: bar.start,
            end: bar.end,
            mid,
            bid: bar.bid,
            ask: bar.ask,
            spread: bar.spread_close(),
        }
    }
}
