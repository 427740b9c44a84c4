//! Ohlc — a four-price open/high/low/close group.

use serde::{Deserialize, Serialize};

/// One side of the book (or a trade path) over a single sampling interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ohlc {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Ohlc {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self { open, high, low, close }
    }

    /// All four prices shifted by `delta`. Used to derive a synthetic bid/ask
    /// from single-priced trade data.
    pub fn shifted(&self, delta: f64) -> Self {
        Self {
            open: self.open + delta,
            high: self.high + delta,
            low: self.low + delta,
            close: self.close + delta,
        }
    }

    /// Component-wise midpoint of two groups.
    pub fn midpoint(a: &Ohlc, b: &Ohlc) -> Self {
        Self {
            open: (a.open + b.open) / 2.0,
            high: (a.high + b.high) / 2.0,
            low: (a.low + b.low) / 2.0,
            close: (a.close + b.close) / 2.0,
        }
    }

    /// Basic ordering sanity check: high >= low and both contain open/close.
    ///
    /// Diagnostic only. Parsers accept insane groups (and inverted books)
    /// without validation.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}
