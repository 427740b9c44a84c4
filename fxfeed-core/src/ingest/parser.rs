//! Line parsers for quote and trade CSV rows.
//!
//! Error policy: a malformed row degrades to [`Parsed::Malformed`] and the
//! backtest keeps going — one corrupt historical row must not abort a
//! multi-year run. The reason
//! string exists purely for diagnostics; call sites treat it like
//! [`Parsed::Skipped`].

use crate::domain::{Granularity, Ohlc, QuoteBar, TradeBar};
use crate::ingest::config::IngestConfig;
use chrono::{DateTime, NaiveDateTime, Utc};

/// Outcome of parsing one line.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<T> {
    /// A usable record.
    Record(T),
    /// Blank line, header, or other intentionally skippable input.
    Skipped,
    /// A line that looked like data but failed to parse. Never fatal.
    Malformed(String),
}

impl<T> Parsed<T> {
    /// Collapse to `Option`, treating `Malformed` like `Skipped`.
    pub fn record(self) -> Option<T> {
        match self {
            Parsed::Record(record) => Some(record),
            Parsed::Skipped | Parsed::Malformed(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        match self {
            Parsed::Record(record) => Parsed::Record(f(record)),
            Parsed::Skipped => Parsed::Skipped,
            Parsed::Malformed(reason) => Parsed::Malformed(reason),
        }
    }
}

/// Blank, whitespace-only, or not starting with a digit. Catches headers
/// (`Date,...`, `time,...`) as well as trailing empty lines.
fn is_skippable(line: &str) -> bool {
    match line.trim_start().bytes().next() {
        Some(b) => !b.is_ascii_digit(),
        None => true,
    }
}

/// Apply the time offset and confirm the bar's end stays representable.
/// An offset the config layer accepts can still push a row past the
/// timestamp range; that is a data-level degrade, not a panic.
fn shift_start(
    base: DateTime<Utc>,
    granularity: Granularity,
    config: &IngestConfig,
) -> Result<DateTime<Utc>, String> {
    let start = base
        .checked_add_signed(config.time_offset)
        .ok_or_else(|| "time offset overflows the timestamp range".to_string())?;
    start
        .checked_add_signed(granularity.period())
        .ok_or_else(|| "bar end overflows the timestamp range".to_string())?;
    Ok(start)
}

fn parse_f64(field: &str, name: &str) -> Result<f64, String> {
    field
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("bad {name} value '{}'", field.trim()))
}

/// Parse one quote row.
///
/// Old format (10 columns):
/// `Date,BidOpen,BidHigh,BidLow,BidClose,AskOpen,AskHigh,AskLow,AskClose,Volume`
///
/// New format appends `Open,High,Low,Close,VolumeTrades` (15 columns). The
/// trade columns are forwarded on the bar but never replace bid/ask.
pub fn parse_quote_line(
    line: &str,
    granularity: Granularity,
    config: &IngestConfig,
) -> Parsed<QuoteBar> {
    if is_skippable(line) {
        return Parsed::Skipped;
    }
    match quote_fields(line, granularity, config) {
        Ok(bar) => Parsed::Record(bar),
        Err(reason) => Parsed::Malformed(reason),
    }
}

fn quote_fields(
    line: &str,
    granularity: Granularity,
    config: &IngestConfig,
) -> Result<QuoteBar, String> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 10 && fields.len() != 15 {
        return Err(format!("expected 10 or 15 fields, got {}", fields.len()));
    }

    let naive = NaiveDateTime::parse_from_str(fields[0].trim(), "%Y-%m-%d %H:%M:%S")
        .map_err(|_| format!("bad date '{}'", fields[0].trim()))?;
    let start = shift_start(naive.and_utc(), granularity, config)?;

    let bid = Ohlc::new(
        parse_f64(fields[1], "bid open")?,
        parse_f64(fields[2], "bid high")?,
        parse_f64(fields[3], "bid low")?,
        parse_f64(fields[4], "bid close")?,
    );
    let ask = Ohlc::new(
        parse_f64(fields[5], "ask open")?,
        parse_f64(fields[6], "ask high")?,
        parse_f64(fields[7], "ask low")?,
        parse_f64(fields[8], "ask close")?,
    );

    let mut bar = QuoteBar::new(start, granularity, bid, ask);

    if fields.len() == 15 {
        let trade = Ohlc::new(
            parse_f64(fields[10], "trade open")?,
            parse_f64(fields[11], "trade high")?,
            parse_f64(fields[12], "trade low")?,
            parse_f64(fields[13], "trade close")?,
        );
        let volume: u64 = fields[14]
            .trim()
            .parse()
            .map_err(|_| format!("bad trade volume '{}'", fields[14].trim()))?;
        bar = bar.with_trade(trade, volume);
    }

    Ok(bar)
}

/// Parse one trade row: `time,open,high,low,close,volume` with a Unix
/// timestamp in seconds or milliseconds (disambiguated by magnitude).
pub fn parse_trade_line(
    line: &str,
    granularity: Granularity,
    config: &IngestConfig,
) -> Parsed<TradeBar> {
    if is_skippable(line) {
        return Parsed::Skipped;
    }
    match trade_fields(line, granularity, config) {
        Ok(bar) => Parsed::Record(bar),
        Err(reason) => Parsed::Malformed(reason),
    }
}

fn trade_fields(
    line: &str,
    granularity: Granularity,
    config: &IngestConfig,
) -> Result<TradeBar, String> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 6 {
        return Err(format!("expected 6 fields, got {}", fields.len()));
    }

    let mut ts: i64 = fields[0]
        .trim()
        .parse()
        .map_err(|_| format!("bad timestamp '{}'", fields[0].trim()))?;
    // Above 10^12 the value can only be milliseconds.
    if ts > 1_000_000_000_000 {
        ts /= 1000;
    }
    let base = DateTime::<Utc>::from_timestamp(ts, 0)
        .ok_or_else(|| format!("timestamp '{ts}' out of range"))?;
    let start = shift_start(base, granularity, config)?;

    let ohlc = Ohlc::new(
        parse_f64(fields[1], "open")?,
        parse_f64(fields[2], "high")?,
        parse_f64(fields[3], "low")?,
        parse_f64(fields[4], "close")?,
    );
    let volume: u64 = fields[5]
        .trim()
        .parse()
        .map_err(|_| format!("bad volume '{}'", fields[5].trim()))?;

    Ok(TradeBar::new(start, granularity, ohlc, volume))
}

/// Parse a trade row into a synthetic quote: bid = trade − spread.bid,
/// ask = trade + spread.ask, applied to each of open/high/low/close.
///
/// Lets a trade-only feed stand in for a quote feed. With non-negative
/// deltas (enforced at config time) the synthetic book is never inverted.
pub fn parse_synthetic_quote_line(
    line: &str,
    granularity: Granularity,
    config: &IngestConfig,
) -> Parsed<QuoteBar> {
    let spread = config.spread;
    parse_trade_line(line, granularity, config).map(|trade| {
        let bid = trade.ohlc.shifted(-spread.bid);
        let ask = trade.ohlc.shifted(spread.ask);
        // trade.start already carries the time offset
        QuoteBar::new(trade.start, granularity, bid, ask).with_trade(trade.ohlc, trade.volume)
    })
}
