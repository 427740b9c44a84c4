//! Storage-key derivation: symbol alias + interval → blob-store file name.
//!
//! Key convention: `fx-<PAIR>-<kind>-<granularity>-<tz>[-<source>].csv`,
//! e.g. `fx-EURUSD-quotes-1min-utc.csv`,
//! `fx-EURUSD-trades-1h-utc-tradingview.csv`.

use crate::domain::Granularity;
use crate::error::ConfigError;
use chrono::Duration;

/// Which series a file carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    /// Bid/ask OHLC rows.
    Quotes,
    /// Single-priced trade OHLC rows.
    Trades,
}

impl DataKind {
    pub fn label(&self) -> &'static str {
        match self {
            DataKind::Quotes => "quotes",
            DataKind::Trades => "trades",
        }
    }
}

/// Build a storage key. The granularity arrives as the enum, so an invalid
/// label is unrepresentable here; string-level callers go through
/// [`storage_key_for_label`].
pub fn storage_key(
    pair: &str,
    kind: DataKind,
    granularity: Granularity,
    tz: &str,
    source: Option<&str>,
) -> String {
    let pair = pair.to_ascii_uppercase();
    let tz = tz.to_ascii_lowercase();
    match source {
        Some(src) => format!(
            "fx-{pair}-{}-{}-{tz}-{}.csv",
            kind.label(),
            granularity.label(),
            src.to_ascii_lowercase()
        ),
        None => format!(
            "fx-{pair}-{}-{}-{tz}.csv",
            kind.label(),
            granularity.label()
        ),
    }
}

/// String-level entry point: rejects any granularity label outside the fixed
/// set with a configuration error naming the label.
pub fn storage_key_for_label(
    pair: &str,
    kind: DataKind,
    granularity_label: &str,
    tz: &str,
    source: Option<&str>,
) -> Result<String, ConfigError> {
    let granularity = Granularity::from_label(granularity_label)?;
    Ok(storage_key(pair, kind, granularity, tz, source))
}

/// Pair and granularity extracted from a free-form symbol alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolAlias {
    pub pair: String,
    pub granularity: Granularity,
}

impl SymbolAlias {
    /// Parse an alias like `EURUSD_IMPORT` or `GBPUSD_5MIN`.
    ///
    /// The first six characters (upper-cased) are the pair. A trailing
    /// `_<GRAN>` token wins; otherwise the explicit interval is mapped via
    /// the fixed table; otherwise the smallest granularity (1min) applies.
    pub fn parse(alias: &str, explicit_interval: Option<Duration>) -> Self {
        let upper = alias.to_ascii_uppercase();
        let pair: String = upper.chars().take(6).collect();

        let granularity = Self::trailing_granularity(&upper)
            .or_else(|| explicit_interval.and_then(Granularity::from_interval))
            .unwrap_or(Granularity::M1);

        Self { pair, granularity }
    }

    fn trailing_granularity(upper: &str) -> Option<Granularity> {
        Granularity::ALL.iter().copied().find(|g| {
            let suffix = format!("_{}", g.label().to_ascii_uppercase());
            upper.ends_with(&suffix)
        })
    }
}

/// Host-facing resolver: alias + requested interval → storage key.
pub fn resolve_source(
    alias: &str,
    explicit_interval: Option<Duration>,
    kind: DataKind,
    tz: &str,
    source: Option<&str>,
) -> String {
    let parsed = SymbolAlias::parse(alias, explicit_interval);
    storage_key(&parsed.pair, kind, parsed.granularity, tz, source)
}
