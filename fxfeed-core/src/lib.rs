//! fxfeed Core — FX data ingestion and quote-driven fill pricing.
//!
//! This crate contains the logic a backtesting host drives line-by-line:
//! - Domain types (OHLC groups, quote/trade bars, granularities, orders)
//! - Storage-key derivation from symbol aliases
//! - CSV line parsers with a skip/malformed sum type (never abort on bad rows)
//! - Calendar (day-state, holiday) auxiliary parsers
//! - Fill-pricing policy over the last cached quote
//! - Chart sample derivation (mid/bid/ask/spread) for host plotting
//!
//! The host owns scheduling, order lifecycle, and storage; everything here is
//! synchronous and side-effect free apart from the `LastQuote` cache value the
//! caller holds.

pub mod chart;
pub mod domain;
pub mod error;
pub mod fills;
pub mod ingest;
