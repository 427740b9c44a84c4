//! Ingestion: storage-key derivation, per-call configuration, and line parsers.
//!
//! The host hands this layer one line of text at a time and a
//! [`IngestConfig`] value; nothing here performs I/O or holds global state.

pub mod calendar;
pub mod config;
pub mod key;
pub mod parser;

pub use calendar::{parse_day_state_line, parse_holiday_line};
pub use config::{parse_offset, IngestConfig, IngestSettings, SpreadDeltas};
pub use key::{resolve_source, storage_key, storage_key_for_label, DataKind, SymbolAlias};
pub use parser::{
    parse_quote_line, parse_synthetic_quote_line, parse_trade_line, Parsed,
};
