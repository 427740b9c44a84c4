//! Fill pricing off the most recently ingested quote.

pub mod policy;
pub mod quote_cache;

pub use policy::{
    evaluate, limit_fill, limit_if_touched_fill, market_fill, stop_limit_fill, stop_market_fill,
    trailing_stop_fill, FillDecision,
};
pub use quote_cache::LastQuote;
