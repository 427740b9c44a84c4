//! Last-quote handoff between ingestion and the fill policy.
//!
//! The host's event loop writes every new quote here and the fill policy
//! reads it; calls are strictly sequential, so this is a plain value the
//! caller owns (instance-scoped, not process-wide).

use crate::domain::QuoteBar;

/// Single most-recent quote, overwritten on every update.
#[derive(Debug, Clone, Default)]
pub struct LastQuote {
    current: Option<QuoteBar>,
}

impl LastQuote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supersede the cached quote.
    pub fn update(&mut self, quote: QuoteBar) {
        self.current = Some(quote);
    }

    pub fn get(&self) -> Option<&QuoteBar> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
