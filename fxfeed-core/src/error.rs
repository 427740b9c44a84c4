//! Configuration errors — the fail-fast half of the error policy.
//!
//! Data-quality problems never surface here: malformed CSV rows degrade to
//! [`crate::ingest::Parsed::Malformed`] so one corrupt historical row cannot
//! abort a multi-year backtest. Caller mistakes at setup time (bad granularity
//! label, unparseable offset string, negative spread delta) fail loudly
//! instead, because they would otherwise mis-key file lookups or silently
//! invert the synthetic book.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported granularity '{label}' (expected one of 1s, 1min, 5min, 15min, 30min, 1h, 4h, 1d)")]
    BadGranularity { label: String },

    #[error("unrecognized time offset '{input}' (expected forms like '90s', '-5min', '1h')")]
    BadOffset { input: String },

    #[error("spread delta must be non-negative, got {value}")]
    BadSpread { value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_offender() {
        let err = ConfigError::BadGranularity { label: "2min".into() };
        assert!(err.to_string().contains("2min"));

        let err = ConfigError::BadOffset { input: "5xyz".into() };
        assert!(err.to_string().contains("5xyz"));
    }
}
