//! Per-call ingestion configuration.
//!
//! The original host plugin kept a process-wide time offset and spread pair;
//! here both live on an explicit [`IngestConfig`] value passed into every
//! parser call, so concurrent or test-parallel use needs no synchronization.

use crate::error::ConfigError;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Price offsets used only when deriving a synthetic bid/ask from
/// single-priced trade data. Defaults to one pip on the EURUSD reference
/// pair for both sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadDeltas {
    pub bid: f64,
    pub ask: f64,
}

impl Default for SpreadDeltas {
    fn default() -> Self {
        Self {
            bid: 0.0001,
            ask: 0.0001,
        }
    }
}

/// Configuration read by every parse call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngestConfig {
    /// Signed shift applied to every ingested record's start/end time.
    /// Never applied to a holiday record's raw source date.
    pub time_offset: Duration,
    pub spread: SpreadDeltas,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            time_offset: Duration::zero(),
            spread: SpreadDeltas::default(),
        }
    }
}

impl IngestConfig {
    pub fn with_offset(mut self, offset: Duration) -> Self {
        self.time_offset = offset;
        self
    }

    /// Parse and set the offset from a string form like `90s` or `-5min`.
    pub fn with_offset_str(self, input: &str) -> Result<Self, ConfigError> {
        Ok(self.with_offset(parse_offset(input)?))
    }

    /// Explicit spread setter; negative deltas are a configuration error
    /// (they would silently invert the synthetic book).
    pub fn set_spread(&mut self, bid: f64, ask: f64) -> Result<(), ConfigError> {
        for value in [bid, ask] {
            if value < 0.0 || !value.is_finite() {
                return Err(ConfigError::BadSpread { value });
            }
        }
        self.spread = SpreadDeltas { bid, ask };
        Ok(())
    }

    pub fn clear_offset(&mut self) {
        self.time_offset = Duration::zero();
    }
}

/// Parse an offset string: optional sign, integer magnitude, unit suffix.
/// Accepted units: `s`/`sec`, `m`/`min`, `h`, `d`.
pub fn parse_offset(input: &str) -> Result<Duration, ConfigError> {
    let bad = || ConfigError::BadOffset {
        input: input.to_string(),
    };

    let trimmed = input.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(bad)?;
    if digits_end == 0 {
        return Err(bad());
    }
    let magnitude: i64 = rest[..digits_end].parse().map_err(|_| bad())?;
    // try_* constructors: a magnitude past chrono's bounds is a bad offset,
    // not a panic.
    let offset = match rest[digits_end..].to_ascii_lowercase().as_str() {
        "s" | "sec" => Duration::try_seconds(magnitude),
        "m" | "min" => Duration::try_minutes(magnitude),
        "h" => Duration::try_hours(magnitude),
        "d" => Duration::try_days(magnitude),
        _ => None,
    }
    .ok_or_else(bad)?;
    Ok(if negative { -offset } else { offset })
}

/// Serializable form of [`IngestConfig`] for TOML config files: the offset
/// stays a string so file-level mistakes surface as the same
/// invalid-configuration error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestSettings {
    pub offset: Option<String>,
    pub bid_delta: Option<f64>,
    pub ask_delta: Option<f64>,
}

impl IngestSettings {
    pub fn into_config(self) -> Result<IngestConfig, ConfigError> {
        let mut config = IngestConfig::default();
        if let Some(offset) = self.offset.as_deref() {
            config = config.with_offset_str(offset)?;
        }
        if self.bid_delta.is_some() || self.ask_delta.is_some() {
            let defaults = SpreadDeltas::default();
            config.set_spread(
                self.bid_delta.unwrap_or(defaults.bid),
                self.ask_delta.unwrap_or(defaults.ask),
            )?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_zero_offset_one_pip() {
        let config = IngestConfig::default();
        assert_eq!(config.time_offset, Duration::zero());
        assert_eq!(config.spread.bid, 0.0001);
        assert_eq!(config.spread.ask, 0.0001);
    }

    #[test]
    fn offset_strings_parse_by_unit() {
        assert_eq!(parse_offset("90s").unwrap(), Duration::seconds(90));
        assert_eq!(parse_offset("+90sec").unwrap(), Duration::seconds(90));
        assert_eq!(parse_offset("5min").unwrap(), Duration::minutes(5));
        assert_eq!(parse_offset("-2h").unwrap(), Duration::hours(-2));
        assert_eq!(parse_offset("1d").unwrap(), Duration::days(1));
    }

    #[test]
    fn unrecognized_offset_is_a_config_error() {
        for input in ["5xyz", "", "min", "1.5h", "h5"] {
            let err = parse_offset(input).unwrap_err();
            assert!(matches!(err, ConfigError::BadOffset { .. }), "{input}");
        }
    }

    #[test]
    fn offset_past_duration_bounds_is_a_config_error_not_a_panic() {
        for input in ["999999999999999d", "-999999999999999d", "9223372036854775807s"] {
            let err = parse_offset(input).unwrap_err();
            assert!(matches!(err, ConfigError::BadOffset { .. }), "{input}");
        }
        // large but representable offsets still parse
        assert!(parse_offset("100000d").is_ok());
    }

    #[test]
    fn bare_number_has_no_implied_unit() {
        assert!(parse_offset("90").is_err());
    }

    #[test]
    fn negative_spread_is_rejected() {
        let mut config = IngestConfig::default();
        let err = config.set_spread(-0.0001, 0.0001).unwrap_err();
        assert!(matches!(err, ConfigError::BadSpread { .. }));
        // unchanged on failure
        assert_eq!(config.spread, SpreadDeltas::default());
    }

    #[test]
    fn clear_offset_resets_to_zero() {
        let mut config = IngestConfig::default().with_offset(Duration::seconds(90));
        config.clear_offset();
        assert_eq!(config.time_offset, Duration::zero());
    }

    #[test]
    fn settings_round_trip_through_config() {
        let settings = IngestSettings {
            offset: Some("90s".into()),
            bid_delta: Some(0.0002),
            ask_delta: None,
        };
        let config = settings.into_config().unwrap();
        assert_eq!(config.time_offset, Duration::seconds(90));
        assert_eq!(config.spread.bid, 0.0002);
        assert_eq!(config.spread.ask, 0.0001);

        let settings = IngestSettings {
            offset: Some("5xyz".into()),
            ..Default::default()
        };
        assert!(settings.into_config().is_err());
    }
}
