//! Granularity — the fixed set of supported sampling intervals.
//!
//! Storage keys embed one of these labels, so the set is closed: constructing
//! a key with any other label is a configuration error, not a coercion.

use crate::error::ConfigError;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Sampling interval of one ingested bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    #[serde(rename = "1s")]
    S1,
    #[serde(rename = "1min")]
    M1,
    #[serde(rename = "5min")]
    M5,
    #[serde(rename = "15min")]
    M15,
    #[serde(rename = "30min")]
    M30,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "1d")]
    D1,
}

impl Granularity {
    pub const ALL: [Granularity; 8] = [
        Granularity::S1,
        Granularity::M1,
        Granularity::M5,
        Granularity::M15,
        Granularity::M30,
        Granularity::H1,
        Granularity::H4,
        Granularity::D1,
    ];

    /// Lowercase label as it appears in storage keys and alias suffixes.
    pub fn label(&self) -> &'static str {
        match self {
            Granularity::S1 => "1s",
            Granularity::M1 => "1min",
            Granularity::M5 => "5min",
            Granularity::M15 => "15min",
            Granularity::M30 => "30min",
            Granularity::H1 => "1h",
            Granularity::H4 => "4h",
            Granularity::D1 => "1d",
        }
    }

    pub fn seconds(&self) -> i64 {
        match self {
            Granularity::S1 => 1,
            Granularity::M1 => 60,
            Granularity::M5 => 300,
            Granularity::M15 => 900,
            Granularity::M30 => 1800,
            Granularity::H1 => 3600,
            Granularity::H4 => 14_400,
            Granularity::D1 => 86_400,
        }
    }

    /// Bar period implied by this granularity.
    pub fn period(&self) -> Duration {
        Duration::seconds(self.seconds())
    }

    /// Case-insensitive label lookup. Anything outside the fixed set is a
    /// configuration error naming the rejected label.
    pub fn from_label(label: &str) -> Result<Self, ConfigError> {
        let lower = label.to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.label() == lower)
            .ok_or(ConfigError::BadGranularity { label: label.to_string() })
    }

    /// Granularity implied by an explicit sampling interval, if the interval
    /// matches the fixed table exactly.
    pub fn from_interval(interval: Duration) -> Option<Self> {
        let secs = interval.num_seconds();
        Self::ALL.iter().copied().find(|g| g.seconds() == secs)
    }
}
