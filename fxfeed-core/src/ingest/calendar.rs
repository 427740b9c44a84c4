//! Parsers for the auxiliary fixed-name inputs: `news_day_state.csv` and
//! `holidays.csv`.
//!
//! Same skip/degrade contract as the quote and trade parsers. The holiday
//! record's raw source date is never shifted; only the derived midnight
//! timestamp carries the time offset.

use crate::domain::{DayState, DayStateRecord, HolidayRecord};
use crate::ingest::config::IngestConfig;
use crate::ingest::parser::Parsed;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

fn is_skippable(line: &str) -> bool {
    match line.trim_start().bytes().next() {
        Some(b) => !b.is_ascii_digit(),
        None => true,
    }
}

/// Parse one `date,DayState` row. The date accepts a full timestamp or a
/// bare ISO date (taken as midnight).
pub fn parse_day_state_line(line: &str, config: &IngestConfig) -> Parsed<DayStateRecord> {
    if is_skippable(line) {
        return Parsed::Skipped;
    }
    match day_state_fields(line, config) {
        Ok(record) => Parsed::Record(record),
        Err(reason) => Parsed::Malformed(reason),
    }
}

fn day_state_fields(line: &str, config: &IngestConfig) -> Result<DayStateRecord, String> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 2 {
        return Err(format!("expected 2 fields, got {}", fields.len()));
    }

    let raw_date = fields[0].trim();
    let naive = NaiveDateTime::parse_from_str(raw_date, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| {
            NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
        })
        .map_err(|_| format!("bad date '{raw_date}'"))?;

    let code: u8 = fields[1]
        .trim()
        .parse()
        .map_err(|_| format!("bad day-state code '{}'", fields[1].trim()))?;
    let state = DayState::from_code(code).ok_or_else(|| format!("unknown day-state code {code}"))?;

    let time = naive
        .and_utc()
        .checked_add_signed(config.time_offset)
        .ok_or_else(|| "time offset overflows the timestamp range".to_string())?;
    Ok(DayStateRecord { time, state })
}

/// Parse one holiday row: the `holiday_date` header is skipped, then one ISO
/// date per line.
pub fn parse_holiday_line(line: &str, config: &IngestConfig) -> Parsed<HolidayRecord> {
    if is_skippable(line) {
        return Parsed::Skipped;
    }
    let raw_date = line.trim();
    let Ok(date) = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d") else {
        return Parsed::Malformed(format!("bad holiday date '{raw_date}'"));
    };
    match date
        .and_time(NaiveTime::MIN)
        .and_utc()
        .checked_add_signed(config.time_offset)
    {
        Some(time) => Parsed::Record(HolidayRecord { date, time }),
        None => Parsed::Malformed("time offset overflows the timestamp range".to_string()),
    }
}
