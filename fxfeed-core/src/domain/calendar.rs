//! Auxiliary calendar records: news day-state flags and holiday markers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Day-state code from `news_day_state.csv`: 0 = quiet, 1 = caution, 2 = halt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayState {
    Quiet,
    Caution,
    Halt,
}

impl DayState {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(DayState::Quiet),
            1 => Some(DayState::Caution),
            2 => Some(DayState::Halt),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            DayState::Quiet => 0,
            DayState::Caution => 1,
            DayState::Halt => 2,
        }
    }
}

/// One row of the day-state file. The timestamp carries the ingest time
/// offset like every other ingested record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStateRecord {
    pub time: DateTime<Utc>,
    pub state: DayState,
}

/// One row of the holiday file.
///
/// `date` is the source date exactly as written and is never shifted by the
/// time offset; only the derived `time` (midnight UTC) carries the offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRecord {
    pub date: NaiveDate,
    pub time: DateTime<Utc>,
}
