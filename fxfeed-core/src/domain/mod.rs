//! Domain types: OHLC groups, quote/trade bars, granularities, orders, calendar records.

pub mod bar;
pub mod calendar;
pub mod granularity;
pub mod ohlc;
pub mod order;

pub use bar::{QuoteBar, TradeBar};
pub use calendar::{DayState, DayStateRecord, HolidayRecord};
pub use granularity::Granularity;
pub use ohlc::Ohlc;
pub use order::{Order, OrderSide, OrderType};
