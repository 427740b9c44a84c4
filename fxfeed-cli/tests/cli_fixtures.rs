//! End-to-end checks of the replay flow against fixture files, driving the
//! same core entry points the CLI uses.

use std::io::Write;

use chrono::Duration;
use fxfeed_core::domain::{Granularity, Order, OrderSide, OrderType};
use fxfeed_core::fills::{evaluate, FillDecision, LastQuote};
use fxfeed_core::ingest::{parse_quote_line, resolve_source, DataKind, IngestConfig};

const QUOTES: &str = "\
Date,BidOpen,BidHigh,BidLow,BidClose,AskOpen,AskHigh,AskLow,AskClose,Volume
2025-07-10 00:00:00,1.17376,1.17377,1.17353,1.17359,1.17387,1.17388,1.17363,1.17369,278
2025-07-10 00:01:00,1.17359,1.17410,1.17359,1.17405,1.17369,1.17420,1.17369,1.17415,301
not,a,data,line
2025-07-10 00:02:00,1.17405,1.17444,1.17400,1.17442,1.17415,1.17454,1.17410,1.17452,264
";

fn write_fixture(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn replay_fills_limit_sell_when_bid_crosses() {
    let fixture = write_fixture(QUOTES);
    let config = IngestConfig::default();
    let mut cache = LastQuote::new();

    let order = Order::new(
        "EURUSD",
        OrderSide::Sell,
        OrderType::Limit { limit_price: 1.17440 },
    );

    let contents = std::fs::read_to_string(fixture.path()).unwrap();
    let mut fill: Option<(usize, f64)> = None;
    for (line_no, line) in contents.lines().enumerate() {
        let Some(quote) = parse_quote_line(line, Granularity::M1, &config).record() else {
            continue;
        };
        cache.update(quote);
        if fill.is_none() {
            if let FillDecision::Filled { price } = evaluate(&order, cache.get(), 1.1736) {
                fill = Some((line_no + 1, price));
            }
        }
    }

    // Only the last row's bid (1.17442) crosses the limit.
    let (line_no, price) = fill.expect("limit sell should fill");
    assert_eq!(line_no, 5);
    assert_eq!(price, 1.17442);
}

#[test]
fn replay_skips_header_and_junk_rows() {
    let fixture = write_fixture(QUOTES);
    let config = IngestConfig::default();
    let contents = std::fs::read_to_string(fixture.path()).unwrap();

    let records = contents
        .lines()
        .filter_map(|line| parse_quote_line(line, Granularity::M1, &config).record())
        .count();
    assert_eq!(records, 3);
}

#[test]
fn market_order_fills_on_first_quote_of_shifted_feed() {
    let fixture = write_fixture(QUOTES);
    let config = IngestConfig::default()
        .with_offset(Duration::seconds(90));
    let contents = std::fs::read_to_string(fixture.path()).unwrap();

    let first = contents
        .lines()
        .find_map(|line| parse_quote_line(line, Granularity::M1, &config).record())
        .unwrap();
    assert_eq!(
        first.start.to_rfc3339(),
        "2025-07-10T00:01:30+00:00"
    );

    let order = Order::new("EURUSD", OrderSide::Buy, OrderType::Market);
    let decision = evaluate(&order, Some(&first), 1.1736);
    assert_eq!(decision, FillDecision::Filled { price: 1.17369 });
}

#[test]
fn resolver_names_the_file_the_host_should_fetch() {
    let key = resolve_source("EURUSD_IMPORT", None, DataKind::Quotes, "utc", None);
    assert_eq!(key, "fx-EURUSD-quotes-1min-utc.csv");
}
