//! fxfeed CLI — key derivation, CSV inspection, and quote-replay fill evaluation.
//!
//! Commands:
//! - `key` — derive the blob-store key for a symbol alias
//! - `inspect` — stream a CSV file through a parser and report record /
//!   skipped / malformed counts
//! - `replay` — feed a quotes file through the last-quote cache and evaluate
//!   a TOML-configured order list per quote event (a stand-in for the host's
//!   event loop)

use anyhow::{bail, Context, Result};
use chrono::Duration;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use fxfeed_core::domain::{Granularity, Order, QuoteBar, TradeBar};
use fxfeed_core::fills::{evaluate, FillDecision, LastQuote};
use fxfeed_core::ingest::{
    parse_day_state_line, parse_holiday_line, parse_quote_line, parse_synthetic_quote_line,
    parse_trade_line, resolve_source, DataKind, IngestConfig, IngestSettings, Parsed,
};

#[derive(Parser)]
#[command(name = "fxfeed", about = "fxfeed CLI — FX CSV ingestion and fill-policy tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the storage key for a symbol alias.
    Key {
        /// Symbol alias, e.g. EURUSD_IMPORT or GBPUSD_5MIN.
        #[arg(long)]
        alias: String,

        /// Data kind: quotes or trades.
        #[arg(long, value_enum, default_value_t = KindArg::Quotes)]
        kind: KindArg,

        /// Time zone label embedded in the key.
        #[arg(long, default_value = "utc")]
        tz: String,

        /// Optional source suffix, e.g. tradingview.
        #[arg(long)]
        source: Option<String>,

        /// Explicit sampling interval in seconds (used when the alias has no
        /// granularity suffix).
        #[arg(long)]
        interval: Option<i64>,
    },
    /// Parse a CSV file and report record / skipped / malformed counts.
    Inspect {
        /// Input CSV file.
        file: PathBuf,

        /// Line format to parse the file as.
        #[arg(long, value_enum)]
        format: FormatArg,

        /// Granularity label (1s, 1min, 5min, 15min, 30min, 1h, 4h, 1d).
        #[arg(long, default_value = "1min")]
        granularity: String,

        /// Time offset applied to every record, e.g. 90s or -5min.
        #[arg(long)]
        offset: Option<String>,

        /// Write parsed records to this path as normalized CSV.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Replay a quotes file against a TOML order list and print fill events.
    Replay {
        /// Quotes CSV file (old or new format).
        #[arg(long)]
        quotes: PathBuf,

        /// Orders TOML file.
        #[arg(long)]
        orders: PathBuf,

        /// Granularity label for the quotes file.
        #[arg(long, default_value = "1min")]
        granularity: String,

        /// Treat the quotes file as trade rows and synthesize bid/ask.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Write fill events to this path as CSV.
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Quotes,
    Trades,
}

impl From<KindArg> for DataKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Quotes => DataKind::Quotes,
            KindArg::Trades => DataKind::Trades,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Bid/ask quote rows (10 or 15 columns).
    Quotes,
    /// Trade rows (unix timestamp + OHLC + volume).
    Trades,
    /// Trade rows synthesized into bid/ask quotes.
    Synthetic,
    /// news_day_state.csv rows.
    DayState,
    /// holidays.csv rows.
    Holidays,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Key {
            alias,
            kind,
            tz,
            source,
            interval,
        } => run_key(&alias, kind, &tz, source.as_deref(), interval),
        Commands::Inspect {
            file,
            format,
            granularity,
            offset,
            export,
        } => run_inspect(&file, format, &granularity, offset.as_deref(), export.as_deref()),
        Commands::Replay {
            quotes,
            orders,
            granularity,
            synthetic,
            export,
        } => run_replay(&quotes, &orders, &granularity, synthetic, export.as_deref()),
    }
}

fn run_key(
    alias: &str,
    kind: KindArg,
    tz: &str,
    source: Option<&str>,
    interval: Option<i64>,
) -> Result<()> {
    let interval = interval.map(Duration::seconds);
    let key = resolve_source(alias, interval, kind.into(), tz, source);
    println!("{key}");
    Ok(())
}

/// Per-file parse tallies.
#[derive(Debug, Default)]
struct InspectSummary {
    records: usize,
    skipped: usize,
    malformed: usize,
}

impl InspectSummary {
    fn tally<T>(&mut self, line_no: usize, parsed: &Parsed<T>) {
        match parsed {
            Parsed::Record(_) => self.records += 1,
            Parsed::Skipped => self.skipped += 1,
            Parsed::Malformed(reason) => {
                self.malformed += 1;
                eprintln!("line {line_no}: {reason}");
            }
        }
    }
}

fn run_inspect(
    file: &Path,
    format: FormatArg,
    granularity_label: &str,
    offset: Option<&str>,
    export: Option<&Path>,
) -> Result<()> {
    let granularity = Granularity::from_label(granularity_label)?;
    let config = build_config(offset)?;

    let reader = open_lines(file)?;
    let mut summary = InspectSummary::default();
    let mut quote_records: Vec<QuoteBar> = Vec::new();
    let mut trade_records: Vec<TradeBar> = Vec::new();

    for (line_no, line) in reader.enumerate() {
        let line = line.with_context(|| format!("failed to read {}", file.display()))?;
        let line_no = line_no + 1;
        match format {
            FormatArg::Quotes => {
                let parsed = parse_quote_line(&line, granularity, &config);
                summary.tally(line_no, &parsed);
                quote_records.extend(parsed.record());
            }
            FormatArg::Synthetic => {
                let parsed = parse_synthetic_quote_line(&line, granularity, &config);
                summary.tally(line_no, &parsed);
                quote_records.extend(parsed.record());
            }
            FormatArg::Trades => {
                let parsed = parse_trade_line(&line, granularity, &config);
                summary.tally(line_no, &parsed);
                trade_records.extend(parsed.record());
            }
            FormatArg::DayState => {
                summary.tally(line_no, &parse_day_state_line(&line, &config));
            }
            FormatArg::Holidays => {
                summary.tally(line_no, &parse_holiday_line(&line, &config));
            }
        }
    }

    println!(
        "{}: {} records, {} skipped, {} malformed",
        file.display(),
        summary.records,
        summary.skipped,
        summary.malformed
    );
    if let (Some(first), Some(last)) = (quote_records.first(), quote_records.last()) {
        println!(
            "range: {} .. {} (bid close {} .. {})",
            first.start, last.end, first.bid.close, last.bid.close
        );
    }
    if let (Some(first), Some(last)) = (trade_records.first(), trade_records.last()) {
        println!(
            "range: {} .. {} (close {} .. {})",
            first.start, last.end, first.ohlc.close, last.ohlc.close
        );
    }

    if let Some(path) = export {
        match format {
            FormatArg::Quotes | FormatArg::Synthetic => export_quotes_csv(path, &quote_records)?,
            FormatArg::Trades => export_trades_csv(path, &trade_records)?,
            _ => bail!("--export is only supported for quotes, trades, and synthetic formats"),
        }
        println!("exported {} records to {}", summary.records, path.display());
    }

    Ok(())
}

// ─── Replay ─────────────────────────────────────────────────────────

/// TOML replay configuration: ingest settings, the raw reference price used
/// on no-quote fallbacks, and the order list.
#[derive(Debug, Deserialize)]
struct ReplayConfig {
    /// Raw asset price used when no quote is cached yet.
    reference_price: f64,
    #[serde(default)]
    ingest: IngestSettings,
    #[serde(default)]
    orders: Vec<Order>,
}

#[derive(Debug)]
struct FillEvent {
    line_no: usize,
    order_index: usize,
    order: Order,
    price: f64,
}

fn run_replay(
    quotes: &Path,
    orders_path: &Path,
    granularity_label: &str,
    synthetic: bool,
    export: Option<&Path>,
) -> Result<()> {
    let granularity = Granularity::from_label(granularity_label)?;

    let raw = std::fs::read_to_string(orders_path)
        .with_context(|| format!("failed to read {}", orders_path.display()))?;
    let replay: ReplayConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse {}", orders_path.display()))?;
    if replay.orders.is_empty() {
        bail!("no orders defined in {}", orders_path.display());
    }
    let config = replay.ingest.clone().into_config()?;

    let mut cache = LastQuote::new();
    let mut pending: Vec<(usize, Order)> = replay.orders.into_iter().enumerate().collect();
    let mut fills: Vec<FillEvent> = Vec::new();

    for (line_no, line) in open_lines(quotes)?.enumerate() {
        let line = line.with_context(|| format!("failed to read {}", quotes.display()))?;
        let line_no = line_no + 1;

        let parsed = if synthetic {
            parse_synthetic_quote_line(&line, granularity, &config)
        } else {
            parse_quote_line(&line, granularity, &config)
        };
        let Some(quote) = parsed.record() else {
            continue;
        };
        cache.update(quote);

        // Evaluate every still-pending order against the fresh quote.
        pending.retain(|(order_index, order)| {
            match evaluate(order, cache.get(), replay.reference_price) {
                FillDecision::Filled { price } => {
                    fills.push(FillEvent {
                        line_no,
                        order_index: *order_index,
                        order: order.clone(),
                        price,
                    });
                    false
                }
                FillDecision::Pending => true,
            }
        });
        if pending.is_empty() {
            break;
        }
    }

    for fill in &fills {
        println!(
            "line {}: order #{} {:?} {:?} {} filled at {}",
            fill.line_no,
            fill.order_index,
            fill.order.side,
            fill.order.order_type,
            fill.order.symbol,
            fill.price
        );
    }
    println!("{} filled, {} pending", fills.len(), pending.len());
    for (order_index, order) in &pending {
        println!(
            "pending: order #{} {:?} {:?} {}",
            order_index, order.side, order.order_type, order.symbol
        );
    }

    if let Some(path) = export {
        export_fills_csv(path, &fills)?;
        println!("fills written to {}", path.display());
    }

    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────

fn build_config(offset: Option<&str>) -> Result<IngestConfig> {
    let mut config = IngestConfig::default();
    if let Some(offset) = offset {
        config = config.with_offset_str(offset)?;
    }
    Ok(config)
}

fn open_lines(path: &Path) -> Result<impl Iterator<Item = std::io::Result<String>>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(file).lines())
}

fn export_quotes_csv(path: &Path, records: &[QuoteBar]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    wtr.write_record([
        "start", "end", "bid_open", "bid_high", "bid_low", "bid_close", "ask_open", "ask_high",
        "ask_low", "ask_close",
    ])?;
    for qb in records {
        wtr.write_record([
            qb.start.to_rfc3339(),
            qb.end.to_rfc3339(),
            qb.bid.open.to_string(),
            qb.bid.high.to_string(),
            qb.bid.low.to_string(),
            qb.bid.close.to_string(),
            qb.ask.open.to_string(),
            qb.ask.high.to_string(),
            qb.ask.low.to_string(),
            qb.ask.close.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn export_trades_csv(path: &Path, records: &[TradeBar]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    wtr.write_record(["start", "end", "open", "high", "low", "close", "volume"])?;
    for tb in records {
        wtr.write_record([
            tb.start.to_rfc3339(),
            tb.end.to_rfc3339(),
            tb.ohlc.open.to_string(),
            tb.ohlc.high.to_string(),
            tb.ohlc.low.to_string(),
            tb.ohlc.close.to_string(),
            tb.volume.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxfeed_core::domain::{OrderSide, OrderType};

    const ORDERS_TOML: &str = r#"
reference_price = 1.1736

[ingest]
offset = "90s"

[[orders]]
symbol = "EURUSD"
side = "buy"
kind = "market"

[[orders]]
symbol = "EURUSD"
side = "sell"
kind = "limit"
limit_price = 1.1740

[[orders]]
symbol = "EURUSD"
side = "buy"
kind = "stop_limit"
stop_price = 1.1750
limit_price = 1.1755

[[orders]]
symbol = "EURUSD"
side = "sell"
kind = "trailing_stop"
stop_price = 1.1730

[[orders]]
symbol = "EURUSD"
side = "buy"
kind = "limit_if_touched"
trigger_price = 1.1732
limit_price = 1.1731
"#;

    #[test]
    fn orders_toml_deserializes_every_kind_shape() {
        let replay: ReplayConfig = toml::from_str(ORDERS_TOML).unwrap();
        assert_eq!(replay.reference_price, 1.1736);
        assert_eq!(replay.ingest.offset.as_deref(), Some("90s"));

        let kinds: Vec<&OrderType> = replay.orders.iter().map(|o| &o.order_type).collect();
        assert_eq!(kinds.len(), 5);
        // unit variant
        assert_eq!(*kinds[0], OrderType::Market);
        assert_eq!(replay.orders[0].side, OrderSide::Buy);
        // single-price variants
        assert_eq!(*kinds[1], OrderType::Limit { limit_price: 1.1740 });
        assert_eq!(*kinds[3], OrderType::TrailingStop { stop_price: 1.1730 });
        // two-price variants
        assert_eq!(
            *kinds[2],
            OrderType::StopLimit {
                stop_price: 1.1750,
                limit_price: 1.1755,
            }
        );
        assert_eq!(
            *kinds[4],
            OrderType::LimitIfTouched {
                trigger_price: 1.1732,
                limit_price: 1.1731,
            }
        );
    }

    #[test]
    fn replay_loop_fills_toml_orders_as_quotes_arrive() {
        let replay: ReplayConfig = toml::from_str(ORDERS_TOML).unwrap();
        let config = replay.ingest.clone().into_config().unwrap();

        let quote_lines = [
            "2025-07-10 00:00:00,1.17376,1.17377,1.17353,1.17359,1.17387,1.17388,1.17363,1.17369,278",
            "2025-07-10 00:01:00,1.17359,1.17442,1.17359,1.17442,1.17369,1.17452,1.17369,1.17452,301",
            "2025-07-10 00:02:00,1.17442,1.17510,1.17442,1.17510,1.17452,1.17520,1.17452,1.17520,264",
        ];

        let mut cache = LastQuote::new();
        let mut pending: Vec<(usize, Order)> = replay.orders.into_iter().enumerate().collect();
        let mut fills: Vec<(usize, f64)> = Vec::new();

        for line in quote_lines {
            let quote = parse_quote_line(line, Granularity::M1, &config)
                .record()
                .unwrap();
            cache.update(quote);
            pending.retain(|(order_index, order)| {
                match evaluate(order, cache.get(), replay.reference_price) {
                    FillDecision::Filled { price } => {
                        fills.push((*order_index, price));
                        false
                    }
                    FillDecision::Pending => true,
                }
            });
        }

        // market buy on the first quote's ask, limit sell once the bid
        // crosses, stop-limit buy once the ask triggers inside the limit
        assert_eq!(fills[0], (0, 1.17369));
        assert_eq!(fills[1], (1, 1.17442));
        assert_eq!(fills[2], (2, 1.17520));
        // trailing stop and limit-if-touched never trigger on this tape
        let pending_indices: Vec<usize> = pending.iter().map(|(i, _)| *i).collect();
        assert_eq!(pending_indices, vec![3, 4]);
    }
}

fn export_fills_csv(path: &Path, fills: &[FillEvent]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    wtr.write_record(["line", "order_index", "symbol", "side", "price"])?;
    for fill in fills {
        wtr.write_record([
            fill.line_no.to_string(),
            fill.order_index.to_string(),
            fill.order.symbol.clone(),
            format!("{:?}", fill.order.side),
            fill.price.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
