//! CSV file data adapter.
//!
//! Prices: `timestamp,open,high,low,close,volume[,equity,realized_pnl,unrealized_pnl]`.
//! Decisions: `end_time|timestamp,action|category[,confidence,rationale]`.
//! Columns are located by header name; empty optional cells are absent.

use crate::domain::decision_event::DecisionEvent;
use crate::domain::error::ChartError;
use crate::domain::price_bar::PriceBar;
use crate::domain::timestamp::Timestamp;
use crate::ports::data_port::ChartDataPort;
use csv::StringRecord;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct CsvAdapter {
    ohlcv_path: Option<PathBuf>,
    eval_path: Option<PathBuf>,
}

impl CsvAdapter {
    pub fn new(ohlcv_path: Option<PathBuf>, eval_path: Option<PathBuf>) -> Self {
        Self {
            ohlcv_path,
            eval_path,
        }
    }

    fn read(path: Option<&Path>, what: &str) -> Result<String, ChartError> {
        let path = path.ok_or_else(|| ChartError::ConfigMissing {
            section: "data".into(),
            key: format!("{what}_path"),
        })?;
        if !path.exists() {
            return Err(ChartError::SourceMissing {
                path: path.display().to_string(),
            });
        }
        fs::read_to_string(path).map_err(|e| ChartError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })
    }
}

struct Columns {
    headers: StringRecord,
}

impl Columns {
    fn find(&self, names: &[&str]) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
    }

    fn require(&self, names: &[&str]) -> Result<usize, ChartError> {
        self.find(names).ok_or_else(|| ChartError::Data {
            reason: format!("missing {} column", names[0]),
        })
    }
}

fn cell<'r>(record: &'r StringRecord, col: Option<usize>) -> Option<&'r str> {
    col.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn required_f64(record: &StringRecord, col: usize, name: &str, row: usize) -> Result<f64, ChartError> {
    let raw = cell(record, Some(col)).ok_or_else(|| ChartError::Data {
        reason: format!("row {row}: missing {name} value"),
    })?;
    raw.parse().map_err(|e| ChartError::Data {
        reason: format!("row {row}: invalid {name} value '{raw}': {e}"),
    })
}

fn optional_f64(
    record: &StringRecord,
    col: Option<usize>,
    name: &str,
    row: usize,
) -> Result<Option<f64>, ChartError> {
    cell(record, col)
        .map(|raw| {
            raw.parse().map_err(|e| ChartError::Data {
                reason: format!("row {row}: invalid {name} value '{raw}': {e}"),
            })
        })
        .transpose()
}

fn reader(content: &str) -> Result<(csv::Reader<&[u8]>, Columns), ChartError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers = rdr
        .headers()
        .map_err(|e| ChartError::Data {
            reason: format!("CSV header error: {}", e),
        })?
        .clone();
    Ok((rdr, Columns { headers }))
}

pub fn parse_prices(content: &str, limit: usize) -> Result<Vec<PriceBar>, ChartError> {
    let (mut rdr, cols) = reader(content)?;
    let ts = cols.require(&["timestamp", "time", "date"])?;
    let open = cols.require(&["open"])?;
    let high = cols.require(&["high"])?;
    let low = cols.require(&["low"])?;
    let close = cols.require(&["close"])?;
    let volume = cols.find(&["volume"]);
    let equity = cols.find(&["equity"]);
    let realized = cols.find(&["realized_pnl"]);
    let unrealized = cols.find(&["unrealized_pnl"]);

    let mut bars = Vec::new();
    for (i, result) in rdr.records().take(limit).enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| ChartError::Data {
            reason: format!("CSV parse error: {}", e),
        })?;
        let timestamp = cell(&record, Some(ts)).ok_or_else(|| ChartError::Data {
            reason: format!("row {row}: missing timestamp"),
        })?;

        bars.push(PriceBar {
            timestamp: Timestamp::from_field(timestamp),
            open: required_f64(&record, open, "open", row)?,
            high: required_f64(&record, high, "high", row)?,
            low: required_f64(&record, low, "low", row)?,
            close: required_f64(&record, close, "close", row)?,
            volume: optional_f64(&record, volume, "volume", row)?.unwrap_or(0.0),
            equity: optional_f64(&record, equity, "equity", row)?,
            realized_pnl: optional_f64(&record, realized, "realized_pnl", row)?,
            unrealized_pnl: optional_f64(&record, unrealized, "unrealized_pnl", row)?,
        });
    }
    Ok(bars)
}

pub fn parse_events(content: &str, limit: usize) -> Result<Vec<DecisionEvent>, ChartError> {
    let (mut rdr, cols) = reader(content)?;
    let ts = cols.require(&["end_time", "timestamp"])?;
    let category = cols.require(&["action", "category"])?;
    let confidence = cols.find(&["confidence"]);
    let rationale = cols.find(&["rationale"]);

    let mut events = Vec::new();
    for (i, result) in rdr.records().take(limit).enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| ChartError::Data {
            reason: format!("CSV parse error: {}", e),
        })?;
        let timestamp = cell(&record, Some(ts)).ok_or_else(|| ChartError::Data {
            reason: format!("row {row}: missing end_time"),
        })?;
        let name = cell(&record, Some(category)).ok_or_else(|| ChartError::Data {
            reason: format!("row {row}: missing action"),
        })?;

        events.push(DecisionEvent {
            timestamp: Timestamp::from_field(timestamp),
            category: name.to_string(),
            confidence: optional_f64(&record, confidence, "confidence", row)?,
            rationale: cell(&record, rationale).map(str::to_string),
        });
    }
    Ok(events)
}

/// 1-based data rows whose OHLC values are out of order.
pub fn inconsistent_rows(bars: &[PriceBar]) -> Vec<usize> {
    bars.iter()
        .enumerate()
        .filter(|(_, bar)| !bar.is_consistent())
        .map(|(i, _)| i + 1)
        .collect()
}

impl ChartDataPort for CsvAdapter {
    fn fetch_prices(&self, limit: usize) -> Result<Vec<PriceBar>, ChartError> {
        let content = Self::read(self.ohlcv_path.as_deref(), "ohlcv")?;
        let bars = parse_prices(&content, limit)?;
        debug!(count = bars.len(), limit, "read price bars");
        let bad = inconsistent_rows(&bars);
        if !bad.is_empty() {
            warn!(count = bad.len(), first_row = bad[0], "bars with low/high outside open/close");
        }
        Ok(bars)
    }

    fn fetch_events(&self, limit: usize) -> Result<Vec<DecisionEvent>, ChartError> {
        let content = Self::read(self.eval_path.as_deref(), "eval")?;
        let events = parse_events(&content, limit)?;
        debug!(count = events.len(), limit, "read decision events");
        Ok(events)
    }
}
