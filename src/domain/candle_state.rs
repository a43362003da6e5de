//! Strategy-run series: one strategy/broker snapshot per closed candle.

use serde::{Deserialize, Serialize};

use crate::domain::decision_event::DecisionEvent;
use crate::domain::price_bar::PriceBar;
use crate::domain::timestamp::Timestamp;

pub const ANCHOR: &str = "ANCHOR";
pub const TP_HIT: &str = "TP_HIT";
pub const RUNG_ADDED: &str = "RUNG_ADDED";
pub const RUNG_FILLED: &str = "RUNG_FILLED";
pub const POSITION_CLOSED: &str = "POSITION_CLOSED";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleState {
    pub timestamp: Timestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,

    #[serde(default)]
    pub current_rsi_value: f64,

    #[serde(default)]
    pub events: Vec<String>,

    #[serde(default)]
    pub num_active_rungs: u32,
    #[serde(default)]
    pub num_pending_rungs: u32,

    #[serde(default)]
    pub num_active_trades: u32,
    #[serde(default)]
    pub num_pending_trades: u32,
    #[serde(default)]
    pub num_closed_trades: u32,

    #[serde(default)]
    pub realized_pnl: f64,
    #[serde(default)]
    pub unrealized_pnl: f64,
    #[serde(default)]
    pub equity: f64,
}

/// Response body of the run-backtest call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestSeries {
    pub series: Vec<CandleState>,
}

impl CandleState {
    pub fn to_price_bar(&self) -> PriceBar {
        PriceBar {
            timestamp: self.timestamp.clone(),
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
            equity: Some(self.equity),
            realized_pnl: Some(self.realized_pnl),
            unrealized_pnl: Some(self.unrealized_pnl),
        }
    }

    fn ladder_summary(&self) -> String {
        format!(
            "rungs: {} active / {} pending, RSI: {:.1}",
            self.num_active_rungs, self.num_pending_rungs, self.current_rsi_value
        )
    }
}

/// Split a series into chart inputs: every record is a bar, every entry in
/// `events` becomes a decision event at that record's timestamp.
pub fn series_to_inputs(series: &[CandleState]) -> (Vec<PriceBar>, Vec<DecisionEvent>) {
    let bars = series.iter().map(CandleState::to_price_bar).collect();
    let events = series
        .iter()
        .flat_map(|state| {
            let summary = state.ladder_summary();
            state.events.iter().map(move |name| {
                DecisionEvent::new(state.timestamp.clone(), name.clone())
                    .with_rationale(summary.clone())
            })
        })
        .collect();
    (bars, events)
}
