//! OHLCV bar representation.

use serde::{Deserialize, Serialize};

use crate::domain::timestamp::Timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: Timestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realized_pnl: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unrealized_pnl: Option<f64>,
}

impl PriceBar {
    pub fn new(
        timestamp: impl Into<Timestamp>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            open,
            high,
            low,
            close,
            volume,
            equity: None,
            realized_pnl: None,
            unrealized_pnl: None,
        }
    }

    /// low <= open, close <= high
    pub fn is_consistent(&self) -> bool {
        self.low <= self.high
            && (self.low..=self.high).contains(&self.open)
            && (self.low..=self.high).contains(&self.close)
            && self.volume >= 0.0
    }

    pub fn has_pnl(&self) -> bool {
        self.equity.is_some() || self.realized_pnl.is_some() || self.unrealized_pnl.is_some()
    }

    /// Equity if reported, else realized + unrealized P&L.
    pub fn running_pnl(&self) -> Option<f64> {
        if let Some(equity) = self.equity {
            return Some(equity);
        }
        match (self.realized_pnl, self.unrealized_pnl) {
            (None, None) => None,
            (r, u) => Some(r.unwrap_or(0.0) + u.unwrap_or(0.0)),
        }
    }
}
