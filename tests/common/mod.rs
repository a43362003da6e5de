#![allow(dead_code)]

use std::sync::Mutex;

pub use tradeplot::domain::decision_event::DecisionEvent;
use tradeplot::domain::error::ChartError;
pub use tradeplot::domain::price_bar::PriceBar;
use tradeplot::ports::data_port::ChartDataPort;

/// In-memory data port that records the limits it was asked for.
pub struct MockDataPort {
    pub prices: Vec<PriceBar>,
    pub events: Vec<DecisionEvent>,
    pub error: Option<fn() -> ChartError>,
    pub requested: Mutex<Vec<(&'static str, usize)>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            prices: Vec::new(),
            events: Vec::new(),
            error: None,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn with_prices(mut self, prices: Vec<PriceBar>) -> Self {
        self.prices = prices;
        self
    }

    pub fn with_events(mut self, events: Vec<DecisionEvent>) -> Self {
        self.events = events;
        self
    }

    pub fn with_error(mut self, error: fn() -> ChartError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn requests(&self) -> Vec<(&'static str, usize)> {
        self.requested.lock().unwrap().clone()
    }
}

impl ChartDataPort for MockDataPort {
    fn fetch_prices(&self, limit: usize) -> Result<Vec<PriceBar>, ChartError> {
        self.requested.lock().unwrap().push(("prices", limit));
        if let Some(error) = self.error {
            return Err(error());
        }
        Ok(self.prices.iter().take(limit).cloned().collect())
    }

    fn fetch_events(&self, limit: usize) -> Result<Vec<DecisionEvent>, ChartError> {
        self.requested.lock().unwrap().push(("events", limit));
        if let Some(error) = self.error {
            return Err(error());
        }
        Ok(self.events.iter().take(limit).cloned().collect())
    }
}

/// Bar at numeric time `t` closing at `close`, with a one-point range.
pub fn bar(t: f64, close: f64) -> PriceBar {
    PriceBar::new(t, close - 0.5, close + 1.0, close - 1.0, close, 100.0)
}

/// Bars at t = 1..=n with closes 100, 101, ...
pub fn bars(n: usize) -> Vec<PriceBar> {
    (1..=n).map(|i| bar(i as f64, 99.0 + i as f64)).collect()
}

pub fn event(t: f64, category: &str) -> DecisionEvent {
    DecisionEvent::new(t, category)
}

pub fn scored(t: f64, category: &str, confidence: f64) -> DecisionEvent {
    DecisionEvent::new(t, category).with_confidence(confidence)
}

pub const PRICES_CSV: &str = "timestamp,open,high,low,close,volume\n\
    2024-01-01 00:00:00,1.1000,1.1010,1.0990,1.1005,120\n\
    2024-01-01 00:05:00,1.1005,1.1020,1.1000,1.1015,98\n\
    2024-01-01 00:10:00,1.1015,1.1030,1.1010,1.1025,110\n";

pub const DECISIONS_CSV: &str = "end_time,action,confidence,rationale\n\
    2024-01-01 00:02:00,ENTER,0.91,RSI oversold\n\
    2024-01-01 00:07:00,SKIP,0.40,\n\
    2024-01-01 00:12:00,ENTER,0.75,late signal\n";
