//! Chart input port: the price series and the decision stream.

use crate::domain::decision_event::DecisionEvent;
use crate::domain::error::ChartError;
use crate::domain::price_bar::PriceBar;

pub trait ChartDataPort {
    /// First `limit` bars in source order.
    fn fetch_prices(&self, limit: usize) -> Result<Vec<PriceBar>, ChartError>;

    /// First `limit` events in source order.
    fn fetch_events(&self, limit: usize) -> Result<Vec<DecisionEvent>, ChartError>;
}
