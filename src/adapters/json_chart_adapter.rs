//! Plot spec written as pretty-printed JSON.

use crate::domain::error::ChartError;
use crate::domain::plot_spec::ChartOutcome;
use crate::ports::report_port::ChartReportPort;

pub struct JsonChartAdapter;

impl JsonChartAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonChartAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartReportPort for JsonChartAdapter {
    fn render(&self, outcome: &ChartOutcome) -> Result<String, ChartError> {
        let mut json = serde_json::to_string_pretty(outcome)?;
        json.push('\n');
        Ok(json)
    }
}
