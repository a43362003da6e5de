//! Standalone HTML chart page rendered with plotly.js.

use askama::Template;

use crate::domain::error::ChartError;
use crate::domain::plot_spec::ChartOutcome;
use crate::ports::report_port::ChartReportPort;

#[derive(Template)]
#[template(path = "chart.html")]
struct ChartPage<'a> {
    title: &'a str,
    spec_json: Option<String>,
}

/// Serialize for inline `<script>` use: `</` cannot appear, so rationale
/// text cannot close the script element early.
fn script_safe_json(outcome: &ChartOutcome) -> Result<Option<String>, ChartError> {
    match outcome {
        ChartOutcome::NoData => Ok(None),
        ChartOutcome::Chart(spec) => {
            let json = serde_json::to_string(spec)?;
            Ok(Some(json.replace("</", "<\\/")))
        }
    }
}

pub struct HtmlChartAdapter;

impl HtmlChartAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlChartAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartReportPort for HtmlChartAdapter {
    fn render(&self, outcome: &ChartOutcome) -> Result<String, ChartError> {
        let title = outcome
            .spec()
            .map(|s| s.layout.title.text.as_str())
            .unwrap_or("No data");
        let page = ChartPage {
            title,
            spec_json: script_safe_json(outcome)?,
        };
        page.render().map_err(|e| ChartError::Data {
            reason: format!("template render failed: {e}"),
        })
    }
}
