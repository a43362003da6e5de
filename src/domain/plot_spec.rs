//! Renderer-agnostic plot specification.
//!
//! Field names follow the plotly.js trace/layout schema so the serialized
//! form can be handed to a plotly renderer unchanged.

use serde::Serialize;

use crate::domain::category::{HoverInfo, MarkerShape};
use crate::domain::timestamp::Timestamp;

/// Result of a chart build: either a spec or the empty-input sentinel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ChartOutcome {
    NoData,
    Chart(PlotSpec),
}

impl ChartOutcome {
    pub fn is_no_data(&self) -> bool {
        matches!(self, ChartOutcome::NoData)
    }

    pub fn spec(&self) -> Option<&PlotSpec> {
        match self {
            ChartOutcome::Chart(spec) => Some(spec),
            ChartOutcome::NoData => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSpec {
    pub data: Vec<Trace>,
    pub layout: Layout,
    pub diagnostics: Diagnostics,
}

impl PlotSpec {
    pub fn trace_named(&self, name: &str) -> Option<&Trace> {
        self.data.iter().find(|t| t.name() == name)
    }

    pub fn markers_named(&self, name: &str) -> Option<&MarkerTrace> {
        self.data.iter().find_map(|t| match t {
            Trace::Markers(m) if m.name == name => Some(m),
            _ => None,
        })
    }

    pub fn has_secondary_axis(&self) -> bool {
        self.layout.yaxis2.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Trace {
    #[serde(rename = "candlestick")]
    Candlestick(CandlestickTrace),
    #[serde(rename = "scatter")]
    Line(LineTrace),
    #[serde(rename = "scatter")]
    Markers(MarkerTrace),
}

impl Trace {
    pub fn name(&self) -> &str {
        match self {
            Trace::Candlestick(t) => &t.name,
            Trace::Line(t) => &t.name,
            Trace::Markers(t) => &t.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlestickTrace {
    pub name: String,
    pub x: Vec<Timestamp>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineTrace {
    pub name: String,
    pub mode: &'static str,
    pub x: Vec<Timestamp>,
    /// `None` leaves a gap.
    pub y: Vec<Option<f64>>,
    pub yaxis: &'static str,
    pub line: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerTrace {
    pub name: String,
    pub mode: &'static str,
    pub x: Vec<Timestamp>,
    pub y: Vec<f64>,
    pub text: Vec<String>,
    pub hoverinfo: HoverInfo,
    pub marker: Marker,
}

impl MarkerTrace {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub symbol: MarkerShape,
    pub size: f64,
    pub color: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: AxisTitle,
    pub height: u32,
    pub showlegend: bool,
    pub legend: Legend,
    pub xaxis: XAxis,
    pub yaxis: YAxis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis2: Option<OverlayAxis>,
    pub margin: Margin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitle {
    pub text: String,
}

impl AxisTitle {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub orientation: &'static str,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XAxis {
    pub title: AxisTitle,
    pub rangeslider: RangeSlider,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSlider {
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YAxis {
    pub title: AxisTitle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<[f64; 2]>,
}

/// Secondary y-axis drawn over the primary one on the right.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayAxis {
    pub title: AxisTitle,
    pub anchor: &'static str,
    pub overlaying: &'static str,
    pub side: &'static str,
    pub showgrid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Margin {
    pub t: u32,
    pub l: u32,
    pub r: u32,
    pub b: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub events_total: usize,
    /// Events placed on the last bar because no bar is at or after them.
    pub events_after_last_bar: usize,
    /// Events whose category has no style; not plotted.
    pub uncategorized_events: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn no_data_serializes_as_tag() {
        let value = serde_json::to_value(ChartOutcome::NoData).unwrap();
        assert_eq!(value, json!({ "outcome": "no_data" }));
    }

    #[test]
    fn traces_carry_plotly_type() {
        let line = Trace::Line(LineTrace {
            name: "Equity".into(),
            mode: "lines",
            x: vec![Timestamp::Numeric(1.0)],
            y: vec![None],
            yaxis: "y2",
            line: LineStyle { width: 1.5 },
        });
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["type"], "scatter");
        assert_eq!(value["yaxis"], "y2");
        assert_eq!(value["y"], json!([null]));
    }

    #[test]
    fn marker_trace_serializes_symbol_and_hoverinfo() {
        let trace = Trace::Markers(MarkerTrace {
            name: "ENTER".into(),
            mode: "markers",
            x: vec![],
            y: vec![],
            text: vec![],
            hoverinfo: HoverInfo::TEXT_X_Y,
            marker: Marker {
                symbol: MarkerShape::TriangleUp,
                size: 10.0,
                color: "green".into(),
                opacity: 0.7,
            },
        });
        let value = serde_json::to_value(&trace).unwrap();
        assert_eq!(value["hoverinfo"], "text+x+y");
        assert_eq!(value["marker"]["symbol"], "triangle-up");
        assert_eq!(value["x"], json!([]));
    }
}
