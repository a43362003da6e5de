//! Chart series assembly.
//!
//! Turns a price series plus a sparse event stream into a [`PlotSpec`]:
//! one candlestick trace, an optional equity line on a right-hand axis, and
//! one marker trace per declared event category. Pure and deterministic.

use tracing::debug;

use crate::domain::bar_index::{BarIndex, MatchKind};
use crate::domain::category::CategoryTable;
use crate::domain::decision_event::DecisionEvent;
use crate::domain::plot_spec::{
    AxisTitle, CandlestickTrace, ChartOutcome, Diagnostics, Layout, Legend, LineStyle, LineTrace,
    Margin, Marker, MarkerTrace, OverlayAxis, PlotSpec, RangeSlider, Trace, XAxis, YAxis,
};
use crate::domain::price_bar::PriceBar;
use crate::domain::timestamp::Timestamp;

pub const DEFAULT_TITLE: &str = "Price & Decisions";
pub const DEFAULT_HEIGHT: u32 = 700;
pub const DEFAULT_EQUITY_SPLIT: f64 = 0.25;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub title: String,
    pub height: u32,
    /// Fraction of the plot height below the price axis when an equity
    /// axis is present.
    pub equity_split: f64,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            height: DEFAULT_HEIGHT,
            equity_split: DEFAULT_EQUITY_SPLIT,
        }
    }
}

pub fn build(
    prices: &[PriceBar],
    events: &[DecisionEvent],
    categories: &CategoryTable,
) -> ChartOutcome {
    build_with_options(prices, events, categories, &ChartOptions::default())
}

pub fn build_with_options(
    prices: &[PriceBar],
    events: &[DecisionEvent],
    categories: &CategoryTable,
    options: &ChartOptions,
) -> ChartOutcome {
    if prices.is_empty() {
        debug!(events = events.len(), "no price bars, returning no-data sentinel");
        return ChartOutcome::NoData;
    }

    let x: Vec<Timestamp> = prices.iter().map(|b| b.timestamp.clone()).collect();
    let has_equity = prices.iter().any(PriceBar::has_pnl);

    let mut data = Vec::with_capacity(categories.len() + 2);
    data.push(Trace::Candlestick(candlestick_trace(prices, x.clone())));
    if has_equity {
        data.push(Trace::Line(equity_trace(prices, x)));
    }

    let (markers, diagnostics) = marker_traces(prices, events, categories);
    data.extend(markers.into_iter().map(Trace::Markers));

    debug!(
        bars = prices.len(),
        events = diagnostics.events_total,
        after_last_bar = diagnostics.events_after_last_bar,
        uncategorized = diagnostics.uncategorized_events,
        "assembled plot spec"
    );

    ChartOutcome::Chart(PlotSpec {
        data,
        layout: layout(options, has_equity),
        diagnostics,
    })
}

fn candlestick_trace(prices: &[PriceBar], x: Vec<Timestamp>) -> CandlestickTrace {
    CandlestickTrace {
        name: "Price".to_string(),
        x,
        open: prices.iter().map(|b| b.open).collect(),
        high: prices.iter().map(|b| b.high).collect(),
        low: prices.iter().map(|b| b.low).collect(),
        close: prices.iter().map(|b| b.close).collect(),
    }
}

fn equity_trace(prices: &[PriceBar], x: Vec<Timestamp>) -> LineTrace {
    LineTrace {
        name: "Equity".to_string(),
        mode: "lines",
        x,
        y: prices.iter().map(PriceBar::running_pnl).collect(),
        yaxis: "y2",
        line: LineStyle { width: 1.5 },
    }
}

fn marker_traces(
    prices: &[PriceBar],
    events: &[DecisionEvent],
    categories: &CategoryTable,
) -> (Vec<MarkerTrace>, Diagnostics) {
    let mut traces: Vec<MarkerTrace> = categories
        .iter()
        .map(|style| MarkerTrace {
            name: style.display_name().to_string(),
            mode: "markers",
            x: Vec::new(),
            y: Vec::new(),
            text: Vec::new(),
            hoverinfo: style.hover,
            marker: Marker {
                symbol: style.marker,
                size: style.size,
                color: style.color.clone(),
                opacity: style.opacity,
            },
        })
        .collect();

    let index = BarIndex::new(prices);
    let mut diagnostics = Diagnostics {
        events_total: events.len(),
        ..Diagnostics::default()
    };

    for event in events {
        let Some(slot) = categories.position(&event.category) else {
            diagnostics.uncategorized_events += 1;
            continue;
        };
        let Some(matched) = index.match_forward(&event.timestamp.sort_key()) else {
            continue;
        };
        if matched.kind == MatchKind::Fallback {
            diagnostics.events_after_last_bar += 1;
        }

        let trace = &mut traces[slot];
        trace.x.push(event.timestamp.clone());
        trace.y.push(prices[matched.index].close);
        trace.text.push(event.hover_text());
    }

    (traces, diagnostics)
}

fn layout(options: &ChartOptions, has_equity: bool) -> Layout {
    let (domain, yaxis2, right_margin) = if has_equity {
        let overlay = OverlayAxis {
            title: AxisTitle::new("Equity"),
            anchor: "x",
            overlaying: "y",
            side: "right",
            showgrid: false,
        };
        (Some([options.equity_split, 1.0]), Some(overlay), 60)
    } else {
        (None, None, 20)
    };

    Layout {
        title: AxisTitle::new(options.title.clone()),
        height: options.height,
        showlegend: true,
        legend: Legend {
            orientation: "h",
            x: 0.0,
            y: 1.1,
        },
        xaxis: XAxis {
            title: AxisTitle::new("Time"),
            rangeslider: RangeSlider { visible: false },
        },
        yaxis: YAxis {
            title: AxisTitle::new("Price"),
            domain,
        },
        yaxis2,
        margin: Margin {
            t: 60,
            l: 60,
            r: right_margin,
            b: 40,
        },
    }
}
