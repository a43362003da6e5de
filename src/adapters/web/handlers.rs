//! HTTP request handlers for the web adapter.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

use crate::adapters::api_client::Envelope;
use crate::adapters::html_chart_adapter::HtmlChartAdapter;
use crate::domain::chart_builder::build_with_options;
use crate::domain::decision_event::DecisionEvent;
use crate::domain::plot_spec::ChartOutcome;
use crate::domain::price_bar::PriceBar;
use crate::domain::stats::EvalStats;
use crate::ports::report_port::ChartReportPort;

use super::{AppState, WebError};

pub const DEFAULT_OHLCV_LIMIT: usize = 5000;
pub const DEFAULT_EVAL_LIMIT: usize = 2000;

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    pub price_limit: Option<usize>,
    pub event_limit: Option<usize>,
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "tradeplot backend is running." }))
}

pub async fn ohlcv(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Envelope<PriceBar>>, WebError> {
    let limit = query.limit.unwrap_or(DEFAULT_OHLCV_LIMIT);
    let bars = state.data_port.fetch_prices(limit)?;
    Ok(Json(Envelope::new(bars)))
}

pub async fn eval(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Envelope<DecisionEvent>>, WebError> {
    let limit = query.limit.unwrap_or(DEFAULT_EVAL_LIMIT);
    let events = state.data_port.fetch_events(limit)?;
    Ok(Json(Envelope::new(events)))
}

pub async fn eval_stats(State(state): State<Arc<AppState>>) -> Result<Json<EvalStats>, WebError> {
    let events = state.data_port.fetch_events(usize::MAX)?;
    Ok(Json(EvalStats::compute(&events)?))
}

fn build_chart(state: &AppState, query: &ChartQuery) -> Result<ChartOutcome, WebError> {
    let price_limit = query.price_limit.unwrap_or(state.price_limit);
    let event_limit = query.event_limit.unwrap_or(state.event_limit);
    let prices = state.data_port.fetch_prices(price_limit)?;
    let events = state.data_port.fetch_events(event_limit)?;
    debug!(bars = prices.len(), events = events.len(), "building chart");
    Ok(build_with_options(
        &prices,
        &events,
        &state.chart.categories,
        &state.chart.options,
    ))
}

pub async fn chart_json(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartOutcome>, WebError> {
    Ok(Json(build_chart(&state, &query)?))
}

pub async fn chart_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChartQuery>,
) -> Result<Html<String>, WebError> {
    let outcome = build_chart(&state, &query)?;
    let html = HtmlChartAdapter::new()
        .render(&outcome)
        .map_err(|e| WebError::internal(e.to_string()))?;
    Ok(Html(html))
}

pub async fn not_found() -> Response {
    WebError::new(StatusCode::NOT_FOUND, "Not Found").into_response()
}
