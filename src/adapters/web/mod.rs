//! Web server adapter.
//!
//! Serves price bars, decision events, their statistics and the built chart
//! over HTTP, reading everything through a [`ChartDataPort`].

mod error;
mod handlers;

pub use error::{WebError, status_from_error};
pub use handlers::*;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::domain::settings::ChartSettings;
use crate::ports::data_port::ChartDataPort;

pub struct AppState {
    pub data_port: Arc<dyn ChartDataPort + Send + Sync>,
    pub chart: ChartSettings,
    /// Defaults for `/api/chart` and `/chart` when no limit is given.
    pub price_limit: usize,
    pub event_limit: usize,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/api/ohlcv", get(handlers::ohlcv))
        .route("/api/eval", get(handlers::eval))
        .route("/api/eval/stats", get(handlers::eval_stats))
        .route("/api/chart", get(handlers::chart_json))
        .route("/chart", get(handlers::chart_page))
        .fallback(handlers::not_found)
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}
