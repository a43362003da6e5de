//! HTTP client for the chart data service and the run-backtest endpoint.

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::candle_state::{BacktestSeries, CandleState};
use crate::domain::decision_event::DecisionEvent;
use crate::domain::error::ChartError;
use crate::domain::price_bar::PriceBar;
use crate::domain::settings::ApiSettings;
use crate::domain::stats::EvalStats;

/// `{ count?, data: [...] }` list envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub data: Vec<T>,
}

impl<T> Envelope<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            count: Some(data.len()),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestRequest {
    pub asset: String,
    pub frequency: String,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub rsi_period: u32,
    pub rsi_oversold_level: u32,
    pub rung_size_in_pips: f64,
    pub tp_target_in_pips: f64,
}

/// Both chart inputs, fetched together.
#[derive(Debug, Clone)]
pub struct ChartInputs {
    pub prices: Vec<PriceBar>,
    pub events: Vec<DecisionEvent>,
}

pub struct ApiClient {
    http: Client,
    settings: ApiSettings,
}

impl ApiClient {
    pub fn new(settings: ApiSettings) -> Self {
        Self {
            http: Client::new(),
            settings,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ChartError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self.http.get(&url).send().await?;
        decode(&url, response).await
    }

    pub async fn fetch_ohlcv(&self, limit: usize) -> Result<Vec<PriceBar>, ChartError> {
        let envelope: Envelope<PriceBar> =
            self.get_json(&format!("ohlcv?limit={limit}")).await?;
        Ok(envelope.data)
    }

    pub async fn fetch_eval(&self, limit: usize) -> Result<Vec<DecisionEvent>, ChartError> {
        let envelope: Envelope<DecisionEvent> =
            self.get_json(&format!("eval?limit={limit}")).await?;
        Ok(envelope.data)
    }

    pub async fn fetch_stats(&self) -> Result<EvalStats, ChartError> {
        self.get_json("eval/stats").await
    }

    /// Fetch prices and events concurrently with the configured limits;
    /// fails if either request fails.
    pub async fn fetch_chart_inputs(&self) -> Result<ChartInputs, ChartError> {
        let (prices, events) = tokio::try_join!(
            self.fetch_ohlcv(self.settings.price_limit),
            self.fetch_eval(self.settings.event_limit),
        )?;
        info!(
            bars = prices.len(),
            events = events.len(),
            "fetched chart inputs"
        );
        Ok(ChartInputs { prices, events })
    }

    pub async fn run_backtest(
        &self,
        request: &BacktestRequest,
    ) -> Result<Vec<CandleState>, ChartError> {
        let url = self.url("backtest/run");
        info!(asset = %request.asset, frequency = %request.frequency, "requesting backtest run");
        let response = self.http.post(&url).json(request).send().await?;
        let body: BacktestSeries = decode(&url, response).await?;
        Ok(body.series)
    }
}

async fn decode<T: DeserializeOwned>(
    url: &str,
    response: reqwest::Response,
) -> Result<T, ChartError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(ChartError::SourceMissing {
            path: url.to_string(),
        });
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ChartError::Http {
            reason: format!("{url} returned {status}: {body}"),
        });
    }
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
