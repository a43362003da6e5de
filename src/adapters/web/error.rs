//! HTTP error responses for the web adapter.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;

use crate::domain::error::ChartError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

pub fn status_from_error(err: &ChartError) -> StatusCode {
    match err {
        ChartError::SourceMissing { .. } => StatusCode::NOT_FOUND,
        ChartError::NoData { .. }
        | ChartError::ConfigMissing { .. }
        | ChartError::ConfigInvalid { .. }
        | ChartError::ConfigParse { .. } => StatusCode::BAD_REQUEST,
        ChartError::Data { .. }
        | ChartError::Http { .. }
        | ChartError::Json(_)
        | ChartError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<ChartError> for WebError {
    fn from(err: ChartError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(status = self.status.as_u16(), message = %self.message, "request failed");
        }
        (self.status, Json(json!({ "detail": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_source_is_not_found() {
        let err = ChartError::SourceMissing {
            path: "data/eurusd_5m.csv".into(),
        };
        assert_eq!(status_from_error(&err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn no_data_is_bad_request() {
        let err: WebError = ChartError::NoData {
            what: "decision events".into(),
        }
        .into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "no data: decision events");
    }

    #[test]
    fn malformed_rows_are_server_errors() {
        let err = ChartError::Data {
            reason: "row 3: invalid close value".into(),
        };
        assert_eq!(status_from_error(&err), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
