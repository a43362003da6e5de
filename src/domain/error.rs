//! Domain error types.

/// Top-level error type for tradeplot.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("data source not found: {path}")]
    SourceMissing { path: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data: {what}")]
    NoData { what: String },

    #[error("http error: {reason}")]
    Http { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ChartError {
    fn from(err: reqwest::Error) -> Self {
        ChartError::Http {
            reason: err.to_string(),
        }
    }
}

impl From<&ChartError> for std::process::ExitCode {
    fn from(err: &ChartError) -> Self {
        let code: u8 = match err {
            ChartError::Io(_) | ChartError::Json(_) => 1,
            ChartError::ConfigParse { .. }
            | ChartError::ConfigMissing { .. }
            | ChartError::ConfigInvalid { .. } => 2,
            ChartError::Http { .. } => 3,
            ChartError::SourceMissing { .. } | ChartError::Data { .. } => 4,
            ChartError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
