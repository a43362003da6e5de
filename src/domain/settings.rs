//! Chart, data-source and server settings read from configuration.
//!
//! Every value has a default; present values are validated before use.

use crate::domain::category::{CategoryStyle, CategoryTable, HoverInfo, MarkerShape, Preset};
use crate::domain::chart_builder::{
    ChartOptions, DEFAULT_EQUITY_SPLIT, DEFAULT_HEIGHT, DEFAULT_TITLE,
};
use crate::domain::error::ChartError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_PRICE_LIMIT: usize = 30_000;
pub const DEFAULT_EVENT_LIMIT: usize = 20_000;
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq)]
pub struct ApiSettings {
    pub base_url: String,
    pub price_limit: usize,
    pub event_limit: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataSettings {
    pub ohlcv_path: Option<String>,
    pub eval_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSettings {
    pub options: ChartOptions,
    pub categories: CategoryTable,
}

/// Everything a command needs, loaded and validated in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api: ApiSettings,
    pub data: DataSettings,
    pub listen: String,
    pub chart: ChartSettings,
}

pub fn load_settings(
    config: &dyn ConfigPort,
    default_preset: Preset,
) -> Result<Settings, ChartError> {
    Ok(Settings {
        api: load_api_settings(config)?,
        data: load_data_settings(config),
        listen: listen_address(config),
        chart: load_chart_settings(config, default_preset)?,
    })
}

pub fn load_api_settings(config: &dyn ConfigPort) -> Result<ApiSettings, ChartError> {
    let base_url = config
        .get_string("api", "base_url")
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(invalid("api", "base_url", "must start with http:// or https://"));
    }

    Ok(ApiSettings {
        base_url: base_url.trim_end_matches('/').to_string(),
        price_limit: positive_limit(config, "api", "price_limit", DEFAULT_PRICE_LIMIT)?,
        event_limit: positive_limit(config, "api", "event_limit", DEFAULT_EVENT_LIMIT)?,
    })
}

pub fn load_data_settings(config: &dyn ConfigPort) -> DataSettings {
    DataSettings {
        ohlcv_path: config.get_string("data", "ohlcv_path"),
        eval_path: config.get_string("data", "eval_path"),
    }
}

pub fn listen_address(config: &dyn ConfigPort) -> String {
    config
        .get_string("web", "listen")
        .unwrap_or_else(|| DEFAULT_LISTEN.to_string())
}

/// `default_preset` applies when `[chart] preset` is not set.
pub fn load_chart_settings(
    config: &dyn ConfigPort,
    default_preset: Preset,
) -> Result<ChartSettings, ChartError> {
    let title = config
        .get_string("chart", "title")
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let height = int_or(config, "chart", "height", i64::from(DEFAULT_HEIGHT))?;
    let height = u32::try_from(height)
        .ok()
        .filter(|h| *h > 0)
        .ok_or_else(|| invalid("chart", "height", "height must be a positive integer"))?;

    let equity_split = double_or(config, "chart", "equity_split", DEFAULT_EQUITY_SPLIT)?;
    if !(equity_split > 0.0 && equity_split < 1.0) {
        return Err(invalid(
            "chart",
            "equity_split",
            "equity_split must be between 0 and 1 (exclusive)",
        ));
    }

    Ok(ChartSettings {
        options: ChartOptions {
            title,
            height,
            equity_split,
        },
        categories: load_categories(config, default_preset)?,
    })
}

/// Start from the preset; a `categories` list replaces the table with the
/// named categories in that order, each styled by its `[category.<name>]`
/// section over the preset style.
pub fn load_categories(
    config: &dyn ConfigPort,
    default_preset: Preset,
) -> Result<CategoryTable, ChartError> {
    let preset = match config.get_string("chart", "preset") {
        Some(name) => name
            .parse::<Preset>()
            .map_err(|reason| invalid("chart", "preset", &reason))?,
        None => default_preset,
    };
    let base = CategoryTable::from_preset(preset);

    let Some(list) = config.get_string("chart", "categories") else {
        return Ok(base);
    };

    let mut table = CategoryTable::new();
    for name in list.split(',').map(str::trim) {
        if name.is_empty() {
            return Err(invalid("chart", "categories", "empty category name in list"));
        }
        if table.get(name).is_some() {
            return Err(invalid(
                "chart",
                "categories",
                &format!("duplicate category {name}"),
            ));
        }
        let start = base
            .get(name)
            .cloned()
            .unwrap_or_else(|| CategoryStyle::new(name, MarkerShape::Circle, "gray"));
        table.upsert(apply_section(config, start)?);
    }
    Ok(table)
}

fn apply_section(
    config: &dyn ConfigPort,
    mut style: CategoryStyle,
) -> Result<CategoryStyle, ChartError> {
    let section = format!("category.{}", style.name.to_lowercase());

    if let Some(marker) = config.get_string(&section, "marker") {
        style.marker = marker
            .parse::<MarkerShape>()
            .map_err(|reason| invalid(&section, "marker", &reason))?;
    }
    if let Some(color) = config.get_string(&section, "color") {
        if color.trim().is_empty() {
            return Err(invalid(&section, "color", "color must not be empty"));
        }
        style.color = color.trim().to_string();
    }
    if let Some(hover) = config.get_string(&section, "hover") {
        style.hover = hover
            .parse::<HoverInfo>()
            .map_err(|reason| invalid(&section, "hover", &reason))?;
    }
    if let Some(label) = config.get_string(&section, "label") {
        style.label = Some(label);
    }

    style.size = double_or(config, &section, "size", style.size)?;
    if style.size <= 0.0 {
        return Err(invalid(&section, "size", "size must be positive"));
    }
    style.opacity = double_or(config, &section, "opacity", style.opacity)?;
    if !(0.0..=1.0).contains(&style.opacity) {
        return Err(invalid(&section, "opacity", "opacity must be between 0 and 1"));
    }

    Ok(style)
}

fn positive_limit(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, ChartError> {
    let value = int_or(config, section, key, default as i64)?;
    usize::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| invalid(section, key, &format!("{key} must be positive")))
}

fn int_or(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, ChartError> {
    config
        .get_int(section, key)
        .map(|v| v.unwrap_or(default))
        .map_err(|reason| invalid(section, key, &reason))
}

fn double_or(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, ChartError> {
    config
        .get_double(section, key)
        .map(|v| v.unwrap_or(default))
        .map_err(|reason| invalid(section, key, &reason))
}

fn invalid(section: &str, key: &str, reason: &str) -> ChartError {
    ChartError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
