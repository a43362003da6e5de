//! Concrete adapter implementations for ports.

pub mod api_client;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod html_chart_adapter;
pub mod json_chart_adapter;
#[cfg(feature = "web")]
pub mod web;
