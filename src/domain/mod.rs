//! Core domain types and logic.

pub mod timestamp;
pub mod price_bar;
pub mod decision_event;
pub mod category;
pub mod bar_index;
pub mod plot_spec;
pub mod chart_builder;
pub mod candle_state;
pub mod stats;
pub mod settings;
pub mod error;
