//! CLI integration tests.
//!
//! Tests cover:
//! - Settings loaded from INI files on disk
//! - `chart` writing HTML and JSON from CSV data files
//! - `backtest-chart` from a saved series
//! - Exit codes for missing files, bad config and empty data

mod common;

use clap::Parser;
use common::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tempfile::TempDir;
use tradeplot::cli::{self, Cli};
use tradeplot::domain::category::{MarkerShape, Preset};
use tradeplot::domain::error::ChartError;
use tradeplot::domain::settings::load_settings;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn same_code(actual: ExitCode, expected: u8) -> bool {
    format!("{actual:?}") == format!("{:?}", ExitCode::from(expected))
}

fn run(args: &[&str]) -> ExitCode {
    let mut argv = vec!["tradeplot"];
    argv.extend_from_slice(args);
    cli::run(Cli::try_parse_from(argv).unwrap())
}

/// Data files plus a config pointing at them.
struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new(prices: &str, decisions: &str, extra: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let ohlcv = dir.path().join("ohlcv.csv");
        let eval = dir.path().join("decisions.csv");
        fs::write(&ohlcv, prices).unwrap();
        fs::write(&eval, decisions).unwrap();

        let config = dir.path().join("tradeplot.ini");
        fs::write(
            &config,
            format!(
                "[data]\nohlcv_path = {}\neval_path = {}\n{extra}",
                ohlcv.display(),
                eval.display()
            ),
        )
        .unwrap();
        Self { dir, config }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn config(&self) -> &str {
        self.config.to_str().unwrap()
    }
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

mod settings_from_file {
    use super::*;

    const FULL_INI: &str = r#"
[api]
base_url = https://trader.example/api/
price_limit = 500
event_limit = 200

[data]
ohlcv_path = data/ohlcv.csv

[chart]
title = EURUSD 5m
height = 640
equity_split = 0.3
categories = ENTER,SKIP

[category.enter]
marker = triangle-up
color = darkgreen
"#;

    #[test]
    fn full_config_loads() {
        let file = write_temp_ini(FULL_INI);
        let config = cli::load_config(file.path()).unwrap();
        let settings = load_settings(&config, Preset::LlmDecisions).unwrap();

        assert_eq!(settings.api.base_url, "https://trader.example/api");
        assert_eq!(settings.api.price_limit, 500);
        assert_eq!(settings.api.event_limit, 200);
        assert_eq!(settings.data.ohlcv_path.as_deref(), Some("data/ohlcv.csv"));
        assert_eq!(settings.chart.options.title, "EURUSD 5m");
        assert_eq!(settings.chart.options.height, 640);
        assert_eq!(settings.chart.categories.len(), 2);

        let enter = settings.chart.categories.get("ENTER").unwrap();
        assert_eq!(enter.marker, MarkerShape::TriangleUp);
        assert_eq!(enter.color, "darkgreen");
    }

    #[test]
    fn missing_config_file_is_parse_error() {
        let err = cli::load_config(Path::new("/nonexistent/tradeplot.ini")).unwrap_err();
        assert!(matches!(err, ChartError::ConfigParse { .. }));
    }
}

mod chart_command {
    use super::*;

    #[test]
    fn writes_json_chart() {
        let ws = Workspace::new(PRICES_CSV, DECISIONS_CSV, "");
        let out = ws.path("chart.json");
        let code = run(&[
            "chart",
            "--config",
            ws.config(),
            "--format",
            "json",
            "--output",
            out.to_str().unwrap(),
        ]);

        assert!(same_code(code, 0));
        let value = read_json(&out);
        assert_eq!(value["outcome"], "chart");
        assert_eq!(value["data"][0]["type"], "candlestick");
        assert_eq!(value["data"][1]["name"], "ENTER");
        assert_eq!(value["diagnostics"]["events_total"], 3);
    }

    #[test]
    fn writes_html_chart_by_default() {
        let ws = Workspace::new(PRICES_CSV, DECISIONS_CSV, "[chart]\ntitle = Session 42\n");
        let out = ws.path("chart.html");
        let code = run(&["chart", "--config", ws.config(), "--output", out.to_str().unwrap()]);

        assert!(same_code(code, 0));
        let html = fs::read_to_string(out).unwrap();
        assert!(html.contains("<title>Session 42</title>"));
        assert!(html.contains("Plotly.newPlot"));
    }

    #[test]
    fn header_only_prices_write_no_data() {
        let ws = Workspace::new("timestamp,open,high,low,close\n", DECISIONS_CSV, "");
        let out = ws.path("chart.json");
        let code = run(&[
            "chart",
            "--config",
            ws.config(),
            "-f",
            "json",
            "-o",
            out.to_str().unwrap(),
        ]);

        assert!(same_code(code, 0));
        assert_eq!(read_json(&out)["outcome"], "no_data");
    }

    #[test]
    fn missing_data_file_exits_4() {
        let ws = Workspace::new(PRICES_CSV, DECISIONS_CSV, "");
        fs::remove_file(ws.path("ohlcv.csv")).unwrap();
        let out = ws.path("c.html");
        let code = run(&["chart", "--config", ws.config(), "-o", out.to_str().unwrap()]);
        assert!(same_code(code, 4));
    }

    #[test]
    fn invalid_chart_config_exits_2() {
        let ws = Workspace::new(PRICES_CSV, DECISIONS_CSV, "[chart]\nequity_split = 2\n");
        let out = ws.path("c.html");
        let code = run(&["chart", "--config", ws.config(), "-o", out.to_str().unwrap()]);
        assert!(same_code(code, 2));
    }
}

mod other_commands {
    use super::*;

    const SERIES: &str = r#"{"series": [
        {"timestamp": 1, "open": 1.0, "high": 1.2, "low": 0.9, "close": 1.1,
         "events": ["ANCHOR"], "equity": 0.0},
        {"timestamp": 2, "open": 1.1, "high": 1.3, "low": 1.0, "close": 1.25,
         "events": ["TP_HIT", "POSITION_CLOSED"], "equity": 1.5}
    ]}"#;

    #[test]
    fn backtest_chart_from_saved_series() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("series.json");
        let out = dir.path().join("run.json");
        fs::write(&input, SERIES).unwrap();

        let code = run(&[
            "backtest-chart",
            "--input",
            input.to_str().unwrap(),
            "--format",
            "json",
            "--output",
            out.to_str().unwrap(),
        ]);

        assert!(same_code(code, 0));
        let value = read_json(&out);
        assert_eq!(value["layout"]["yaxis2"]["overlaying"], "y");
        assert_eq!(value["diagnostics"]["uncategorized_events"], 0);
        let names: Vec<&str> = value["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "Price",
                "Equity",
                "Anchor Entry",
                "Rung Added",
                "TP Hit",
                "Rung Filled",
                "Position Closed"
            ]
        );
    }

    #[test]
    fn backtest_chart_missing_input_exits_4() {
        let code = run(&["backtest-chart", "--input", "/nonexistent/series.json"]);
        assert!(same_code(code, 4));
    }

    #[test]
    fn stats_on_empty_decisions_exits_5() {
        let ws = Workspace::new(PRICES_CSV, "end_time,action\n", "");
        let code = run(&["stats", "--config", ws.config()]);
        assert!(same_code(code, 5));
    }

    #[test]
    fn stats_succeeds_on_csv_decisions() {
        let ws = Workspace::new(PRICES_CSV, DECISIONS_CSV, "");
        let code = run(&["stats", "--config", ws.config()]);
        assert!(same_code(code, 0));
    }

    #[test]
    fn unreachable_api_exits_3() {
        let ws = Workspace::new(
            PRICES_CSV,
            DECISIONS_CSV,
            "[api]\nbase_url = http://127.0.0.1:9/api\n",
        );
        let out = ws.path("c.html");
        let code = run(&["chart", "--config", ws.config(), "--api", "-o", out.to_str().unwrap()]);
        assert!(same_code(code, 3));
    }
}
