//! CLI definition and dispatch.

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::adapters::api_client::{ApiClient, BacktestRequest, ChartInputs};
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_chart_adapter::HtmlChartAdapter;
use crate::adapters::json_chart_adapter::JsonChartAdapter;
use crate::domain::candle_state::{BacktestSeries, series_to_inputs};
use crate::domain::category::{CategoryTable, Preset};
use crate::domain::chart_builder::{ChartOptions, build_with_options};
use crate::domain::error::ChartError;
use crate::domain::plot_spec::ChartOutcome;
use crate::domain::settings::{ChartSettings, Settings, load_chart_settings, load_settings};
use crate::domain::stats::EvalStats;
use crate::ports::data_port::ChartDataPort;
use crate::ports::report_port::ChartReportPort;

#[derive(Parser, Debug)]
#[command(name = "tradeplot", about = "Candlestick charts annotated with trading decisions")]
pub struct Cli {
    /// Debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Html,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Chart prices and decisions from data files or the HTTP API
    Chart {
        #[arg(short, long)]
        config: PathBuf,
        /// Fetch from [api] base_url instead of the [data] files
        #[arg(long)]
        api: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },
    /// Chart a saved strategy-run series
    BacktestChart {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },
    /// Run a backtest on the server and chart the returned series
    RunBacktest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        asset: String,
        #[arg(long)]
        frequency: String,
        #[arg(long, value_parser = parse_date_arg)]
        from: DateTime<Utc>,
        #[arg(long, value_parser = parse_date_arg)]
        to: DateTime<Utc>,
        #[arg(long, default_value_t = 7)]
        rsi_period: u32,
        #[arg(long, default_value_t = 30)]
        rsi_oversold_level: u32,
        #[arg(long, default_value_t = 2.0)]
        rung_size_in_pips: f64,
        #[arg(long, default_value_t = 2.0)]
        tp_target_in_pips: f64,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },
    /// Print decision statistics as JSON
    Stats {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        api: bool,
    },
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Chart {
            config,
            api,
            output,
            format,
        } => run_chart(&config, api, output.as_deref(), format),
        Command::BacktestChart {
            input,
            config,
            output,
            format,
        } => run_backtest_chart(&input, config.as_deref(), output.as_deref(), format),
        Command::RunBacktest {
            config,
            asset,
            frequency,
            from,
            to,
            rsi_period,
            rsi_oversold_level,
            rung_size_in_pips,
            tp_target_in_pips,
            output,
            format,
        } => {
            let request = BacktestRequest {
                asset,
                frequency,
                date_from: from,
                date_to: to,
                rsi_period,
                rsi_oversold_level,
                rung_size_in_pips,
                tp_target_in_pips,
            };
            run_remote_backtest(&config, &request, output.as_deref(), format)
        }
        Command::Stats { config, api } => run_stats(&config, api),
        Command::Serve { config } => run_serve(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::from(&err)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    // A subscriber may already be installed when `run` is called from tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Accepts RFC 3339 or a plain `YYYY-MM-DD` date (midnight UTC).
pub fn parse_date_arg(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("invalid date '{raw}', expected YYYY-MM-DD or RFC 3339"))
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ChartError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

fn runtime() -> Result<tokio::runtime::Runtime, ChartError> {
    Ok(tokio::runtime::Runtime::new()?)
}

pub fn csv_adapter(settings: &Settings) -> CsvAdapter {
    CsvAdapter::new(
        settings.data.ohlcv_path.as_ref().map(PathBuf::from),
        settings.data.eval_path.as_ref().map(PathBuf::from),
    )
}

fn report_adapter(format: Format) -> Box<dyn ChartReportPort> {
    match format {
        Format::Html => Box::new(HtmlChartAdapter::new()),
        Format::Json => Box::new(JsonChartAdapter::new()),
    }
}

/// Write to `output`, or to stdout when no path is given.
pub fn emit(
    outcome: &ChartOutcome,
    output: Option<&Path>,
    format: Format,
) -> Result<(), ChartError> {
    let report = report_adapter(format);
    match output {
        Some(path) => {
            report.write(outcome, path)?;
            info!(path = %path.display(), ?format, "chart written");
        }
        None => {
            let content = report.render(outcome)?;
            std::io::stdout().write_all(content.as_bytes())?;
        }
    }
    Ok(())
}

fn chart_from(inputs: &ChartInputs, chart: &ChartSettings) -> ChartOutcome {
    let outcome = build_with_options(
        &inputs.prices,
        &inputs.events,
        &chart.categories,
        &chart.options,
    );
    match outcome.spec() {
        Some(spec) => {
            let d = spec.diagnostics;
            info!(
                traces = spec.data.len(),
                events = d.events_total,
                "chart built"
            );
            if d.events_after_last_bar > 0 {
                warn!(
                    count = d.events_after_last_bar,
                    "events after the last bar were placed on the last bar"
                );
            }
            if d.uncategorized_events > 0 {
                warn!(
                    count = d.uncategorized_events,
                    "events with unconfigured categories were not plotted"
                );
            }
        }
        None => warn!("no price data, chart is empty"),
    }
    outcome
}

pub fn fetch_local_inputs(
    port: &dyn ChartDataPort,
    price_limit: usize,
    event_limit: usize,
) -> Result<ChartInputs, ChartError> {
    Ok(ChartInputs {
        prices: port.fetch_prices(price_limit)?,
        events: port.fetch_events(event_limit)?,
    })
}

fn run_chart(
    config_path: &Path,
    api: bool,
    output: Option<&Path>,
    format: Format,
) -> Result<(), ChartError> {
    let config = load_config(config_path)?;
    let settings = load_settings(&config, Preset::LlmDecisions)?;

    let inputs = if api {
        let client = ApiClient::new(settings.api.clone());
        runtime()?.block_on(client.fetch_chart_inputs())?
    } else {
        fetch_local_inputs(
            &csv_adapter(&settings),
            settings.api.price_limit,
            settings.api.event_limit,
        )?
    };

    emit(&chart_from(&inputs, &settings.chart), output, format)
}

fn backtest_chart_settings(config_path: Option<&Path>) -> Result<ChartSettings, ChartError> {
    match config_path {
        Some(path) => load_chart_settings(&load_config(path)?, Preset::RsiLowrider),
        None => Ok(ChartSettings {
            options: ChartOptions::default(),
            categories: CategoryTable::rsi_lowrider(),
        }),
    }
}

fn run_backtest_chart(
    input: &Path,
    config_path: Option<&Path>,
    output: Option<&Path>,
    format: Format,
) -> Result<(), ChartError> {
    let chart = backtest_chart_settings(config_path)?;
    if !input.exists() {
        return Err(ChartError::SourceMissing {
            path: input.display().to_string(),
        });
    }
    let content = fs::read_to_string(input)?;
    let body: BacktestSeries = serde_json::from_str(&content)?;
    info!(candles = body.series.len(), "loaded backtest series");

    let (prices, events) = series_to_inputs(&body.series);
    emit(&chart_from(&ChartInputs { prices, events }, &chart), output, format)
}

fn run_remote_backtest(
    config_path: &Path,
    request: &BacktestRequest,
    output: Option<&Path>,
    format: Format,
) -> Result<(), ChartError> {
    if request.date_from >= request.date_to {
        return Err(ChartError::Data {
            reason: "--from must be before --to".into(),
        });
    }
    let config = load_config(config_path)?;
    let settings = load_settings(&config, Preset::RsiLowrider)?;
    let client = ApiClient::new(settings.api.clone());

    let series = runtime()?.block_on(client.run_backtest(request))?;
    info!(candles = series.len(), "backtest finished");

    let (prices, events) = series_to_inputs(&series);
    emit(&chart_from(&ChartInputs { prices, events }, &settings.chart), output, format)
}

fn run_stats(config_path: &Path, api: bool) -> Result<(), ChartError> {
    let config = load_config(config_path)?;
    let settings = load_settings(&config, Preset::LlmDecisions)?;

    let stats = if api {
        let client = ApiClient::new(settings.api.clone());
        runtime()?.block_on(client.fetch_stats())?
    } else {
        let events = csv_adapter(&settings).fetch_events(usize::MAX)?;
        EvalStats::compute(&events)?
    };

    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn run_serve(config_path: &Path) -> Result<(), ChartError> {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{AppState, build_router};
        use std::net::SocketAddr;
        use std::sync::Arc;

        let config = load_config(config_path)?;
        let settings = load_settings(&config, Preset::LlmDecisions)?;

        let addr: SocketAddr = settings
            .listen
            .parse()
            .map_err(|e| ChartError::ConfigInvalid {
                section: "web".into(),
                key: "listen".into(),
                reason: format!("{e}"),
            })?;

        let state = AppState {
            data_port: Arc::new(csv_adapter(&settings)),
            chart: settings.chart.clone(),
            price_limit: settings.api.price_limit,
            event_limit: settings.api.event_limit,
        };
        let router = build_router(state);

        runtime()?.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!(%addr, "web server listening");
            axum::serve(listener, router).await?;
            Ok::<(), ChartError>(())
        })
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        Err(ChartError::ConfigInvalid {
            section: "web".into(),
            key: "listen".into(),
            reason: "built without the web feature".into(),
        })
    }
}
