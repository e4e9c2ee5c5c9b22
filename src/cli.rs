//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::file_export_adapter::FileExportAdapter;
use crate::adapters::json_file_adapter::JsonFileAdapter;
use crate::adapters::text_table::{
    render_performance_page, render_portfolio, render_rebound_page, render_stats,
};
use crate::browse::Session;
use crate::domain::config_validation::{require_source, validate_config};
use crate::domain::dashboard::Dashboard;
use crate::domain::error::PicksError;
use crate::domain::export::{numeric_metrics, performance_columns, rebound_columns};
use crate::domain::portfolio::{DEFAULT_HORIZONS, DEFAULT_NOTIONAL};
use crate::domain::row::{DatasetKind, PerfMetric, PerformanceRow, ReboundRow, Row};
use crate::domain::sort::{SortDirection, SortKey};
use crate::domain::statistics::compute_stats;
use crate::domain::view::DatasetView;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(
    name = "sctr-picks",
    about = "Browse, summarise and export the SCTR momentum and rebound picks"
)]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Dashboard API base URL (overrides [source] api_url)
    #[arg(long)]
    pub api_url: Option<String>,
    /// Saved dashboard JSON payload (overrides [source] file)
    #[arg(long)]
    pub source_file: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

/// Search and sort options shared by `show` and `export`.
#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// perf | rebound
    pub dataset: String,
    #[arg(short, long)]
    pub query: Option<String>,
    #[arg(short, long)]
    pub sort: Option<String>,
    /// asc | desc (defaults to the column's first-click direction)
    #[arg(short, long)]
    pub direction: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print one page of a dataset
    Show {
        #[command(flatten)]
        view: ViewArgs,
        /// 1-based page number; clamped to the last page
        #[arg(short, long)]
        page: Option<usize>,
    },
    /// Column mean and standard deviation over the whole dataset
    Stats { dataset: String },
    /// Equal-allocation portfolio summary over performance returns
    Portfolio {
        /// Comma separated horizons, e.g. perf20d,perf60d
        #[arg(long)]
        horizon: Option<String>,
        #[arg(long)]
        notional: Option<f64>,
    },
    /// Write the filtered, sorted dataset as CSV
    Export {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Interactive line session over both datasets
    Browse,
    /// Validate a configuration file
    CheckConfig {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    if let Command::CheckConfig { config } = &cli.command {
        return run_check_config(config);
    }

    let adapter = match load_config(
        cli.config.as_ref(),
        cli.api_url.as_deref(),
        cli.source_file.as_ref(),
    ) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let result = match cli.command {
        Command::Show { view, page } => run_show(&adapter, &view, page),
        Command::Stats { dataset } => run_stats(&adapter, &dataset),
        Command::Portfolio { horizon, notional } => {
            run_portfolio(&adapter, horizon.as_deref(), notional)
        }
        Command::Export { view, output_dir } => run_export(&adapter, &view, output_dir),
        Command::Browse => run_browse(&adapter),
        Command::CheckConfig { .. } => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Reads the config file (if any), applies flag overrides and validates.
pub fn load_config(
    path: Option<&PathBuf>,
    api_url: Option<&str>,
    source_file: Option<&PathBuf>,
) -> Result<FileConfigAdapter, ExitCode> {
    let mut adapter = match path {
        Some(path) => FileConfigAdapter::from_file(path).map_err(|e| {
            let err = PicksError::ConfigParse {
                file: path.display().to_string(),
                reason: e.to_string(),
            };
            eprintln!("error: {err}");
            ExitCode::from(&err)
        })?,
        None => FileConfigAdapter::empty(),
    };

    if let Some(url) = api_url {
        adapter.set("source", "api_url", url);
        adapter.remove("source", "file");
    }
    if let Some(file) = source_file {
        adapter.set("source", "file", &file.display().to_string());
    }

    if let Err(e) = validate_config(&adapter) {
        eprintln!("error: {e}");
        return Err((&e).into());
    }
    Ok(adapter)
}

/// A saved payload file wins over the API URL.
pub fn build_source(config: &dyn ConfigPort) -> Result<Box<dyn DataPort>, PicksError> {
    require_source(config)?;
    if let Some(file) = config
        .get_string("source", "file")
        .filter(|f| !f.trim().is_empty())
    {
        tracing::debug!(file = %file, "using saved payload");
        return Ok(Box::new(JsonFileAdapter::new(PathBuf::from(file.trim()))));
    }

    #[cfg(feature = "http")]
    {
        use crate::adapters::http_adapter::HttpAdapter;
        let adapter = HttpAdapter::from_config(config)?;
        tracing::debug!(endpoint = adapter.endpoint(), "using dashboard API");
        Ok(Box::new(adapter))
    }

    #[cfg(not(feature = "http"))]
    {
        Err(PicksError::ConfigInvalid {
            section: "source".into(),
            key: "api_url".into(),
            reason: "built without the http feature; set [source] file instead".into(),
        })
    }
}

fn parse_dataset(value: &str) -> Result<DatasetKind, PicksError> {
    value.parse()
}

/// Fetches one dataset into `dashboard`, surfacing the error to the caller.
fn load_dataset(
    dashboard: &mut Dashboard,
    dataset: DatasetKind,
    source: &dyn DataPort,
) -> Result<(), PicksError> {
    let ticket = dashboard.begin_refresh(dataset);
    match dataset {
        DatasetKind::Performance => {
            let snapshot = source.fetch_performance()?;
            dashboard.apply_performance(ticket, Ok(snapshot));
        }
        DatasetKind::Rebound => {
            let rows = source.fetch_rebound()?;
            dashboard.apply_rebound(ticket, Ok(rows));
        }
    }
    Ok(())
}

/// Applies `--query`, `--sort` and `--direction` to a view.
pub fn apply_view_args<R, K>(
    view: &mut DatasetView<R, K>,
    args: &ViewArgs,
) -> Result<(), PicksError>
where
    R: Row,
    K: SortKey<R> + std::str::FromStr<Err = PicksError>,
{
    if let Some(query) = &args.query {
        view.set_query(query);
    }
    let direction = args
        .direction
        .as_deref()
        .map(str::parse::<SortDirection>)
        .transpose()?;
    match (&args.sort, direction) {
        (Some(key), dir) => {
            let key: K = key.parse()?;
            view.set_sort(key, dir.unwrap_or_else(|| key.initial_direction()));
        }
        (None, Some(dir)) => match view.state().sort_key {
            Some(current) => view.set_sort(current, dir),
            None => {
                return Err(PicksError::InvalidArgument {
                    name: "direction".into(),
                    value: format!("{dir} (no sort column selected)"),
                });
            }
        },
        (None, None) => {}
    }
    Ok(())
}

fn run_show(
    config: &dyn ConfigPort,
    args: &ViewArgs,
    page: Option<usize>,
) -> Result<(), PicksError> {
    let dataset = parse_dataset(&args.dataset)?;
    let page_index = match page {
        Some(0) => {
            return Err(PicksError::InvalidArgument {
                name: "page".into(),
                value: "0".into(),
            });
        }
        Some(n) => n - 1,
        None => 0,
    };
    let source = build_source(config)?;
    let mut dashboard = Dashboard::new();
    load_dataset(&mut dashboard, dataset, source.as_ref())?;

    match dataset {
        DatasetKind::Performance => {
            let view = dashboard.performance.view_mut();
            apply_view_args(view, args)?;
            view.go_to_page(page_index);
            let view = dashboard.performance.view();
            print!(
                "{}",
                render_performance_page(&view.derive(), view.state().sort(), dashboard.reference())
            );
            let notional = config.get_double("portfolio", "notional", DEFAULT_NOTIONAL);
            println!();
            print!(
                "{}",
                render_portfolio(&dashboard.portfolio(&DEFAULT_HORIZONS, notional), notional)
            );
        }
        DatasetKind::Rebound => {
            let view = dashboard.rebound.view_mut();
            apply_view_args(view, args)?;
            view.go_to_page(page_index);
            let view = dashboard.rebound.view();
            print!("{}", render_rebound_page(&view.derive(), view.state().sort()));
        }
    }
    Ok(())
}

fn run_stats(config: &dyn ConfigPort, dataset: &str) -> Result<(), PicksError> {
    let dataset = parse_dataset(dataset)?;
    let source = build_source(config)?;
    let mut dashboard = Dashboard::new();
    load_dataset(&mut dashboard, dataset, source.as_ref())?;

    let text = match dataset {
        DatasetKind::Performance => {
            let metrics = numeric_metrics(&performance_columns());
            let stats = compute_stats(dashboard.performance.view().rows(), &metrics);
            render_stats::<PerformanceRow, _>(&stats)
        }
        DatasetKind::Rebound => {
            let metrics = numeric_metrics(&rebound_columns());
            let stats = compute_stats(dashboard.rebound.view().rows(), &metrics);
            render_stats::<ReboundRow, _>(&stats)
        }
    };
    print!("{text}");
    Ok(())
}

/// `perf20d,perf60d` or `20D,60D`; RSI is not a return.
pub fn parse_horizons(value: &str) -> Result<Vec<PerfMetric>, PicksError> {
    let mut horizons = Vec::new();
    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let metric: PerfMetric = part.parse()?;
        if !PerfMetric::RETURNS.contains(&metric) {
            return Err(PicksError::InvalidArgument {
                name: "horizon".into(),
                value: part.into(),
            });
        }
        horizons.push(metric);
    }
    if horizons.is_empty() {
        return Err(PicksError::InvalidArgument {
            name: "horizon".into(),
            value: value.into(),
        });
    }
    Ok(horizons)
}

fn run_portfolio(
    config: &dyn ConfigPort,
    horizon: Option<&str>,
    notional: Option<f64>,
) -> Result<(), PicksError> {
    let horizons = match horizon {
        Some(h) => parse_horizons(h)?,
        None => DEFAULT_HORIZONS.to_vec(),
    };
    let notional =
        notional.unwrap_or_else(|| config.get_double("portfolio", "notional", DEFAULT_NOTIONAL));
    if !notional.is_finite() || notional <= 0.0 {
        return Err(PicksError::InvalidArgument {
            name: "notional".into(),
            value: notional.to_string(),
        });
    }

    let source = build_source(config)?;
    let mut dashboard = Dashboard::new();
    load_dataset(&mut dashboard, DatasetKind::Performance, source.as_ref())?;
    print!(
        "{}",
        render_portfolio(&dashboard.portfolio(&horizons, notional), notional)
    );
    Ok(())
}

fn run_export(
    config: &dyn ConfigPort,
    args: &ViewArgs,
    output_dir: Option<PathBuf>,
) -> Result<(), PicksError> {
    let dataset = parse_dataset(&args.dataset)?;
    let source = build_source(config)?;
    let exporter = match output_dir {
        Some(dir) => FileExportAdapter::new(dir),
        None => FileExportAdapter::from_config(config),
    };

    let mut dashboard = Dashboard::new();
    load_dataset(&mut dashboard, dataset, source.as_ref())?;
    match dataset {
        DatasetKind::Performance => apply_view_args(dashboard.performance.view_mut(), args)?,
        DatasetKind::Rebound => apply_view_args(dashboard.rebound.view_mut(), args)?,
    }

    let today = chrono::Local::now().date_naive();
    let path = dashboard.export(dataset, &exporter, today)?;
    eprintln!("Exported {} to {}", dataset, path.display());
    Ok(())
}

fn run_browse(config: &dyn ConfigPort) -> Result<(), PicksError> {
    let source = build_source(config)?;
    let exporter = FileExportAdapter::from_config(config);
    let notional = config.get_double("portfolio", "notional", DEFAULT_NOTIONAL);
    let mut session = Session::new(source.as_ref(), &exporter, notional);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    session.run(stdin.lock(), &mut stdout)?;
    Ok(())
}

fn run_check_config(path: &PathBuf) -> ExitCode {
    let adapter = match load_config(Some(path), None, None) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = require_source(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Configuration OK: {}", path.display());
    ExitCode::SUCCESS
}
