//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::chart_svg::{self, ChartOptions, DatedSeries};
use crate::adapters::csv_adapter::{read_dated_column, CsvPriceAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_content::{load_content, save_content};
use crate::adapters::pdf_report::PdfReportAdapter;
use crate::domain::config_validation::{
    parse_date, validate_finance_config, validate_report_config, validate_report_period,
};
use crate::domain::content::Content;
use crate::domain::error::BuffetError;
use crate::domain::report_table::ReportTable;
use crate::domain::settings::{FinanceConfig, ReportConfig, DEFAULT_REPORT_OUTPUT};
use crate::domain::universe::{load_universe, parse_symbols};
use crate::domain::weekly;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PriceHistoryPort;
use crate::ports::report_port::ReportPort;

pub const CHANGES_JSON: &str = "weekly_changes.json";
pub const PRICES_JSON: &str = "weekly_prices.json";
pub const RECESSIONS_FILE: &str = "recessions.csv";

#[derive(Parser, Debug)]
#[command(name = "buffet", about = "Weekly asset return reports and macro data tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Aggregate daily prices into weekly tables and render the PDF report
    Weekly {
        #[arg(short, long)]
        config: PathBuf,
        /// Fetch missing price histories before aggregating
        #[arg(long)]
        download: bool,
        /// Also write both contents as JSON into this directory
        #[arg(long)]
        json_dir: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        symbols: Option<String>,
    },
    /// Render content JSON files into a PDF report
    Render {
        #[arg(short, long)]
        output: PathBuf,
        /// Add a trailing Total column to every table
        #[arg(long)]
        totals: bool,
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Cache daily price histories under the data root
    Download {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbols: Option<String>,
    },
    /// Download a macro series CSV and summarise it
    FetchSeries {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        url: String,
        #[arg(long)]
        file: String,
        /// Date column first, then data columns
        #[arg(long, value_delimiter = ',', required = true)]
        columns: Vec<String>,
    },
    /// Plot two series on independent y axes as SVG
    Chart {
        #[arg(short, long)]
        config: PathBuf,
        /// FILE:COLUMN, relative to the data root
        #[arg(long)]
        left: String,
        /// FILE:COLUMN, relative to the data root
        #[arg(long)]
        right: String,
        #[arg(long, default_value = "observation_date")]
        date_column: String,
        #[arg(long)]
        left_label: Option<String>,
        #[arg(long)]
        right_label: Option<String>,
        /// Tab-delimited recession table; defaults to recessions.csv in the data root
        #[arg(long)]
        recessions: Option<PathBuf>,
        #[arg(long)]
        title: String,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Validate a report configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Weekly {
            config,
            download,
            json_dir,
            output,
            symbols,
        } => run_weekly(
            &config,
            download,
            json_dir.as_deref(),
            output.as_deref(),
            symbols.as_deref(),
        ),
        Command::Render {
            output,
            totals,
            inputs,
        } => run_render(&output, totals, &inputs),
        Command::Download { config, symbols } => run_download(&config, symbols.as_deref()),
        Command::FetchSeries {
            config,
            url,
            file,
            columns,
        } => run_fetch_series(&config, &url, &file, &columns),
        Command::Chart {
            config,
            left,
            right,
            date_column,
            left_label,
            right_label,
            recessions,
            title,
            output,
        } => run_chart(
            &config,
            ChartArgs {
                left: &left,
                right: &right,
                date_column: &date_column,
                left_label: left_label.as_deref(),
                right_label: right_label.as_deref(),
                recessions: recessions.as_deref(),
                title: &title,
                output: &output,
            },
        ),
        Command::Validate { config } => run_validate(&config),
    }
}

fn fail(err: &BuffetError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = BuffetError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        fail(&err)
    })
}

pub fn build_finance_config(config: &dyn ConfigPort) -> Result<FinanceConfig, BuffetError> {
    validate_finance_config(config)?;
    let root = config
        .get_string("data", "finance_data")
        .unwrap_or_default();
    Ok(FinanceConfig::new(root.trim()))
}

/// Descriptions are looked up per symbol; a symbol without one gets an empty
/// description. With an override, `[report] symbols` is neither required nor
/// checked.
pub fn build_report_config(
    config: &dyn ConfigPort,
    symbols_override: Option<&str>,
) -> Result<ReportConfig, BuffetError> {
    match symbols_override {
        Some(_) => validate_report_period(config)?,
        None => validate_report_config(config)?,
    }

    let symbols = resolve_symbols(symbols_override, config)?;
    let descriptions: HashMap<String, String> = symbols
        .iter()
        .filter_map(|s| {
            config
                .get_string("descriptions", s)
                .map(|d| (s.clone(), d.trim().to_string()))
        })
        .collect();

    let start_date = parse_date(config.get_string("report", "start_date").as_deref(), "start_date")?;
    let end_date = parse_date(config.get_string("report", "end_date").as_deref(), "end_date")?;

    let output = config
        .get_string("report", "output")
        .filter(|s| !s.trim().is_empty())
        .map(|s| PathBuf::from(s.trim()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_OUTPUT));

    Ok(ReportConfig {
        symbols,
        descriptions,
        start_date,
        end_date,
        output,
        download: config.get_bool("report", "download", false),
    })
}

/// `--symbols` wins over `[report] symbols`.
pub fn resolve_symbols(
    symbols_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Vec<String>, BuffetError> {
    let raw = match symbols_override {
        Some(s) => s.to_string(),
        None => config.get_string("report", "symbols").unwrap_or_default(),
    };
    parse_symbols(&raw).map_err(|e| BuffetError::ConfigInvalid {
        section: "report".into(),
        key: "symbols".into(),
        reason: e.to_string(),
    })
}

/// Load, aggregate, optionally save JSON, then render both weekly tables.
pub fn run_weekly_pipeline(
    price_port: &dyn PriceHistoryPort,
    report_port: &dyn ReportPort,
    report: &ReportConfig,
    json_dir: Option<&Path>,
) -> Result<(Content, Content), BuffetError> {
    let universe = load_universe(
        price_port,
        &report.symbols,
        &report.descriptions,
        report.start_date,
        report.end_date,
    )?;
    if !universe.skipped.is_empty() {
        tracing::warn!(skipped = universe.skipped.len(), "some symbols have no price history");
    }

    let (changes, prices) = weekly::aggregate(&universe.series)?;

    if let Some(dir) = json_dir {
        save_content(&dir.join(CHANGES_JSON), &changes)?;
        save_content(&dir.join(PRICES_JSON), &prices)?;
    }

    let tables = vec![
        ReportTable::with_totals(&changes)?,
        ReportTable::with_totals(&prices)?,
    ];
    report_port.write(&tables, &report.output)?;
    Ok((changes, prices))
}

fn run_weekly(
    config_path: &Path,
    download: bool,
    json_dir: Option<&Path>,
    output: Option<&Path>,
    symbols: Option<&str>,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let finance = match build_finance_config(&config) {
        Ok(f) => f,
        Err(e) => return fail(&e),
    };
    let mut report = match build_report_config(&config, symbols) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };
    if let Some(path) = output {
        report.output = path.to_path_buf();
    }

    if download || report.download {
        if let Err(code) = cache_histories(&finance, &report.symbols, report.start_date, report.end_date)
        {
            return code;
        }
    }

    tracing::info!(
        symbols = report.symbols.len(),
        start = %report.start_date,
        end = %report.end_date,
        "building weekly report"
    );
    let prices = CsvPriceAdapter::new(finance.data_root());
    match run_weekly_pipeline(&prices, &PdfReportAdapter::new(), &report, json_dir) {
        Ok((changes, _)) => {
            eprintln!(
                "Report written to: {} ({} weeks, {} symbols)",
                report.output.display(),
                changes.metadata.time.len(),
                changes.data.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_render(output: &Path, totals: bool, inputs: &[PathBuf]) -> ExitCode {
    let mut tables = Vec::with_capacity(inputs.len());
    for path in inputs {
        let table = load_content(path).and_then(|content| {
            if totals {
                ReportTable::with_totals(&content)
            } else {
                ReportTable::without_totals(&content)
            }
        });
        match table {
            Ok(t) => tables.push(t),
            Err(e) => {
                eprintln!("error: {}: {e}", path.display());
                return (&e).into();
            }
        }
    }

    match PdfReportAdapter::new().write(&tables, output) {
        Ok(()) => {
            eprintln!("Report written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

/// Fetch every symbol not yet cached. Individual failures are warnings.
#[cfg(feature = "http")]
fn cache_histories(
    finance: &FinanceConfig,
    symbols: &[String],
    start_date: chrono::NaiveDate,
    end_date: chrono::NaiveDate,
) -> Result<(), ExitCode> {
    use crate::adapters::http_adapter::ReqwestHttpAdapter;
    use crate::adapters::price_cache::{cache_ticker_history, CacheOutcome};
    use crate::adapters::yahoo_adapter::YahooAdapter;

    let http = ReqwestHttpAdapter::new().map_err(|e| fail(&e))?;
    let yahoo = YahooAdapter::new(&http);
    for symbol in symbols {
        match cache_ticker_history(&yahoo, finance.data_root(), symbol, start_date, end_date) {
            Ok(CacheOutcome::Cached) => eprintln!("{symbol}: already cached"),
            Ok(CacheOutcome::Downloaded(rows)) => eprintln!("{symbol}: downloaded {rows} rows"),
            Err(e) => eprintln!("warning: {symbol}: {e}"),
        }
    }
    Ok(())
}

#[cfg(not(feature = "http"))]
fn cache_histories(
    _finance: &FinanceConfig,
    _symbols: &[String],
    _start_date: chrono::NaiveDate,
    _end_date: chrono::NaiveDate,
) -> Result<(), ExitCode> {
    eprintln!("error: http feature is required for downloads");
    Err(ExitCode::from(3))
}

fn run_download(config_path: &Path, symbols: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let finance = match build_finance_config(&config) {
        Ok(f) => f,
        Err(e) => return fail(&e),
    };
    let report = match build_report_config(&config, symbols) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };
    match cache_histories(&finance, &report.symbols, report.start_date, report.end_date) {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => code,
    }
}

#[cfg(feature = "http")]
fn run_fetch_series(config_path: &Path, url: &str, file: &str, columns: &[String]) -> ExitCode {
    use crate::adapters::http_adapter::ReqwestHttpAdapter;
    use crate::domain::downloads::process_series;

    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let finance = match build_finance_config(&config) {
        Ok(f) => f,
        Err(e) => return fail(&e),
    };
    let http = match ReqwestHttpAdapter::new() {
        Ok(h) => h,
        Err(e) => return fail(&e),
    };

    let columns: Vec<&str> = columns.iter().map(|c| c.trim()).collect();
    match process_series(&http, url, file, &columns, finance.data_root()) {
        Ok(summary) => {
            println!("{}: {}", file, summary.download);
            if let Some((first, last)) = &summary.date_range {
                println!("  date range: {first} to {last}");
            }
            println!("  records:    {}", summary.record_count);
            for (column, value) in &summary.latest_values {
                match value {
                    Some(v) => println!("  latest {column}: {v}"),
                    None => println!("  latest {column}: n/a"),
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

#[cfg(not(feature = "http"))]
fn run_fetch_series(_config_path: &Path, _url: &str, _file: &str, _columns: &[String]) -> ExitCode {
    eprintln!("error: http feature is required for fetch-series");
    ExitCode::from(3)
}

pub struct ChartArgs<'a> {
    pub left: &'a str,
    pub right: &'a str,
    pub date_column: &'a str,
    pub left_label: Option<&'a str>,
    pub right_label: Option<&'a str>,
    pub recessions: Option<&'a Path>,
    pub title: &'a str,
    pub output: &'a Path,
}

/// Split `FILE:COLUMN` at the last colon.
pub fn parse_series_arg(arg: &str) -> Result<(&str, &str), BuffetError> {
    match arg.rsplit_once(':') {
        Some((file, column)) if !file.is_empty() && !column.is_empty() => Ok((file, column)),
        _ => Err(BuffetError::InvalidData {
            reason: format!("expected FILE:COLUMN, got {:?}", arg),
        }),
    }
}

fn load_series(root: &Path, arg: &str, date_column: &str, label: Option<&str>) -> Result<DatedSeries, BuffetError> {
    let (file, column) = parse_series_arg(arg)?;
    let points = read_dated_column(&root.join(file), date_column, column)?;
    Ok(DatedSeries::new(label.unwrap_or(column), points))
}

/// `[chart] width` and `height` override the default canvas size.
pub fn chart_options(config: &dyn ConfigPort, title: &str) -> ChartOptions {
    let mut options = ChartOptions::new(title);
    let width = config.get_int("chart", "width", 0);
    let height = config.get_int("chart", "height", 0);
    if width > 0 {
        options.width = width as f64;
    }
    if height > 0 {
        options.height = height as f64;
    }
    options
}

/// Build the chart SVG. An unreadable recession table only drops the shading.
pub fn build_chart(root: &Path, args: &ChartArgs, options: &ChartOptions) -> Result<String, BuffetError> {
    let left = load_series(root, args.left, args.date_column, args.left_label)?;
    let right = load_series(root, args.right, args.date_column, args.right_label)?;

    let recession_path = args
        .recessions
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.join(RECESSIONS_FILE));
    let recessions = if recession_path.exists() {
        match fs::read_to_string(&recession_path)
            .map_err(BuffetError::from)
            .and_then(|text| chart_svg::parse_recessions(&text))
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(path = %recession_path.display(), error = %e, "could not read recession data");
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    Ok(chart_svg::dual_axis_svg(&left, &right, &recessions, options))
}

fn run_chart(config_path: &Path, args: ChartArgs) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let finance = match build_finance_config(&config) {
        Ok(f) => f,
        Err(e) => return fail(&e),
    };

    let options = chart_options(&config, args.title);
    let svg = match build_chart(finance.data_root(), &args, &options) {
        Ok(svg) if svg.is_empty() => {
            eprintln!("error: no data to plot");
            return ExitCode::from(4);
        }
        Ok(svg) => svg,
        Err(e) => return fail(&e),
    };
    match fs::write(args.output, svg) {
        Ok(()) => {
            eprintln!("Chart written to: {}", args.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => fail(&BuffetError::from(e)),
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let report = match build_finance_config(&config).and_then(|_| build_report_config(&config, None)) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    eprintln!("Symbols:  {}", report.symbols.join(", "));
    eprintln!("Period:   {} to {}", report.start_date, report.end_date);
    eprintln!("Output:   {}", report.output.display());
    for symbol in &report.symbols {
        if !report.descriptions.contains_key(symbol) {
            eprintln!("warning: no description for {symbol}");
        }
    }
    eprintln!("\nReport configuration is valid.");
    ExitCode::SUCCESS
}
