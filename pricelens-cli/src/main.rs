//! PriceLens CLI — fetch daily closes, analyze them, draw the charts.
//!
//! Commands:
//! - `fetch` — download closes for a symbol and store them as `<SYMBOL>.csv`
//! - `analyze` — clean, compute returns / moving averages / volatility, chart
//! - `histogram` — closing-price distribution

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use pricelens_core::analysis::SeriesStats;
use pricelens_core::chart::{ChartRenderer, ChartSpec, NullRenderer};
use pricelens_core::data::{
    clean, CleaningReport, CsvStore, DataError, DataSource, MarketDataSource, SyntheticSource,
    TabularStore, YahooSource,
};
use pricelens_core::{AlignmentPolicy, AnalysisConfig, PriceTable, TimeSeriesAnalyzer};
use pricelens_tui::TerminalRenderer;

#[derive(Parser)]
#[command(
    name = "pricelens",
    about = "PriceLens — daily close analytics: moving averages, volatility, price distribution"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch daily closes and write them to <OUT_DIR>/<SYMBOL>.csv.
    Fetch {
        /// Ticker symbol (e.g., AAPL, BTC-USD).
        symbol: String,

        #[command(flatten)]
        range: DateRange,

        /// Directory for the fetched CSV.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Generate deterministic synthetic data instead of calling Yahoo Finance.
        #[arg(long, default_value_t = false)]
        synthetic: bool,
    },
    /// Clean, analyze, and chart a symbol or an existing CSV file.
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// TOML file with window sizes and alignment policy.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the augmented table (Date, Close, Daily Return, SMAs, Volatility) here.
        #[arg(long)]
        export: Option<PathBuf>,

        /// Keep rows with unusable closes as gaps instead of dropping them.
        #[arg(long, default_value_t = false)]
        preserve_dates: bool,

        /// Skip the terminal chart.
        #[arg(long, default_value_t = false)]
        no_chart: bool,
    },
    /// Show the closing-price distribution.
    Histogram {
        #[command(flatten)]
        input: InputArgs,

        /// Number of equal-width bins.
        #[arg(long, default_value_t = pricelens_core::config::DEFAULT_HISTOGRAM_BINS)]
        bins: usize,

        /// Skip the terminal chart.
        #[arg(long, default_value_t = false)]
        no_chart: bool,
    },
}

#[derive(Args)]
struct DateRange {
    /// Start date (YYYY-MM-DD). Defaults to one year before --end.
    #[arg(long, value_parser = parse_date)]
    start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD), exclusive: `--start 2022-01-01 --end 2023-01-01`
    /// is calendar 2022. Defaults to today.
    #[arg(long, value_parser = parse_date)]
    end: Option<NaiveDate>,
}

impl DateRange {
    fn resolve(&self) -> (NaiveDate, NaiveDate) {
        let end = self
            .end
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        let start = self
            .start
            .unwrap_or_else(|| end - chrono::Duration::days(365));
        (start, end)
    }
}

#[derive(Args)]
struct InputArgs {
    /// Ticker symbol. With --input it only labels the output.
    #[arg(required_unless_present = "input")]
    symbol: Option<String>,

    /// Read closes from this CSV instead of fetching.
    #[arg(long)]
    input: Option<PathBuf>,

    #[command(flatten)]
    range: DateRange,

    /// Directory for the fetched CSV.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Generate deterministic synthetic data instead of calling Yahoo Finance.
    #[arg(long, default_value_t = false)]
    synthetic: bool,
}

impl InputArgs {
    fn label(&self) -> String {
        match (&self.symbol, &self.input) {
            (Some(symbol), _) => symbol.clone(),
            (None, Some(path)) => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "input".to_string()),
            (None, None) => "input".to_string(),
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Fetch {
            symbol,
            range,
            out_dir,
            synthetic,
        } => {
            let (start, end) = range.resolve();
            let path = fetch_to_csv(&symbol, start, end, &out_dir, synthetic)?;
            println!("Saved {}", path.display());
            Ok(())
        }
        Commands::Analyze {
            input,
            config,
            export,
            preserve_dates,
            no_chart,
        } => run_analyze(&input, config.as_deref(), export.as_deref(), preserve_dates, no_chart),
        Commands::Histogram {
            input,
            bins,
            no_chart,
        } => run_histogram(&input, bins, no_chart),
    }
}

fn source(synthetic: bool) -> Result<Box<dyn MarketDataSource>> {
    if synthetic {
        Ok(Box::new(SyntheticSource::default()))
    } else {
        Ok(Box::new(
            YahooSource::new().context("failed to build HTTP client")?,
        ))
    }
}

/// Fetch closes and write `<out_dir>/<SYMBOL>.csv`. Empty results are an error.
fn fetch_to_csv(
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    out_dir: &Path,
    synthetic: bool,
) -> Result<PathBuf> {
    let source = source(synthetic)?;
    info!(
        symbol,
        %start,
        %end,
        source = source.name(),
        kind = ?source.kind(),
        "fetching daily closes"
    );

    let samples = source
        .fetch(symbol, start, end)
        .with_context(|| format!("fetching {symbol}"))?;
    if samples.is_empty() {
        return Err(DataError::EmptyInput(format!("{symbol} {start}..{end}")).into());
    }

    let store = CsvStore::new(out_dir.join(csv_file_name(symbol)?));
    store
        .write_samples(&samples)
        .with_context(|| format!("writing {}", store.path().display()))?;
    info!(rows = samples.len(), path = %store.path().display(), "saved closes");
    Ok(store.path().to_path_buf())
}

/// `<SYMBOL>.csv`, refusing symbols that would escape the output directory.
fn csv_file_name(symbol: &str) -> Result<String> {
    let escapes = symbol.is_empty()
        || symbol == "."
        || symbol == ".."
        || symbol.chars().any(|c| std::path::is_separator(c) || c.is_control());
    if escapes {
        anyhow::bail!("symbol {symbol:?} cannot be used as a file name");
    }
    Ok(format!("{symbol}.csv"))
}

/// Resolve the input CSV (fetching first when needed), read and clean it.
fn load_table(input: &InputArgs, policy: AlignmentPolicy) -> Result<(PriceTable, CleaningReport)> {
    let path = match (&input.input, &input.symbol) {
        (Some(path), _) => path.clone(),
        (None, Some(symbol)) => {
            let (start, end) = input.range.resolve();
            fetch_to_csv(symbol, start, end, &input.out_dir, input.synthetic)?
        }
        (None, None) => anyhow::bail!("either a symbol or --input is required"),
    };

    info!(path = %path.display(), kind = ?DataSource::CsvFile, "reading closes");
    let rows = CsvStore::new(&path)
        .read()
        .with_context(|| format!("reading {}", path.display()))?;
    let (table, report) = clean(&rows, policy)?;

    if !report.is_clean() {
        info!(
            duplicates = report.duplicates_removed,
            forward_filled = report.forward_filled,
            backward_filled = report.backward_filled,
            malformed = report.malformed.len(),
            inherited_malformed = report.inherited_malformed,
            dropped = report.dropped,
            gaps = report.gaps,
            "cleaned input"
        );
    }
    Ok((table, report))
}

fn renderer(no_chart: bool) -> Box<dyn ChartRenderer> {
    if no_chart {
        Box::new(NullRenderer)
    } else {
        Box::new(TerminalRenderer::default())
    }
}

fn run_analyze(
    input: &InputArgs,
    config_path: Option<&Path>,
    export: Option<&Path>,
    preserve_dates: bool,
    no_chart: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    if preserve_dates {
        config.alignment = AlignmentPolicy::PreserveDates;
    }
    config.validate()?;

    let (table, _) = load_table(input, config.alignment)?;
    let analyzer = TimeSeriesAnalyzer::new(config);
    debug!(config = ?analyzer.config(), "analyzing");
    let report = analyzer.analyze(&table)?;

    let label = input.label();
    println!(
        "{label}: {} rows, {} to {}",
        report.len(),
        report.dates.first().map(|d| d.to_string()).unwrap_or_default(),
        report.dates.last().map(|d| d.to_string()).unwrap_or_default(),
    );
    let columns = report.column_names();
    let series = [
        &report.close,
        &report.daily_return,
        &report.sma_short,
        &report.sma_long,
        &report.volatility,
    ];
    for (name, s) in columns.iter().skip(1).zip(series) {
        match SeriesStats::compute(s) {
            Some(stats) => println!("  {}", stats.report(name)),
            None => println!("  {name:<14} (undefined)"),
        }
    }

    if let Some(path) = export {
        let store = CsvStore::new(path);
        store
            .write_report(&report)
            .with_context(|| format!("exporting {}", store.path().display()))?;
        info!(path = %store.path().display(), "exported analysis");
    }

    renderer(no_chart).render(&ChartSpec::price_and_volatility(&report, &label))?;
    Ok(())
}

fn run_histogram(input: &InputArgs, bins: usize, no_chart: bool) -> Result<()> {
    let config = AnalysisConfig {
        histogram_bins: bins,
        ..AnalysisConfig::default()
    };
    config.validate()?;

    let (table, _) = load_table(input, config.alignment)?;
    let histogram = TimeSeriesAnalyzer::new(config).histogram(&table);

    let label = input.label();
    println!("{label}: {} closes in {} bins", histogram.total(), histogram.bins.len());
    let peak = histogram.max_count().max(1);
    for bin in &histogram.bins {
        let bar = "#".repeat(bin.count * 40 / peak);
        println!("  [{:>12.4}, {:>12.4}] {:>6} {bar}", bin.lower, bin.upper, bin.count);
    }

    renderer(no_chart).render(&ChartSpec::price_distribution(&histogram, &label))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_date_accepts_iso_only() {
        assert_eq!(
            parse_date("2023-01-31"),
            Ok(NaiveDate::from_ymd_opt(2023, 1, 31).unwrap())
        );
        assert!(parse_date("01/31/2023").is_err());
        assert!(parse_date("2023-02-30").is_err());
    }

    #[test]
    fn analyze_requires_symbol_or_input() {
        assert!(Cli::try_parse_from(["pricelens", "analyze"]).is_err());
        assert!(Cli::try_parse_from(["pricelens", "analyze", "AAPL", "--no-chart"]).is_ok());
        assert!(Cli::try_parse_from(["pricelens", "analyze", "--input", "prices.csv"]).is_ok());
    }

    #[test]
    fn symbol_file_name_stays_in_out_dir() {
        assert_eq!(csv_file_name("BTC-USD").unwrap(), "BTC-USD.csv");
        assert_eq!(csv_file_name("^GSPC").unwrap(), "^GSPC.csv");
        assert!(csv_file_name("../etc/passwd").is_err());
        assert!(csv_file_name("a/b").is_err());
        assert!(csv_file_name("..").is_err());
        assert!(csv_file_name("").is_err());
    }

    #[test]
    fn fetch_refuses_symbol_with_separator() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let cli = Cli::try_parse_from([
            "pricelens",
            "fetch",
            "../escape",
            "--synthetic",
            "--start",
            "2022-01-03",
            "--end",
            "2022-02-01",
            "--out-dir",
            out.to_str().unwrap(),
        ])
        .unwrap();
        assert!(run(cli).is_err());
        assert!(!dir.path().join("escape.csv").exists());
    }

    #[test]
    fn date_range_defaults_to_one_year() {
        let range = DateRange {
            start: None,
            end: Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
        };
        let (start, end) = range.resolve();
        assert_eq!(end - start, chrono::Duration::days(365));
    }

    #[test]
    fn label_falls_back_to_file_stem() {
        let cli = Cli::try_parse_from(["pricelens", "histogram", "--input", "data/MSFT.csv"])
            .unwrap();
        let Commands::Histogram { input, .. } = cli.command else {
            panic!("expected histogram");
        };
        assert_eq!(input.label(), "MSFT");
    }

    #[test]
    fn synthetic_analyze_and_export_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("ETH-USD_analysis.csv");
        let cli = Cli::try_parse_from([
            "pricelens",
            "analyze",
            "ETH-USD",
            "--synthetic",
            "--no-chart",
            "--start",
            "2022-01-01",
            "--end",
            "2023-01-01",
            "--out-dir",
            dir.path().to_str().unwrap(),
            "--export",
            export.to_str().unwrap(),
        ])
        .unwrap();
        run(cli).unwrap();

        assert!(dir.path().join("ETH-USD.csv").exists());
        let text = std::fs::read_to_string(export).unwrap();
        assert!(text.starts_with("Date,Close,Daily Return,SMA_50,SMA_200,Volatility"));
    }

    #[test]
    fn reversed_range_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "pricelens",
            "fetch",
            "X",
            "--synthetic",
            "--start",
            "2023-01-01",
            "--end",
            "2022-01-01",
            "--out-dir",
            dir.path().to_str().unwrap(),
        ])
        .unwrap();
        assert!(run(cli).is_err());
    }
}
