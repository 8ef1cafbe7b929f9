//! Command-line interface for yieldwatch

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};
use yieldwatch_core::FrequencyEngine;
use yieldwatch_core::stats::summarize_all;
use yieldwatch_data::table::{parse_listing, write_listing};
use yieldwatch_data::{
    CachedPriceSource, DailyTracker, HistoryTable, HistoryTracker, JsonFilePriceCache, PriceCache, Region,
    RegionSummary, StatsStore, TrackerConfig, YahooFinanceClient,
};

#[derive(Parser, Debug)]
#[command(name = "yieldwatch")]
#[command(about = "Track ETF distribution yields against their own history", long_about = None)]
struct Cli {
    /// Tracker configuration (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Relabel frequencies and yields in history CSV files, in place
    Infer {
        /// History CSV files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Compute per-ticker yield statistics from a history CSV
    Stats {
        #[arg(long)]
        history: PathBuf,

        #[arg(long)]
        out: PathBuf,
    },

    /// Fetch new dividend payments and refresh statistics
    History {
        /// Only process this region
        #[arg(short, long)]
        region: Option<String>,
    },

    /// Build the current-yield report
    Daily {
        /// Only process this region
        #[arg(short, long)]
        region: Option<String>,
    },

    /// Convert a pasted dividend listing into CSV
    Listing {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, default_value = "tsx_dividends.csv")]
        output: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<TrackerConfig> {
    let config = match path {
        Some(path) => TrackerConfig::from_file(path).with_context(|| format!("loading {}", path.display()))?,
        None => TrackerConfig::default(),
    };
    Ok(config.with_env_overrides()?)
}

fn selected_regions<'a>(config: &'a TrackerConfig, name: Option<&str>) -> anyhow::Result<Vec<&'a Region>> {
    match name {
        Some(name) => match config.region(name) {
            Some(region) => Ok(vec![region]),
            None => bail!("unknown region: {name}"),
        },
        None => Ok(config.regions.iter().collect()),
    }
}

fn summary_table(summaries: &[RegionSummary]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Region", "Tickers", "Rows", "Relabeled", "Failed"]);
    for s in summaries {
        table.add_row(vec![
            s.region.clone(),
            s.tickers.to_string(),
            s.rows_written.to_string(),
            s.relabeled.to_string(),
            s.failed.join(" "),
        ]);
    }
    table
}

fn run_infer(config: &TrackerConfig, files: &[PathBuf]) -> ExitCode {
    let engine = FrequencyEngine::new(&config.analysis);
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["File", "Rows", "Relabeled"]);

    let mut updated = 0;
    for path in files {
        let mut history = match HistoryTable::load(path) {
            Ok(history) => history,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping file");
                continue;
            },
        };

        let relabeled = history.apply_inference(&engine);
        if let Err(e) = history.save(path) {
            error!(path = %path.display(), error = %e, "Could not write file");
            continue;
        }

        updated += 1;
        table.add_row(vec![path.display().to_string(), history.len().to_string(), relabeled.to_string()]);
    }

    println!("{table}");
    if updated == 0 {
        error!("No files were updated");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run_stats(config: &TrackerConfig, history: &Path, out: &Path) -> anyhow::Result<()> {
    let table = HistoryTable::load(history).with_context(|| format!("loading {}", history.display()))?;
    let store = StatsStore::from_records(summarize_all(table.yield_samples(), config.analysis.band_center));
    store.save(out)?;

    let mut output = Table::new();
    output.load_preset(UTF8_FULL);
    output.set_header(vec!["Ticker", "Median %", "Mean %", "Std Dev %"]);
    let fmt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.3}"));
    for s in store.records() {
        output.add_row(vec![
            s.ticker.clone(),
            fmt(s.median_yield_pct),
            fmt(s.mean_yield_pct),
            fmt(s.std_dev_pct),
        ]);
    }
    println!("{output}");
    Ok(())
}

async fn run_history(config: Arc<TrackerConfig>, region: Option<&str>) -> anyhow::Result<()> {
    let yahoo = YahooFinanceClient::new(&config)?;
    let cache = Arc::new(JsonFilePriceCache::open(&config.price_cache_path));
    let shared: Arc<dyn PriceCache> = cache.clone();
    let tracker = HistoryTracker::new(CachedPriceSource::new(yahoo.clone(), shared), yahoo, Arc::clone(&config));

    let mut summaries = Vec::new();
    for region in selected_regions(&config, region)? {
        match tracker.refresh_region(region).await {
            Ok(summary) => summaries.push(summary),
            Err(e) => error!(region = %region.name, error = %e, "History refresh failed"),
        }
    }

    cache.flush().await?;
    println!("{}", summary_table(&summaries));
    Ok(())
}

async fn run_daily(config: Arc<TrackerConfig>, region: Option<&str>) -> anyhow::Result<()> {
    let yahoo = YahooFinanceClient::new(&config)?;
    let tracker = DailyTracker::new(yahoo.clone(), yahoo, Arc::clone(&config));

    let mut summaries = Vec::new();
    for region in selected_regions(&config, region)? {
        match tracker.refresh_region(region).await {
            Ok(summary) => summaries.push(summary),
            Err(e) => error!(region = %region.name, error = %e, "Report failed"),
        }
    }

    println!("{}", summary_table(&summaries));
    Ok(())
}

fn run_listing(input: &Path, output: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let listing = parse_listing(&text);
    write_listing(&listing.rows, output)?;
    info!(rows = listing.rows.len(), skipped = listing.skipped, output = %output.display(), "Listing converted");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    yieldwatch_utils::init_tracing();

    let cli = Cli::parse();
    let app = yieldwatch_utils::Config::from_env();
    info!(app = %app.app_name, environment = %app.environment, "Starting");

    let config = Arc::new(load_config(cli.config.as_deref())?);

    match cli.command {
        Command::Infer { files } => return Ok(run_infer(&config, &files)),
        Command::Stats { history, out } => run_stats(&config, &history, &out)?,
        Command::History { region } => run_history(config, region.as_deref()).await?,
        Command::Daily { region } => run_daily(config, region.as_deref()).await?,
        Command::Listing { input, output } => run_listing(&input, &output)?,
    }

    Ok(ExitCode::SUCCESS)
}
