pub mod cli;
pub mod core;
pub mod notify;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::quote::Period;
use crate::core::table;
use crate::notify::ChannelSet;
use crate::providers::{PageSource, TradingEconomicsSource};
use crate::store::disk::DiskSnapshots;
use crate::store::memory::MemorySnapshots;
use crate::store::SnapshotStore;
use anyhow::Result;
use chrono::Utc;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// A parsed CLI invocation, independent of the argument parser.
pub enum AppCommand {
    /// Show all quotes, optionally exporting them as CSV.
    Quotes { export: Option<PathBuf> },
    /// Show top performers for a metric.
    Top {
        metric: Period,
        count: usize,
        global: bool,
    },
    /// Show the strong-leads consensus ranking, optionally with rank
    /// changes against the previous day.
    Leads { changes: bool },
    /// Show investment opportunities per timeframe.
    Opportunities,
    /// Evaluate subscriptions and deliver fired alerts.
    Alerts { dry_run: bool },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Commodities tracker starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let source = TradingEconomicsSource::new(&config.source.base_url);
    let spinner = cli::ui::new_spinner("Fetching commodities page...");
    let page = source.fetch_page().await;
    spinner.finish_and_clear();
    let page = page?;

    let quotes = table::parse_quotes(&page, config.reference_year());
    if quotes.is_empty() {
        // The page was fetched and read fine; it just held nothing usable.
        anyhow::bail!("No commodity rows found on the page");
    }
    info!("Parsed {} commodity quotes", quotes.len());

    let today = Utc::now().date_naive();

    match command {
        AppCommand::Quotes { export } => {
            cli::quotes::run(&quotes, export.as_deref())?;
            open_store(&config)?.save_day(today, &quotes)?;
        }
        AppCommand::Top {
            metric,
            count,
            global,
        } => cli::top::run(&quotes, metric, count, global)?,
        AppCommand::Leads { changes } => {
            let store = open_store(&config)?;
            cli::leads::run(&quotes, store.as_ref(), today, changes)?;
        }
        AppCommand::Opportunities => cli::opportunities::run(&quotes)?,
        AppCommand::Alerts { dry_run } => {
            let store = open_store(&config)?;
            let channels = ChannelSet::from_smtp(config.smtp.as_ref())?;
            cli::alerts::run(
                &quotes,
                &config.subscriptions,
                store.as_ref(),
                &channels,
                today,
                dry_run,
            )
            .await?;
            // Record today's prices so tomorrow's run has a baseline.
            store.save_day(today, &quotes)?;
        }
    }

    Ok(())
}

fn open_store(config: &AppConfig) -> Result<Box<dyn SnapshotStore>> {
    match config.default_data_path() {
        Ok(path) => Ok(Box::new(DiskSnapshots::open(&path)?)),
        Err(e) => {
            warn!("Could not resolve data directory ({e}); snapshots will not persist");
            Ok(Box::new(MemorySnapshots::new()))
        }
    }
}
