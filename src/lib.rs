pub mod cli;
pub mod config;
pub mod core;
pub mod providers;
pub mod store;

use crate::config::AppConfig;
use crate::core::{Aggregator, QuoteProvider, SpikeDetector};
use crate::providers::binance::BinanceProvider;
use crate::providers::minfin::MinfinProvider;
use crate::providers::monobank::MonobankProvider;
use crate::providers::privat::PrivatProvider;
use crate::store::BaselineStore;
use crate::store::disk::DiskBaselines;
use crate::store::memory::MemoryBaselines;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub enum AppCommand {
    Rate { currency: String },
    Best { currency: String, count: usize },
    Sources { currency: String },
    Check { currency: String },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("ratewatch starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let aggregator = build_aggregator(&config);

    match command {
        AppCommand::Rate { currency } => cli::rates::show_rate(&aggregator, &currency).await,
        AppCommand::Best { currency, count } => {
            cli::rates::show_best(&aggregator, &currency, count).await
        }
        AppCommand::Sources { currency } => {
            cli::rates::show_sources(&aggregator, &currency).await
        }
        AppCommand::Check { currency } => {
            let baselines = open_baselines(&config);
            let detector = SpikeDetector::new(aggregator, baselines, config.spike_threshold_pct);
            cli::spike::run_check(&detector, &currency).await
        }
    }
}

/// Builds the provider fan-out in fixed order: the multi-source listing
/// first, then the banks, then the spot feed.
pub fn build_aggregator(config: &AppConfig) -> Aggregator {
    let mut providers: Vec<Arc<dyn QuoteProvider>> = Vec::new();

    if let Some(minfin) = &config.providers.minfin
        && let Some(api_key) = &minfin.api_key
    {
        providers.push(Arc::new(MinfinProvider::new(&minfin.base_url, api_key)));
    } else {
        debug!("Minfin source skipped: no API key configured");
    }

    let privat_base = config
        .providers
        .privat
        .as_ref()
        .map_or("https://api.privatbank.ua", |p| &p.base_url);
    providers.push(Arc::new(PrivatProvider::new(privat_base)));

    let binance_base = config
        .providers
        .binance
        .as_ref()
        .map_or("https://api.binance.com", |p| &p.base_url);
    providers.push(Arc::new(BinanceProvider::new(
        binance_base,
        &config.local_currency,
    )));

    let monobank_base = config
        .providers
        .monobank
        .as_ref()
        .map_or("https://api.monobank.ua", |p| &p.base_url);
    providers.push(Arc::new(MonobankProvider::new(
        monobank_base,
        &config.local_currency,
    )));

    Aggregator::new(providers, Duration::from_secs(config.provider_timeout_secs))
}

/// Opens the disk baseline store, degrading to an in-memory store when the
/// data directory is unusable. Spike checks still run; they just lose their
/// comparison point across restarts.
pub fn open_baselines(config: &AppConfig) -> Arc<dyn BaselineStore> {
    let dir = match config.baseline_dir() {
        Ok(dir) => dir,
        Err(e) => {
            warn!(error = %e, "No data directory available, baselines kept in memory");
            return Arc::new(MemoryBaselines::new());
        }
    };

    match DiskBaselines::open(&dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(error = %e, "Baseline store unavailable, baselines kept in memory");
            Arc::new(MemoryBaselines::new())
        }
    }
}
