//! TradeLens Scanner
//!
//! Runs the periodic support/resistance scan over the configured symbol
//! universe. Can be run as a separate process/instance from the API server.

use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tradelens::config;
use tradelens::core::scheduler::ScanScheduler;
use tradelens::logging;
use tradelens::metrics::Metrics;
use tradelens::services::chart_data::{ChartDataProvider, NseChartClient};
use tradelens::services::scanner::ScanConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    // Initialize logging based on environment
    logging::init_logging();

    let env = config::get_environment();
    info!("Starting TradeLens Scanner");
    info!(environment = %env, "Environment");

    let scan_interval = config::get_scan_interval_seconds();
    if scan_interval == 0 {
        return Err("SCAN_INTERVAL_SECONDS must be > 0 for scanner".into());
    }

    let symbols = config::get_scan_symbols();
    if symbols.is_empty() {
        return Err("SCAN_SYMBOLS must name at least one symbol for scanner".into());
    }
    info!(
        symbol_count = symbols.len(),
        interval = scan_interval,
        "Scanning {} symbols every {} seconds",
        symbols.len(),
        scan_interval
    );

    let metrics = Arc::new(Metrics::new()?);

    let scan_config = ScanConfig {
        batch_size: config::get_scan_batch_size(),
        threshold: config::get_scan_threshold(),
        ..ScanConfig::default()
    };

    let provider: Arc<dyn ChartDataProvider + Send + Sync> = Arc::new(NseChartClient::new());

    info!("Starting scan scheduler...");
    let scheduler = ScanScheduler::new(
        provider,
        symbols,
        scan_interval,
        scan_config,
        Some(metrics.clone()),
    )
    .map_err(|e| format!("Failed to create scheduler: {}", e))?;
    scheduler
        .start()
        .await
        .map_err(|e| format!("Failed to start scheduler: {}", e))?;

    // Graceful shutdown
    info!("Scanner started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down scanner...");
            scheduler.stop().await;
            info!("Scanner stopped");
        }
    }

    Ok(())
}
