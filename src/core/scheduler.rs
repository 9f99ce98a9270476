//! Cron-based scheduler for periodic support/resistance scans

use crate::metrics::Metrics;
use crate::services::chart_data::ChartDataProvider;
use crate::services::scanner::{scan_symbols, ScanConfig};
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Scheduler that periodically scans the symbol universe for prices near
/// a support/resistance level.
pub struct ScanScheduler {
    provider: Arc<dyn ChartDataProvider + Send + Sync>,
    symbols: Vec<String>,
    scan_config: ScanConfig,
    schedule: Schedule,
    metrics: Option<Arc<Metrics>>,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl ScanScheduler {
    /// Create a new scheduler
    ///
    /// # Arguments
    /// * `provider` - Chart data source
    /// * `symbols` - Symbol universe to scan
    /// * `interval_seconds` - Scan interval in seconds (0 = disabled)
    pub fn new(
        provider: Arc<dyn ChartDataProvider + Send + Sync>,
        symbols: Vec<String>,
        interval_seconds: u64,
        scan_config: ScanConfig,
        metrics: Option<Arc<Metrics>>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        if interval_seconds == 0 {
            return Err("Scheduler disabled: interval_seconds is 0".into());
        }

        // Cron format: second minute hour day month weekday
        let cron_expr = if interval_seconds >= 60 {
            let minutes = interval_seconds / 60;
            format!("0 */{} * * * *", minutes)
        } else {
            format!("*/{} * * * * *", interval_seconds)
        };

        let schedule = Schedule::from_str(&cron_expr).map_err(|e| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid cron expression '{}': {}", cron_expr, e),
            )) as Box<dyn std::error::Error + Send + Sync>
        })?;

        info!(
            interval = interval_seconds,
            cron = %cron_expr,
            symbol_count = symbols.len(),
            "ScanScheduler: created with interval {}s (cron: {})",
            interval_seconds,
            cron_expr
        );

        Ok(Self {
            provider,
            symbols,
            scan_config,
            schedule,
            metrics,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let provider = self.provider.clone();
        let symbols = self.symbols.clone();
        let scan_config = self.scan_config.clone();
        let schedule = self.schedule.clone();
        let metrics = self.metrics.clone();
        let handle_arc = self.handle.clone();

        let handle = tokio::spawn(async move {
            info!("ScanScheduler: started, waiting for cron schedule...");

            loop {
                let mut upcoming = schedule.upcoming(chrono::Utc);
                if let Some(next_tick) = upcoming.next() {
                    let now = chrono::Utc::now();
                    if next_tick > now {
                        let duration = (next_tick - now).to_std().unwrap_or_default();
                        tokio::time::sleep(duration).await;
                    }
                } else {
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                    continue;
                }

                if symbols.is_empty() {
                    error!("ScanScheduler: no symbols configured, skipping tick");
                    continue;
                }

                info!(
                    symbol_count = symbols.len(),
                    "ScanScheduler: cron tick, scanning {} symbols",
                    symbols.len()
                );

                let start = Instant::now();
                let matches = scan_symbols(provider.as_ref(), &symbols, &scan_config).await;

                if let Some(ref m) = metrics {
                    m.scans_total.inc();
                    m.scan_symbols_total.inc_by(symbols.len() as u64);
                    m.scan_matches_total.inc_by(matches.len() as u64);
                    m.scan_duration_seconds.observe(start.elapsed().as_secs_f64());
                }

                info!(
                    matches = matches.len(),
                    duration_ms = start.elapsed().as_millis(),
                    "ScanScheduler: scan finished with {} matches",
                    matches.len()
                );
            }
        });

        {
            let mut h = handle_arc.write().await;
            *h = Some(handle);
        }

        info!("ScanScheduler: started successfully");
        Ok(())
    }

    /// Stop the scheduler
    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("ScanScheduler: stopped");
        }
    }

    /// Check if the scheduler is running
    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.is_some()
    }
}
