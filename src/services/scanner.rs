//! Batch scan orchestrator
//!
//! Walks a symbol universe in fixed-size batches, fetching chart data and
//! running the level engine concurrently within a batch. A fixed delay
//! separates batches so the upstream charting API is not hammered; the
//! engine itself has no concurrency constraints.

use crate::levels::SupportResistanceEngine;
use crate::models::ohlc::OhlcSeries;
use crate::models::scan::{ChartPeriod, ScanMatch};
use crate::services::chart_data::{ChartDataProvider, ChartDataRequest};
use chrono::Utc;
use futures_util::future::join_all;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

/// Scan tuning. Defaults mirror the dashboard's scanner settings: batches
/// of 50 symbols, a 0.5% proximity threshold, daily candles and a 50 ms
/// pause between batches.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    pub batch_size: usize,
    pub threshold: f64,
    pub chart_period: ChartPeriod,
    pub interval: u32,
    pub inter_batch_delay_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            threshold: 0.005,
            chart_period: ChartPeriod::Daily,
            interval: 1,
            inter_batch_delay_ms: 50,
        }
    }
}

/// Scan symbols for prices near a support/resistance level.
///
/// A symbol that fails to fetch or produces no usable levels is skipped,
/// never failing the scan.
pub async fn scan_symbols(
    provider: &(dyn ChartDataProvider + Send + Sync),
    symbols: &[String],
    config: &ScanConfig,
) -> Vec<ScanMatch> {
    let batch_size = config.batch_size.max(1);
    let mut matches = Vec::new();

    for (batch_index, batch) in symbols.chunks(batch_size).enumerate() {
        let analyses = batch
            .iter()
            .map(|symbol| analyze_symbol(provider, symbol, config));
        let results = join_all(analyses).await;
        matches.extend(results.into_iter().flatten());

        let analyzed = (batch_index * batch_size + batch.len()).min(symbols.len());
        info!(
            analyzed = analyzed,
            total = symbols.len(),
            matches = matches.len(),
            "Scan progress: {:.2}%",
            analyzed as f64 / symbols.len() as f64 * 100.0
        );

        if analyzed < symbols.len() {
            sleep(Duration::from_millis(config.inter_batch_delay_ms)).await;
        }
    }

    matches
}

async fn analyze_symbol(
    provider: &(dyn ChartDataProvider + Send + Sync),
    symbol: &str,
    config: &ScanConfig,
) -> Option<ScanMatch> {
    let request = ChartDataRequest::for_equity(symbol, config.chart_period, config.interval);

    let series: OhlcSeries = match provider.get_chart_data(&request).await {
        Ok(series) => series,
        Err(e) => {
            warn!(symbol = %symbol, error = %e, "Failed to fetch chart data, skipping");
            return None;
        }
    };

    let Some(current_price) = series.last_close() else {
        debug!(symbol = %symbol, "No chart data found, skipping");
        return None;
    };

    // Engine construction cannot fail here: the close array is non-empty.
    let engine = SupportResistanceEngine::with_defaults(&series, Some(current_price)).ok()?;
    let levels = engine.calculate_levels();
    let check = engine.check_near_support_or_resistance(config.threshold, &levels);

    if check.is_near {
        debug!(
            symbol = %symbol,
            price = current_price,
            distance_pct = check.distance_percentage,
            "Symbol is near a level"
        );
        Some(ScanMatch {
            symbol: symbol.to_string(),
            current_price,
            scanned_at: Utc::now(),
        })
    } else {
        None
    }
}
