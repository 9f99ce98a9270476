//! Environment-based configuration

use std::env;

/// Deployment environment name, defaults to `development`.
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
}

/// HTTP port for the API server.
pub fn get_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080)
}

/// NSE charting endpoint URL.
pub fn get_chart_api_url() -> String {
    env::var("CHART_API_URL")
        .unwrap_or_else(|_| "https://charting.nseindia.com/Charts/ChartData/".to_string())
}

/// Symbol universe for scans, comma-separated in `SCAN_SYMBOLS`.
pub fn get_scan_symbols() -> Vec<String> {
    env::var("SCAN_SYMBOLS")
        .map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Scheduled scan interval in seconds. 0 disables the scheduler.
pub fn get_scan_interval_seconds() -> u64 {
    env::var("SCAN_INTERVAL_SECONDS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

/// Number of symbols fetched concurrently per scan batch.
pub fn get_scan_batch_size() -> usize {
    env::var("SCAN_BATCH_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(50)
}

/// Proximity threshold for scan matches, as a price fraction.
pub fn get_scan_threshold() -> f64 {
    env::var("SCAN_THRESHOLD")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.005)
}
