//! Scan request/result models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chart aggregation period understood by the NSE charting API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartPeriod {
    #[serde(rename = "I")]
    Intraday,
    #[serde(rename = "D")]
    Daily,
    #[serde(rename = "W")]
    Weekly,
    #[serde(rename = "M")]
    Monthly,
}

impl Default for ChartPeriod {
    fn default() -> Self {
        ChartPeriod::Daily
    }
}

/// A symbol whose price was near a support/resistance level at scan time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanMatch {
    pub symbol: String,
    pub current_price: f64,
    pub scanned_at: DateTime<Utc>,
}
