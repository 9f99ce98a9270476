//! NSE charting API client
//!
//! The charting endpoint is the same one the exchange's mobile frontend
//! uses, so requests must carry browser-like headers. Transient failures
//! are retried with exponential backoff.

use crate::config;
use crate::models::ohlc::OhlcSeries;
use crate::models::scan::ChartPeriod;
use backon::{ExponentialBuilder, Retryable};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 6.0; Nexus 5 Build/MRA58N) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/128.0.0.0 Mobile Safari/537.36";

/// Request body for the charting endpoint, serialized with the exact
/// field names the API expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataRequest {
    pub exch: String,
    #[serde(rename = "tradingSymbol")]
    pub trading_symbol: String,
    #[serde(rename = "fromDate")]
    pub from_date: i64,
    #[serde(rename = "toDate")]
    pub to_date: i64,
    #[serde(rename = "timeInterval")]
    pub time_interval: u32,
    #[serde(rename = "chartPeriod")]
    pub chart_period: ChartPeriod,
    #[serde(rename = "chartStart")]
    pub chart_start: i64,
}

impl ChartDataRequest {
    /// Full-history request for an NSE equity symbol. The `-EQ` suffix
    /// selects the equity segment; the end date is padded by a day so the
    /// current session is always included.
    pub fn for_equity(symbol: &str, chart_period: ChartPeriod, time_interval: u32) -> Self {
        Self {
            exch: "N".to_string(),
            trading_symbol: format!("{}-EQ", symbol),
            from_date: 0,
            to_date: Utc::now().timestamp() + 86_400,
            time_interval,
            chart_period,
            chart_start: 0,
        }
    }
}

/// Source of OHLC series for a symbol. Implemented by the NSE client in
/// production and by wiremock-backed fakes in tests.
#[async_trait::async_trait]
pub trait ChartDataProvider {
    async fn get_chart_data(
        &self,
        request: &ChartDataRequest,
    ) -> Result<OhlcSeries, Box<dyn std::error::Error + Send + Sync>>;
}

pub struct NseChartClient {
    http: reqwest::Client,
    endpoint: String,
}

impl NseChartClient {
    /// Client pointed at the configured charting endpoint.
    pub fn new() -> Self {
        Self::with_endpoint(config::get_chart_api_url())
    }

    pub fn with_endpoint(endpoint: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    async fn fetch(&self, request: &ChartDataRequest) -> Result<OhlcSeries, reqwest::Error> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("accept", "*/*")
            .header("accept-language", "en-US,en;q=0.9")
            .header("content-type", "application/json; charset=utf-8")
            .header("origin", "https://charting.nseindia.com")
            .header("user-agent", USER_AGENT)
            .json(request)
            .send()
            .await?
            .error_for_status()?;

        response.json::<OhlcSeries>().await
    }
}

impl Default for NseChartClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ChartDataProvider for NseChartClient {
    async fn get_chart_data(
        &self,
        request: &ChartDataRequest,
    ) -> Result<OhlcSeries, Box<dyn std::error::Error + Send + Sync>> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(std::time::Duration::from_millis(200))
            .with_max_times(3);
        let series = (|| self.fetch(request))
            .retry(backoff)
            .notify(|err, dur| {
                debug!(
                    symbol = %request.trading_symbol,
                    error = %err,
                    "Chart data fetch failed, retrying in {:?}",
                    dur
                );
            })
            .await
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

        debug!(
            symbol = %request.trading_symbol,
            candles = series.len(),
            "Fetched chart data"
        );
        Ok(series)
    }
}
