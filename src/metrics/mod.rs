//! Prometheus metrics registry

use prometheus::{Encoder, Gauge, Histogram, HistogramOpts, IntCounter, Opts, Registry, TextEncoder};

/// Application metrics, registered against a single registry and exported
/// through the `/metrics` endpoint.
pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: Gauge,
    pub http_request_duration_seconds: Histogram,
    pub scans_total: IntCounter,
    pub scan_symbols_total: IntCounter,
    pub scan_matches_total: IntCounter,
    pub scan_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounter::with_opts(Opts::new(
            "http_requests_total",
            "Total number of HTTP requests received",
        ))?;
        let http_requests_in_flight = Gauge::with_opts(Opts::new(
            "http_requests_in_flight",
            "Number of HTTP requests currently being served",
        ))?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let scans_total = IntCounter::with_opts(Opts::new(
            "scans_total",
            "Total number of symbol scans executed",
        ))?;
        let scan_symbols_total = IntCounter::with_opts(Opts::new(
            "scan_symbols_total",
            "Total number of symbols analyzed across scans",
        ))?;
        let scan_matches_total = IntCounter::with_opts(Opts::new(
            "scan_matches_total",
            "Total number of symbols found near a support/resistance level",
        ))?;
        let scan_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "scan_duration_seconds",
            "Full-scan latency in seconds",
        ))?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(scans_total.clone()))?;
        registry.register(Box::new(scan_symbols_total.clone()))?;
        registry.register(Box::new(scan_matches_total.clone()))?;
        registry.register(Box::new(scan_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
            scans_total,
            scan_symbols_total,
            scan_matches_total,
            scan_duration_seconds,
        })
    }

    /// Export all registered metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
