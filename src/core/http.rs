//! HTTP endpoint server using Axum

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use crate::config;
use crate::levels::{EngineConfig, SupportResistanceEngine};
use crate::metrics::Metrics;
use crate::models::levels::{SrCheckResult, SrLevel, TradeInfo};
use crate::models::ohlc::OhlcSeries;
use crate::models::scan::{ChartPeriod, ScanMatch};
use crate::services::chart_data::{ChartDataProvider, ChartDataRequest, NseChartClient};
use crate::services::scanner::{scan_symbols, ScanConfig};

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub chart_provider: Arc<dyn ChartDataProvider + Send + Sync>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "tradelens-level-engine"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    state.metrics.http_requests_in_flight.dec();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// Engine tuning overrides accepted on level-computation requests.
/// Omitted fields fall back to the engine defaults.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EngineConfigOverrides {
    pivot_period: Option<usize>,
    loopback_period: Option<usize>,
    channel_width_percent: Option<f64>,
    min_strength: Option<u32>,
    max_levels: Option<usize>,
}

impl EngineConfigOverrides {
    fn into_config(self) -> EngineConfig {
        let defaults = EngineConfig::default();
        EngineConfig {
            pivot_period: self.pivot_period.unwrap_or(defaults.pivot_period),
            loopback_period: self.loopback_period.unwrap_or(defaults.loopback_period),
            channel_width_percent: self
                .channel_width_percent
                .unwrap_or(defaults.channel_width_percent),
            min_strength: self.min_strength.unwrap_or(defaults.min_strength),
            max_levels: self.max_levels.unwrap_or(defaults.max_levels),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LevelsRequest {
    series: OhlcSeries,
    current_price: Option<f64>,
    #[serde(default)]
    config: Option<EngineConfigOverrides>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LevelsResponse {
    current_price: f64,
    levels: Vec<SrLevel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckRequest {
    series: OhlcSeries,
    current_price: Option<f64>,
    threshold: Option<f64>,
    #[serde(default)]
    config: Option<EngineConfigOverrides>,
}

const DEFAULT_CHECK_THRESHOLD: f64 = 0.02;

/// Compute support/resistance levels from a posted series.
///
/// An empty or inconsistent series yields an empty level list; 422 only
/// when no reference price can be derived at all.
async fn compute_levels(
    Json(request): Json<LevelsRequest>,
) -> Result<Json<LevelsResponse>, StatusCode> {
    let config = request.config.unwrap_or_default().into_config();
    let engine = SupportResistanceEngine::new(&request.series, request.current_price, config)
        .map_err(|e| {
            error!(error = %e, "Cannot derive reference price");
            StatusCode::UNPROCESSABLE_ENTITY
        })?;

    Ok(Json(LevelsResponse {
        current_price: engine.reference_price(),
        levels: engine.calculate_levels(),
    }))
}

/// Classify the reference price against the computed levels.
async fn check_levels(
    Json(request): Json<CheckRequest>,
) -> Result<Json<SrCheckResult>, StatusCode> {
    let config = request.config.unwrap_or_default().into_config();
    let engine = SupportResistanceEngine::new(&request.series, request.current_price, config)
        .map_err(|e| {
            error!(error = %e, "Cannot derive reference price");
            StatusCode::UNPROCESSABLE_ENTITY
        })?;

    let threshold = request.threshold.unwrap_or(DEFAULT_CHECK_THRESHOLD);
    let levels = engine.calculate_levels();
    Ok(Json(engine.check_near_support_or_resistance(threshold, &levels)))
}

/// Derive the stop-loss/target suggestion for a posted series.
async fn trade_info(Json(request): Json<LevelsRequest>) -> Result<Json<TradeInfo>, StatusCode> {
    let config = request.config.unwrap_or_default().into_config();
    let engine = SupportResistanceEngine::new(&request.series, request.current_price, config)
        .map_err(|e| {
            error!(error = %e, "Cannot derive reference price");
            StatusCode::UNPROCESSABLE_ENTITY
        })?;

    Ok(Json(engine.calculate_trade_info()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StockLevelsQuery {
    chart_period: Option<ChartPeriod>,
    interval: Option<u32>,
    threshold: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StockLevelsResponse {
    symbol: String,
    current_price: f64,
    levels: Vec<SrLevel>,
    check: SrCheckResult,
    trade_info: TradeInfo,
}

/// Fetch chart data for an equity symbol and run the full analysis.
async fn stock_levels(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<StockLevelsQuery>,
) -> Result<Json<StockLevelsResponse>, StatusCode> {
    let request = ChartDataRequest::for_equity(
        &symbol,
        query.chart_period.unwrap_or_default(),
        query.interval.unwrap_or(1),
    );

    let series = state
        .chart_provider
        .get_chart_data(&request)
        .await
        .map_err(|e| {
            error!(symbol = %symbol, error = %e, "Failed to fetch chart data");
            StatusCode::BAD_GATEWAY
        })?;

    if series.is_empty() {
        return Err(StatusCode::NOT_FOUND);
    }

    let engine =
        SupportResistanceEngine::with_defaults(&series, None).map_err(|e| {
            error!(symbol = %symbol, error = %e, "Cannot derive reference price");
            StatusCode::UNPROCESSABLE_ENTITY
        })?;

    let levels = engine.calculate_levels();
    let check = engine.check_near_support_or_resistance(
        query.threshold.unwrap_or(DEFAULT_CHECK_THRESHOLD),
        &levels,
    );
    let trade_info = engine.calculate_trade_info();

    Ok(Json(StockLevelsResponse {
        symbol,
        current_price: engine.reference_price(),
        levels,
        check,
        trade_info,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScanRequest {
    symbols: Option<Vec<String>>,
    batch_size: Option<usize>,
    threshold: Option<f64>,
    chart_period: Option<ChartPeriod>,
    interval: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanResponse {
    matches: Vec<ScanMatch>,
}

/// Run an on-demand scan over the requested (or configured) universe.
async fn run_scan(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> Result<Json<ScanResponse>, StatusCode> {
    let symbols = match request.symbols {
        Some(symbols) if !symbols.is_empty() => symbols,
        _ => config::get_scan_symbols(),
    };

    let defaults = ScanConfig::default();
    let scan_config = ScanConfig {
        batch_size: request.batch_size.unwrap_or(defaults.batch_size),
        threshold: request.threshold.unwrap_or(defaults.threshold),
        chart_period: request.chart_period.unwrap_or(defaults.chart_period),
        interval: request.interval.unwrap_or(defaults.interval),
        inter_batch_delay_ms: defaults.inter_batch_delay_ms,
    };

    let start = Instant::now();
    let matches = scan_symbols(state.chart_provider.as_ref(), &symbols, &scan_config).await;

    state.metrics.scans_total.inc();
    state.metrics.scan_symbols_total.inc_by(symbols.len() as u64);
    state.metrics.scan_matches_total.inc_by(matches.len() as u64);
    state
        .metrics
        .scan_duration_seconds
        .observe(start.elapsed().as_secs_f64());

    Ok(Json(ScanResponse { matches }))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/levels", post(compute_levels))
        .route("/api/levels/check", post(check_levels))
        .route("/api/trade-info", post(trade_info))
        .route("/api/stocks/{symbol}/levels", get(stock_levels))
        .route("/api/scan", post(run_scan))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let start_time = Arc::new(Instant::now());
    let chart_provider: Arc<dyn ChartDataProvider + Send + Sync> =
        Arc::new(NseChartClient::new());

    let state = AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics: metrics.clone(),
        start_time: start_time.clone(),
        chart_provider,
    };
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
