//! Integration tests for the API Server
//!
//! Tests HTTP endpoints, health checks, metrics, and level computation.


use serde_json::{json, Value};

use test_utils::{oscillating_series, TestApiServer};

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "tradelens-level-engine");
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    assert!(
        body.contains("http_requests_total"),
        "Expected http_requests_total metric"
    );
    assert!(
        body.contains("http_request_duration_seconds"),
        "Expected http_request_duration_seconds metric"
    );
    assert!(
        body.contains("http_requests_in_flight"),
        "Expected http_requests_in_flight metric"
    );
}

#[tokio::test]
async fn levels_endpoint_computes_channels() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/levels")
        .json(&json!({ "series": oscillating_series(300) }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["currentPrice"], 96.0);
    let levels = body["levels"].as_array().expect("levels array");
    assert!(!levels.is_empty());
    assert!(levels.len() <= 9);
    for level in levels {
        assert!(level["type"] == "R" || level["type"] == "S");
        assert!(level["UB"].as_f64().unwrap() >= level["LB"].as_f64().unwrap());
    }
}

#[tokio::test]
async fn levels_endpoint_accepts_config_overrides() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/levels")
        .json(&json!({
            "series": oscillating_series(300),
            "config": { "maxLevels": 1 }
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert!(body["levels"].as_array().unwrap().len() <= 1);
}

#[tokio::test]
async fn empty_series_with_explicit_price_yields_empty_levels() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/levels")
        .json(&json!({
            "series": { "t": [], "o": [], "h": [], "l": [], "c": [], "v": [] },
            "currentPrice": 100.0
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["levels"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn empty_series_without_price_is_unprocessable() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/trade-info")
        .json(&json!({
            "series": { "t": [], "o": [], "h": [], "l": [], "c": [], "v": [] }
        }))
        .await;
    assert_eq!(response.status_code(), 422);
}

#[tokio::test]
async fn check_endpoint_flags_price_near_resistance() {
    // Series ends on the 105 peak, 0.48% under the 105.5 resistance.
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/levels/check")
        .json(&json!({
            "series": oscillating_series(291),
            "threshold": 0.005
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["isNear"], true);
    assert_eq!(body["nearestLevel"]["type"], "R");
    assert!(body["distancePercentage"].as_f64().unwrap() < 0.5);
}

#[tokio::test]
async fn trade_info_endpoint_returns_fallback_for_flat_series() {
    let app = TestApiServer::new().await;
    let flat = vec![100.0; 10];
    let response = app
        .server
        .post("/api/trade-info")
        .json(&json!({
            "series": {
                "t": (0..10).collect::<Vec<i64>>(),
                "o": flat.clone(), "h": flat.clone(), "l": flat.clone(), "c": flat,
                "v": vec![0.0; 10]
            }
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert!((body["stopLoss"].as_f64().unwrap() - 98.0).abs() < 1e-9);
    assert!((body["idealTarget"].as_f64().unwrap() - 104.0).abs() < 1e-9);
    assert!((body["riskRewardRatio"].as_f64().unwrap() - 2.0).abs() < 1e-9);
}

#[tokio::test]
async fn stock_levels_endpoint_fetches_and_analyzes() {
    let app = TestApiServer::new().await;
    app.mock_chart_data(&oscillating_series(300)).await;

    let response = app.server.get("/api/stocks/RELIANCE/levels").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["symbol"], "RELIANCE");
    assert_eq!(body["currentPrice"], 96.0);
    assert!(!body["levels"].as_array().unwrap().is_empty());
    assert!(body["tradeInfo"]["stopLoss"].as_f64().is_some());

    // The upstream request targets the equity segment.
    let requests = app
        .chart_mock
        .received_requests()
        .await
        .expect("wiremock requests");
    assert!(requests.iter().any(|req| {
        String::from_utf8_lossy(&req.body).contains("RELIANCE-EQ")
    }));
}

#[tokio::test]
async fn stock_levels_endpoint_maps_upstream_failure_to_bad_gateway() {
    let app = TestApiServer::new().await;
    app.mock_chart_failure().await;

    let response = app.server.get("/api/stocks/RELIANCE/levels").await;
    assert_eq!(response.status_code(), 502);
}

#[tokio::test]
async fn scan_endpoint_reports_matches() {
    let app = TestApiServer::new().await;
    app.mock_chart_data(&oscillating_series(291)).await;

    let response = app
        .server
        .post("/api/scan")
        .json(&json!({
            "symbols": ["RELIANCE", "TCS"],
            "threshold": 0.005
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    let matches = body["matches"].as_array().expect("matches array");
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0]["currentPrice"], 105.0);
}

#[tokio::test]
async fn scan_metrics_are_recorded() {
    let app = TestApiServer::new().await;
    app.mock_chart_data(&oscillating_series(291)).await;

    let _ = app
        .server
        .post("/api/scan")
        .json(&json!({ "symbols": ["RELIANCE"] }))
        .await;

    let response = app.server.get("/metrics").await;
    let body = response.text();
    assert!(body.contains("scans_total"), "Expected scans_total metric");
    assert!(
        body.contains("scan_symbols_total"),
        "Expected scan_symbols_total metric"
    );
}
