//! Integration tests for the NSE chart-data client against a mocked
//! charting endpoint.

use tradelens::models::ohlc::OhlcSeries;
use tradelens::models::scan::ChartPeriod;
use tradelens::services::chart_data::{ChartDataProvider, ChartDataRequest, NseChartClient};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_series() -> OhlcSeries {
    OhlcSeries {
        t: vec![1, 2, 3],
        o: vec![100.0, 101.0, 102.0],
        h: vec![100.5, 101.5, 102.5],
        l: vec![99.5, 100.5, 101.5],
        c: vec![100.2, 101.2, 102.2],
        v: vec![1000.0, 1100.0, 1200.0],
    }
}

fn client_for(mock: &MockServer) -> NseChartClient {
    NseChartClient::with_endpoint(format!("{}/Charts/ChartData/", mock.uri()))
}

#[tokio::test]
async fn fetches_and_decodes_chart_data() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Charts/ChartData/"))
        .and(body_string_contains("RELIANCE-EQ"))
        .and(body_string_contains("chartPeriod"))
        .and(header("content-type", "application/json; charset=utf-8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_series()))
        .mount(&mock)
        .await;

    let client = client_for(&mock);
    let request = ChartDataRequest::for_equity("RELIANCE", ChartPeriod::Daily, 1);
    let series = client.get_chart_data(&request).await.expect("chart data");

    assert_eq!(series.len(), 3);
    assert_eq!(series.last_close(), Some(102.2));
}

#[tokio::test]
async fn retries_transient_server_errors() {
    let mock = MockServer::start().await;
    // First attempt fails, the retry succeeds.
    Mock::given(method("POST"))
        .and(path("/Charts/ChartData/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock)
        .await;
    Mock::given(method("POST"))
        .and(path("/Charts/ChartData/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_series()))
        .mount(&mock)
        .await;

    let client = client_for(&mock);
    let request = ChartDataRequest::for_equity("TCS", ChartPeriod::Daily, 1);
    let series = client.get_chart_data(&request).await.expect("chart data");
    assert_eq!(series.len(), 3);
}

#[tokio::test]
async fn gives_up_after_exhausting_retries() {
    let mock = MockServer::start().await;
    // Initial attempt plus three retries.
    Mock::given(method("POST"))
        .and(path("/Charts/ChartData/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&mock)
        .await;

    let client = client_for(&mock);
    let request = ChartDataRequest::for_equity("INFY", ChartPeriod::Daily, 1);
    assert!(client.get_chart_data(&request).await.is_err());
}
