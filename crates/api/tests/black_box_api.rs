use reqwest::StatusCode;
use serde_json::Value;

use ecovision_api::app::{build_app, AppServices};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, over the bundled sample dataset, on an ephemeral port.
        let services = AppServices::in_memory().expect("sample data should load");
        let app = build_app(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let res = reqwest::get(format!("{}{}", self.base_url, path))
            .await
            .unwrap();
        let status = res.status();
        let body = res.json().await.unwrap();
        (status, body)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn approx(value: &Value, expected: f64) {
    let v = value.as_f64().unwrap_or_else(|| panic!("not a number: {value}"));
    assert!((v - expected).abs() < 1e-3, "expected {expected}, got {v}");
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn lists_locations_and_metrics() {
    let srv = TestServer::spawn().await;

    let (status, body) = srv.get("/api/v1/locations").await;
    assert_eq!(status, StatusCode::OK);
    let locations = body["data"].as_array().unwrap();
    assert_eq!(locations.len(), 3);
    assert_eq!(locations[0]["name"], "Irvine");
    assert!(locations[0]["latitude"].is_number());

    let (status, body) = srv.get("/api/v1/metrics").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["temperature", "precipitation", "humidity"]);
}

#[tokio::test]
async fn climate_without_filters_returns_everything() {
    let srv = TestServer::spawn().await;

    let (status, body) = srv.get("/api/v1/climate").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total_count"], 40);
    assert_eq!(body["meta"]["page"], 1);
    assert_eq!(body["meta"]["per_page"], 50);
    assert_eq!(body["data"].as_array().unwrap().len(), 40);

    let first = &body["data"][0];
    for key in [
        "id",
        "location_id",
        "location_name",
        "latitude",
        "longitude",
        "date",
        "metric",
        "value",
        "unit",
        "quality",
    ] {
        assert!(first.get(key).is_some(), "missing {key}");
    }
}

#[tokio::test]
async fn climate_filters_narrow_the_result() {
    let srv = TestServer::spawn().await;

    let (_, body) = srv.get("/api/v1/climate?location_id=1").await;
    assert_eq!(body["meta"]["total_count"], 16);
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["location_name"] == "Irvine"));

    let (_, body) = srv
        .get("/api/v1/climate?location_id=1&metric=temperature")
        .await;
    assert_eq!(body["meta"]["total_count"], 8);
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["metric"] == "temperature" && r["unit"] == "celsius"));

    let (_, body) = srv
        .get("/api/v1/climate?start_date=2025-02-01&end_date=2025-03-31")
        .await;
    assert_eq!(body["meta"]["total_count"], 20);
    for r in body["data"].as_array().unwrap() {
        let date = r["date"].as_str().unwrap();
        assert!(("2025-02-01"..="2025-03-31").contains(&date), "{date}");
    }

    let (_, body) = srv.get("/api/v1/climate?quality_threshold=good").await;
    assert_eq!(body["meta"]["total_count"], 29);
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["quality"] == "good" || r["quality"] == "excellent"));
}

#[tokio::test]
async fn climate_is_ordered_by_date_and_paged() {
    let srv = TestServer::spawn().await;

    let (_, body) = srv.get("/api/v1/climate?page=2&per_page=15").await;
    assert_eq!(body["meta"]["total_count"], 40);
    assert_eq!(body["meta"]["page"], 2);
    assert_eq!(body["meta"]["per_page"], 15);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 15);

    let dates: Vec<&str> = rows.iter().map(|r| r["date"].as_str().unwrap()).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);

    let (_, body) = srv.get("/api/v1/climate?page=3&per_page=15").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 10);

    let (_, body) = srv.get("/api/v1/climate?page=9").await;
    assert_eq!(body["meta"]["total_count"], 40);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn empty_query_values_are_ignored() {
    let srv = TestServer::spawn().await;
    let (status, body) = srv
        .get("/api/v1/climate?location_id=&metric=&quality_threshold=")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total_count"], 40);
}

#[tokio::test]
async fn invalid_parameters_are_rejected() {
    let srv = TestServer::spawn().await;

    for endpoint in ["climate", "summary", "trends"] {
        let (status, body) = srv
            .get(&format!("/api/v1/{endpoint}?quality_threshold=perfect"))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{endpoint}");
        assert_eq!(body["error"], "invalid_quality_threshold");
        assert!(body["message"].as_str().unwrap().contains("excellent"));
    }

    let (status, body) = srv.get("/api/v1/climate?location_id=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, body) = srv
        .get("/api/v1/climate?start_date=2025-04-01&end_date=2025-01-01")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = srv.get("/api/v1/climate?per_page=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn summary_reports_weighted_statistics() {
    let srv = TestServer::spawn().await;

    let (status, body) = srv
        .get("/api/v1/summary?location_id=1&metric=temperature")
        .await;
    assert_eq!(status, StatusCode::OK);

    let data = body["data"].as_object().unwrap();
    assert_eq!(data.len(), 1);
    let t = &data["temperature"];
    approx(&t["min"], 14.2);
    approx(&t["max"], 31.5);
    approx(&t["avg"], 18.125);
    approx(&t["weighted_avg"], 17.3145);
    assert_eq!(t["unit"], "celsius");

    let dist = &t["quality_distribution"];
    approx(&dist["excellent"], 0.5);
    approx(&dist["good"], 0.375);
    approx(&dist["questionable"], 0.125);
    approx(&dist["poor"], 0.0);
}

#[tokio::test]
async fn summary_pools_a_metric_across_locations() {
    let srv = TestServer::spawn().await;

    let (status, body) = srv.get("/api/v1/summary?metric=temperature").await;
    assert_eq!(status, StatusCode::OK);

    let data = body["data"].as_object().unwrap();
    assert_eq!(data.len(), 1);
    let t = &data["temperature"];
    approx(&t["min"], 6.1);
    approx(&t["max"], 31.5);
    approx(&t["avg"], 17.36);
    approx(&t["weighted_avg"], 17.1248);

    // The pooled series spans all three sites.
    let (_, climate) = srv.get("/api/v1/climate?metric=temperature").await;
    assert_eq!(climate["meta"]["total_count"], 20);
    let mut sites: Vec<&str> = climate["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["location_name"].as_str().unwrap())
        .collect();
    sites.sort();
    sites.dedup();
    assert_eq!(sites, ["Irvine", "Miami", "Seattle"]);

    let (status, body) = srv.get("/api/v1/trends?metric=temperature").await;
    assert_eq!(status, StatusCode::OK);
    let trends = body["data"].as_object().unwrap();
    assert_eq!(trends.len(), 1);
    assert_eq!(trends["temperature"]["trend"]["direction"], "increasing");
    approx(&trends["temperature"]["trend"]["rate"], 2.78);
}

#[tokio::test]
async fn repeated_query_keys_are_json_errors() {
    let srv = TestServer::spawn().await;

    for path in [
        "/api/v1/climate?metric=temperature&metric=humidity",
        "/api/v1/climate?page=1&page=2",
        "/api/v1/summary?location_id=1&location_id=2",
        "/api/v1/trends?metric=a&metric=b",
    ] {
        let res = reqwest::get(format!("{}{}", srv.base_url, path))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{path}");
        let content_type = res
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("application/json"), "{path}: {content_type}");

        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], "validation_error", "{path}");
        assert!(body["message"].as_str().unwrap().contains("duplicate field"), "{path}");
    }
}

#[tokio::test]
async fn oversized_per_page_is_capped() {
    let srv = TestServer::spawn().await;

    for per_page in ["5000", "99999999999"] {
        let (status, body) = srv
            .get(&format!("/api/v1/climate?per_page={per_page}"))
            .await;
        assert_eq!(status, StatusCode::OK, "{per_page}");
        assert_eq!(body["meta"]["per_page"], 1000);
        assert_eq!(body["data"].as_array().unwrap().len(), 40);
    }
}

#[tokio::test]
async fn summary_for_no_matches_is_empty() {
    let srv = TestServer::spawn().await;
    let (status, body) = srv.get("/api/v1/summary?location_id=999").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn trends_report_direction_anomalies_and_seasonality() {
    let srv = TestServer::spawn().await;

    let (status, body) = srv.get("/api/v1/trends?location_id=1").await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_object().unwrap();

    let temp = &data["temperature"];
    assert_eq!(temp["trend"]["direction"], "increasing");
    approx(&temp["trend"]["rate"], 2.22);
    approx(&temp["trend"]["confidence"], 0.23);
    assert_eq!(temp["trend"]["unit"], "celsius/month");

    let anomalies = temp["anomalies"].as_array().unwrap();
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0]["date"], "2025-03-16");
    approx(&anomalies[0]["value"], 31.5);
    approx(&anomalies[0]["deviation"], 2.53);

    // Four months of data is too short for a seasonal signal.
    assert_eq!(temp["seasonality"]["detected"], false);

    let precip = &data["precipitation"];
    assert_eq!(precip["trend"]["direction"], "decreasing");
    approx(&precip["trend"]["rate"], -3.39);
    assert!(precip["anomalies"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let srv = TestServer::spawn().await;
    let res = reqwest::Client::new()
        .get(format!("{}/api/v1/locations", srv.base_url))
        .header("Origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
