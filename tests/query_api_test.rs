// Integration tests for the REST read endpoints and alert acknowledgement

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use steelpulse::api::create_app;
use steelpulse::config::HistoryConfig;
use steelpulse::state::{NewAlert, PlantStore, ProductionMetric, Severity};
use steelpulse::subscription::BroadcastHub;
use tower::ServiceExt;

fn create_test_app() -> (Router, Arc<PlantStore>) {
    let store = Arc::new(PlantStore::seeded(&HistoryConfig::default()));
    let hub = Arc::new(BroadcastHub::new(Arc::clone(&store), Duration::from_millis(2000)));
    (create_app(Arc::clone(&store), hub), store)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn sample_alert(store: &PlantStore) -> String {
    store
        .append_alert(NewAlert {
            severity: Severity::Critical,
            title: "High Vibration Detected".to_string(),
            message: "Motor 2 Vib vibration at 4.9 mm/s".to_string(),
            source: "Sensor Network".to_string(),
            furnace_id: None,
            sensor_id: Some("V002".to_string()),
        })
        .id
}

// ── Collections ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_endpoints_return_collections() {
    let cases = [
        ("/api/furnaces", 6),
        ("/api/sensors", 18),
        ("/api/kpis", 4),
        ("/api/cameras", 6),
        ("/api/hotspots", 3),
        ("/api/predictions", 3),
        ("/api/alerts", 0),
        ("/api/production-metrics", 0),
    ];

    for (uri, expected) in cases {
        let (app, _) = create_test_app();
        let response = app.oneshot(get_request(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);

        let json = json_body(response).await;
        assert_eq!(json.as_array().unwrap().len(), expected, "{}", uri);
    }
}

#[tokio::test]
async fn test_get_furnace_by_id() {
    let (app, _) = create_test_app();

    let response = app.oneshot(get_request("/api/furnaces/F1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["id"], "F1");
    assert_eq!(json["name"], "Blast Furnace 1");
    assert_eq!(json["composition"]["iron"], 94.5);
}

#[tokio::test]
async fn test_get_missing_furnace_returns_404() {
    let (app, _) = create_test_app();

    let response = app.oneshot(get_request("/api/furnaces/F99")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = json_body(response).await;
    assert_eq!(json, serde_json::json!({ "error": "Furnace not found" }));
}

#[tokio::test]
async fn test_get_missing_sensor_returns_404() {
    let (app, _) = create_test_app();

    let response = app.oneshot(get_request("/api/sensors/Q123")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = json_body(response).await;
    assert_eq!(json["error"], "Sensor not found");
}

#[tokio::test]
async fn test_get_sensor_by_id() {
    let (app, _) = create_test_app();

    let response = app.oneshot(get_request("/api/sensors/V002")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["type"], "vibration");
    assert_eq!(json["unit"], "mm/s");
}

// ── Production metrics ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_production_metrics_ignore_range() {
    let (app, store) = create_test_app();
    for i in 0..40 {
        store.append_metric(ProductionMetric {
            timestamp: chrono::Utc::now(),
            throughput: i as f64,
            defect_rate: 3.1,
            energy_consumption: 4.4,
            oee: 89.0,
            quality: 94.0,
        });
    }

    let short = json_body(
        app.clone()
            .oneshot(get_request("/api/production-metrics?range=1h"))
            .await
            .unwrap(),
    )
    .await;
    let long = json_body(
        app.oneshot(get_request("/api/production-metrics?range=30d"))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(short.as_array().unwrap().len(), 24);
    assert_eq!(short, long);
    assert_eq!(short[23]["throughput"], 39.0);
    assert!(short[0].get("defectRate").is_some());
}

// ── Acknowledgement ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_acknowledge_alert() {
    let (app, store) = create_test_app();
    let id = sample_alert(&store);

    let response = app
        .oneshot(post_request(&format!("/api/alerts/{}/acknowledge", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["id"], id.as_str());
    assert_eq!(json["acknowledged"], true);
    assert_eq!(json["sensorId"], "V002");
    assert!(store.get_alert(&id).unwrap().acknowledged);
}

#[tokio::test]
async fn test_second_acknowledge_succeeds() {
    let (app, store) = create_test_app();
    let id = sample_alert(&store);
    let uri = format!("/api/alerts/{}/acknowledge", id);

    let first = app.clone().oneshot(post_request(&uri)).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.oneshot(post_request(&uri)).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(json_body(second).await["acknowledged"], true);
}

#[tokio::test]
async fn test_acknowledge_missing_alert_returns_404() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(post_request("/api/alerts/does-not-exist/acknowledge"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "Alert not found");
}

#[tokio::test]
async fn test_acknowledge_requires_post() {
    let (app, store) = create_test_app();
    let id = sample_alert(&store);

    let response = app
        .oneshot(get_request(&format!("/api/alerts/{}/acknowledge", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(!store.get_alert(&id).unwrap().acknowledged);
}

// ── Status ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_status_reports_counters() {
    let (app, store) = create_test_app();
    store.stats.record_tick();

    let response = app.oneshot(get_request("/api/status")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["ticksCompleted"], 1);
    assert_eq!(json["websocketConnections"], 0);
}

#[tokio::test]
async fn test_cors_headers_present() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/kpis")
                .header("Origin", "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}
