use crate::api::error::ApiError;
use crate::state::{
    Alert, CameraFeed, Furnace, Hotspot, Kpi, PlantStore, Prediction, ProductionMetric, Sensor,
    StatsSnapshot,
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Shared state for the query API
pub struct QueryAppState {
    pub store: Arc<PlantStore>,
}

/// Query parameters for production metrics
#[derive(Deserialize)]
pub struct MetricsQueryParams {
    /// Time range hint (e.g. "24h"); accepted but not applied
    pub range: Option<String>,
}

/// Create query API router
pub fn create_query_router(state: Arc<QueryAppState>) -> Router {
    Router::new()
        .route("/api/furnaces", get(list_furnaces))
        .route("/api/furnaces/:id", get(get_furnace))
        .route("/api/sensors", get(list_sensors))
        .route("/api/sensors/:id", get(get_sensor))
        .route("/api/alerts", get(list_alerts))
        .route("/api/alerts/:id/acknowledge", post(acknowledge_alert))
        .route("/api/production-metrics", get(production_metrics))
        .route("/api/predictions", get(list_predictions))
        .route("/api/cameras", get(list_cameras))
        .route("/api/kpis", get(list_kpis))
        .route("/api/hotspots", get(list_hotspots))
        .route("/api/status", get(status))
        .with_state(state)
}

/// GET /api/furnaces
async fn list_furnaces(State(state): State<Arc<QueryAppState>>) -> Json<Vec<Furnace>> {
    Json(state.store.get_furnaces())
}

/// GET /api/furnaces/:id
async fn get_furnace(
    State(state): State<Arc<QueryAppState>>,
    Path(id): Path<String>,
) -> Result<Json<Furnace>, ApiError> {
    state
        .store
        .get_furnace(&id)
        .map(Json)
        .ok_or(ApiError::NotFound("Furnace not found"))
}

/// GET /api/sensors
async fn list_sensors(State(state): State<Arc<QueryAppState>>) -> Json<Vec<Sensor>> {
    Json(state.store.get_sensors())
}

/// GET /api/sensors/:id
async fn get_sensor(
    State(state): State<Arc<QueryAppState>>,
    Path(id): Path<String>,
) -> Result<Json<Sensor>, ApiError> {
    state
        .store
        .get_sensor(&id)
        .map(Json)
        .ok_or(ApiError::NotFound("Sensor not found"))
}

/// GET /api/alerts
async fn list_alerts(State(state): State<Arc<QueryAppState>>) -> Json<Vec<Alert>> {
    Json(state.store.get_alerts())
}

/// POST /api/alerts/:id/acknowledge
///
/// Unknown alert ids answer 404. Repeat acknowledgements return the alert
/// unchanged.
async fn acknowledge_alert(
    State(state): State<Arc<QueryAppState>>,
    Path(id): Path<String>,
) -> Result<Json<Alert>, ApiError> {
    let alert = state.store.acknowledge_alert(&id)?;
    info!(alert_id = %id, "Alert acknowledged");
    Ok(Json(alert))
}

/// GET /api/production-metrics?range=
async fn production_metrics(
    State(state): State<Arc<QueryAppState>>,
    Query(params): Query<MetricsQueryParams>,
) -> Json<Vec<ProductionMetric>> {
    let range = params.range.as_deref().unwrap_or("24h");
    Json(state.store.get_production_metrics(range))
}

/// GET /api/predictions
async fn list_predictions(State(state): State<Arc<QueryAppState>>) -> Json<Vec<Prediction>> {
    Json(state.store.get_predictions())
}

/// GET /api/cameras
async fn list_cameras(State(state): State<Arc<QueryAppState>>) -> Json<Vec<CameraFeed>> {
    Json(state.store.get_cameras())
}

/// GET /api/kpis
async fn list_kpis(State(state): State<Arc<QueryAppState>>) -> Json<Vec<Kpi>> {
    Json(state.store.kpis())
}

/// GET /api/hotspots
async fn list_hotspots(State(state): State<Arc<QueryAppState>>) -> Json<Vec<Hotspot>> {
    Json(state.store.get_hotspots())
}

/// GET /api/status - runtime counters
async fn status(State(state): State<Arc<QueryAppState>>) -> Json<StatsSnapshot> {
    Json(state.store.stats.get_snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HistoryConfig;
    use crate::state::{NewAlert, Severity};

    fn create_test_state() -> Arc<QueryAppState> {
        Arc::new(QueryAppState {
            store: Arc::new(PlantStore::seeded(&HistoryConfig::default())),
        })
    }

    #[tokio::test]
    async fn test_get_furnace_found() {
        let state = create_test_state();

        let result = get_furnace(State(state), Path("F2".to_string())).await.unwrap();
        assert_eq!(result.0.name, "Blast Furnace 2");
    }

    #[tokio::test]
    async fn test_get_furnace_missing() {
        let state = create_test_state();

        let result = get_furnace(State(state), Path("F99".to_string())).await;
        assert_eq!(result.unwrap_err(), ApiError::NotFound("Furnace not found"));
    }

    #[tokio::test]
    async fn test_get_sensor_missing() {
        let state = create_test_state();

        let result = get_sensor(State(state), Path("Z000".to_string())).await;
        assert_eq!(result.unwrap_err(), ApiError::NotFound("Sensor not found"));
    }

    #[tokio::test]
    async fn test_acknowledge_twice() {
        let state = create_test_state();
        let alert = state.store.append_alert(NewAlert {
            severity: Severity::Warning,
            title: "Tank Level High".to_string(),
            message: "Tank Level 2 at 92%".to_string(),
            source: "Sensor Network".to_string(),
            furnace_id: None,
            sensor_id: Some("L002".to_string()),
        });

        let first = acknowledge_alert(State(Arc::clone(&state)), Path(alert.id.clone()))
            .await
            .unwrap();
        let second = acknowledge_alert(State(state), Path(alert.id.clone()))
            .await
            .unwrap();

        assert!(first.0.acknowledged);
        assert!(second.0.acknowledged);
    }

    #[tokio::test]
    async fn test_acknowledge_missing_alert() {
        let state = create_test_state();

        let result = acknowledge_alert(State(state), Path("nope".to_string())).await;
        assert_eq!(result.unwrap_err(), ApiError::NotFound("Alert not found"));
    }

    #[tokio::test]
    async fn test_production_metrics_default_range() {
        let state = create_test_state();

        let params = MetricsQueryParams { range: None };
        let result = production_metrics(State(state), Query(params)).await;
        assert!(result.0.is_empty());
    }
}
