use crate::config::HistoryConfig;
use crate::state::entity::*;
use crate::state::error::StoreError;
use crate::state::history::MetricsHistory;
use crate::state::metrics::RuntimeStats;
use crate::state::seed;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};
use uuid::Uuid;

/// Relative change below which a sensor reading counts as stable
const SENSOR_TREND_DEADBAND: f64 = 0.005;

/// KPI change (percent) below which a KPI counts as stable
const KPI_TREND_DEADBAND: f64 = 0.1;

/// Vibration levels (mm/s) that drive vibration sensor status
pub const VIBRATION_WARNING_LEVEL: f64 = 3.5;
pub const VIBRATION_CRITICAL_LEVEL: f64 = 4.5;

/// In-memory plant state
///
/// Sole owner of every entity collection. Each mutator is atomic on its own
/// entity; the tick gate additionally keeps snapshots from observing a tick
/// half-applied.
pub struct PlantStore {
    furnaces: DashMap<String, Furnace>,
    sensors: DashMap<String, Sensor>,
    alerts: DashMap<String, Alert>,
    cameras: DashMap<String, CameraFeed>,
    predictions: DashMap<String, Prediction>,

    /// Ordered as seeded, label is the key
    kpis: RwLock<Vec<Kpi>>,

    /// Reference data for the digital twin view
    hotspots: Vec<Hotspot>,

    metrics_history: RwLock<MetricsHistory>,

    /// Number of samples returned by `get_production_metrics`
    query_tail: usize,

    tick_gate: RwLock<()>,

    /// Runtime counters
    pub stats: RuntimeStats,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl PlantStore {
    /// Create an empty store
    pub fn new(history: &HistoryConfig) -> Self {
        Self {
            furnaces: DashMap::new(),
            sensors: DashMap::new(),
            alerts: DashMap::new(),
            cameras: DashMap::new(),
            predictions: DashMap::new(),
            kpis: RwLock::new(Vec::new()),
            hotspots: Vec::new(),
            metrics_history: RwLock::new(MetricsHistory::new(history.capacity, history.retain)),
            query_tail: history.query_tail,
            tick_gate: RwLock::new(()),
            stats: RuntimeStats::new(),
        }
    }

    /// Create a store loaded with the fixed plant layout
    pub fn seeded(history: &HistoryConfig) -> Self {
        let now = Utc::now();
        let mut store = Self::new(history);

        for furnace in seed::furnaces(now) {
            store.furnaces.insert(furnace.id.clone(), furnace);
        }
        for sensor in seed::sensors(now) {
            store.sensors.insert(sensor.id.clone(), sensor);
        }
        for camera in seed::cameras(now) {
            store.cameras.insert(camera.id.clone(), camera);
        }
        for prediction in seed::predictions(now) {
            store.predictions.insert(prediction.id.clone(), prediction);
        }
        store.kpis = RwLock::new(seed::kpis());
        store.hotspots = seed::hotspots();

        info!(
            furnaces = store.furnaces.len(),
            sensors = store.sensors.len(),
            cameras = store.cameras.len(),
            kpis = store.kpis().len(),
            "Plant state seeded"
        );

        store
    }

    /// Hold the tick gate for the duration of one simulation tick
    ///
    /// `snapshot` blocks its (async) caller's worker thread while the gate
    /// is held, so a tick must stay synchronous and short: never hold the
    /// returned guard across an `.await`.
    pub fn begin_tick(&self) -> RwLockWriteGuard<'_, ()> {
        write(&self.tick_gate)
    }

    // ── Furnaces ────────────────────────────────────────────────────────────

    /// Get all furnaces, ordered by id
    pub fn get_furnaces(&self) -> Vec<Furnace> {
        let mut furnaces: Vec<Furnace> = self.furnaces.iter().map(|f| f.value().clone()).collect();
        furnaces.sort_by(|a, b| a.id.cmp(&b.id));
        furnaces
    }

    pub fn get_furnace(&self, id: &str) -> Option<Furnace> {
        self.furnaces.get(id).map(|f| f.clone())
    }

    /// Apply new process values to a furnace
    ///
    /// Negative values are clamped to zero.
    pub fn update_furnace(&self, id: &str, reading: FurnaceReading) -> Result<Furnace, StoreError> {
        let mut furnace = self
            .furnaces
            .get_mut(id)
            .ok_or_else(|| StoreError::FurnaceNotFound(id.to_string()))?;

        furnace.temperature = reading.temperature.max(0.0);
        furnace.pressure = reading.pressure.max(0.0);
        furnace.production_rate = reading.production_rate.max(0.0);
        furnace.energy_consumption = reading.energy_consumption.max(0.0);
        furnace.last_updated = Utc::now();

        Ok(furnace.clone())
    }

    /// Change a furnace's operating status
    pub fn set_furnace_status(&self, id: &str, status: FurnaceStatus) -> Result<Furnace, StoreError> {
        let mut furnace = self
            .furnaces
            .get_mut(id)
            .ok_or_else(|| StoreError::FurnaceNotFound(id.to_string()))?;

        furnace.status = status;
        furnace.last_updated = Utc::now();

        Ok(furnace.clone())
    }

    // ── Sensors ─────────────────────────────────────────────────────────────

    /// Get all sensors, ordered by id
    pub fn get_sensors(&self) -> Vec<Sensor> {
        let mut sensors: Vec<Sensor> = self.sensors.iter().map(|s| s.value().clone()).collect();
        sensors.sort_by(|a, b| a.id.cmp(&b.id));
        sensors
    }

    pub fn get_sensor(&self, id: &str) -> Option<Sensor> {
        self.sensors.get(id).map(|s| s.clone())
    }

    /// Record a new sensor value
    ///
    /// Derives the trend from the change and, for vibration sensors, the
    /// status from the vibration bands.
    pub fn update_sensor_value(&self, id: &str, value: f64) -> Result<Sensor, StoreError> {
        let mut sensor = self
            .sensors
            .get_mut(id)
            .ok_or_else(|| StoreError::SensorNotFound(id.to_string()))?;

        let value = value.max(0.0);
        sensor.trend = sensor_trend(sensor.value, value);
        sensor.value = value;

        if sensor.sensor_type == SensorType::Vibration && sensor.status != SensorStatus::Offline {
            sensor.status = vibration_status(value);
        }

        sensor.last_updated = Utc::now();

        Ok(sensor.clone())
    }

    /// Change a sensor's status (e.g. take it offline)
    pub fn set_sensor_status(&self, id: &str, status: SensorStatus) -> Result<Sensor, StoreError> {
        let mut sensor = self
            .sensors
            .get_mut(id)
            .ok_or_else(|| StoreError::SensorNotFound(id.to_string()))?;

        sensor.status = status;
        sensor.last_updated = Utc::now();

        Ok(sensor.clone())
    }

    // ── Alerts ──────────────────────────────────────────────────────────────

    /// Get all alerts in creation order
    pub fn get_alerts(&self) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = self.alerts.iter().map(|a| a.value().clone()).collect();
        // v7 ids sort by creation time
        alerts.sort_by(|a, b| a.id.cmp(&b.id));
        alerts
    }

    pub fn get_alert(&self, id: &str) -> Option<Alert> {
        self.alerts.get(id).map(|a| a.clone())
    }

    pub fn alert_count(&self) -> usize {
        self.alerts.len()
    }

    /// Store a new alert with a generated id
    pub fn append_alert(&self, new: NewAlert) -> Alert {
        let alert = Alert {
            id: Uuid::now_v7().to_string(),
            severity: new.severity,
            title: new.title,
            message: new.message,
            source: new.source,
            timestamp: Utc::now(),
            acknowledged: false,
            furnace_id: new.furnace_id,
            sensor_id: new.sensor_id,
        };

        self.alerts.insert(alert.id.clone(), alert.clone());
        alert
    }

    /// Mark an alert acknowledged
    ///
    /// Acknowledging an already acknowledged alert succeeds unchanged.
    pub fn acknowledge_alert(&self, id: &str) -> Result<Alert, StoreError> {
        let mut alert = self
            .alerts
            .get_mut(id)
            .ok_or_else(|| StoreError::AlertNotFound(id.to_string()))?;

        alert.acknowledged = true;

        Ok(alert.clone())
    }

    // ── Production metrics ──────────────────────────────────────────────────

    pub fn append_metric(&self, metric: ProductionMetric) {
        write(&self.metrics_history).push(metric);
    }

    /// Newest production metrics, oldest first
    ///
    /// The range hint (e.g. "24h") is accepted for API compatibility only;
    /// the newest `query_tail` samples are always returned.
    pub fn get_production_metrics(&self, _range: &str) -> Vec<ProductionMetric> {
        read(&self.metrics_history).tail(self.query_tail)
    }

    pub fn metrics_len(&self) -> usize {
        read(&self.metrics_history).len()
    }

    // ── KPIs ────────────────────────────────────────────────────────────────

    pub fn kpis(&self) -> Vec<Kpi> {
        read(&self.kpis).clone()
    }

    /// Set a KPI's value and change (percent)
    pub fn update_kpi(&self, label: &str, value: f64, change: f64) -> Result<Kpi, StoreError> {
        let mut kpis = write(&self.kpis);
        let kpi = kpis
            .iter_mut()
            .find(|k| k.label == label)
            .ok_or_else(|| StoreError::KpiNotFound(label.to_string()))?;

        kpi.value = value.max(0.0);
        kpi.change = change;
        kpi.trend = if change.abs() < KPI_TREND_DEADBAND {
            Trend::Stable
        } else if change > 0.0 {
            Trend::Up
        } else {
            Trend::Down
        };

        Ok(kpi.clone())
    }

    // ── Cameras ─────────────────────────────────────────────────────────────

    /// Get all camera feeds, ordered by id
    pub fn get_cameras(&self) -> Vec<CameraFeed> {
        let mut cameras: Vec<CameraFeed> = self.cameras.iter().map(|c| c.value().clone()).collect();
        cameras.sort_by(|a, b| a.id.cmp(&b.id));
        cameras
    }

    /// Replace a camera's detections and recount defects
    pub fn update_camera_detections(
        &self,
        id: &str,
        detections: Vec<Detection>,
    ) -> Result<CameraFeed, StoreError> {
        let mut camera = self
            .cameras
            .get_mut(id)
            .ok_or_else(|| StoreError::CameraNotFound(id.to_string()))?;

        camera.defect_count = detections.len();
        camera.detections = detections;
        camera.last_update = Utc::now();

        Ok(camera.clone())
    }

    // ── Predictions ─────────────────────────────────────────────────────────

    /// Get all predictions, newest first
    pub fn get_predictions(&self) -> Vec<Prediction> {
        let mut predictions: Vec<Prediction> =
            self.predictions.iter().map(|p| p.value().clone()).collect();
        predictions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));
        predictions
    }

    pub fn create_prediction(&self, new: NewPrediction) -> Prediction {
        if !(0.0..=1.0).contains(&new.confidence) {
            warn!(confidence = new.confidence, "Prediction confidence outside [0, 1], clamping");
        }

        let prediction = Prediction {
            id: Uuid::now_v7().to_string(),
            prediction_type: new.prediction_type,
            title: new.title,
            description: new.description,
            confidence: new.confidence.clamp(0.0, 1.0),
            impact: new.impact,
            recommendation: new.recommendation,
            timestamp: Utc::now(),
        };

        self.predictions.insert(prediction.id.clone(), prediction.clone());
        prediction
    }

    // ── Hotspots ────────────────────────────────────────────────────────────

    pub fn get_hotspots(&self) -> Vec<Hotspot> {
        self.hotspots.clone()
    }

    // ── Snapshots ───────────────────────────────────────────────────────────

    /// Consistent furnaces/sensors/KPIs view for subscribers
    ///
    /// Blocks while a tick is in progress.
    pub fn snapshot(&self) -> PlantSnapshot {
        let _gate = read(&self.tick_gate);

        PlantSnapshot {
            furnaces: self.get_furnaces(),
            sensors: self.get_sensors(),
            kpis: self.kpis(),
            timestamp: Utc::now(),
        }
    }
}

fn sensor_trend(previous: f64, current: f64) -> Trend {
    let delta = current - previous;
    let scale = previous.abs().max(f64::EPSILON);

    if (delta / scale).abs() < SENSOR_TREND_DEADBAND {
        Trend::Stable
    } else if delta > 0.0 {
        Trend::Up
    } else {
        Trend::Down
    }
}

fn vibration_status(value: f64) -> SensorStatus {
    if value > VIBRATION_CRITICAL_LEVEL {
        SensorStatus::Critical
    } else if value > VIBRATION_WARNING_LEVEL {
        SensorStatus::Warning
    } else {
        SensorStatus::Healthy
    }
}
