use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operating status of a furnace
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FurnaceStatus {
    Active,
    Idle,
    Maintenance,
    Offline,
}

/// Melt composition in percent
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub carbon: f64,
    pub silicon: f64,
    pub manganese: f64,
    pub iron: f64,
}

/// Furnace represents one melting unit on the plant floor
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Furnace {
    /// Furnace identifier (e.g., "F1")
    pub id: String,
    pub name: String,
    pub status: FurnaceStatus,
    /// Current temperature (°C)
    pub temperature: f64,
    pub target_temperature: f64,
    /// Current pressure (bar)
    pub pressure: f64,
    pub target_pressure: f64,
    /// Output (tons/day)
    pub production_rate: f64,
    /// Power draw (kW), derived from temperature and production rate
    pub energy_consumption: f64,
    pub composition: Composition,
    pub last_updated: DateTime<Utc>,
}

/// New process values for a furnace, applied by the simulation tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FurnaceReading {
    pub temperature: f64,
    pub pressure: f64,
    pub production_rate: f64,
    pub energy_consumption: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorType {
    Temperature,
    Pressure,
    Vibration,
    Chemical,
    Flow,
    Level,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorStatus {
    Healthy,
    Warning,
    Critical,
    Offline,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// Sensor is a single instrumented measurement point
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sensor {
    /// Sensor identifier (e.g., "V002")
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub sensor_type: SensorType,
    pub value: f64,
    pub unit: String,
    pub status: SensorStatus,
    /// Plant zone (e.g., "Zone A")
    pub zone: String,
    pub trend: Trend,
    pub last_updated: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

/// Alert raised by the rule engine
///
/// Immutable once created except for `acknowledged`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    /// Subsystem that raised the alert (e.g., "Furnace Monitoring")
    pub source: String,
    pub timestamp: DateTime<Utc>,
    pub acknowledged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub furnace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_id: Option<String>,
}

/// Alert contents before the store assigns an id
#[derive(Clone, Debug, PartialEq)]
pub struct NewAlert {
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub source: String,
    pub furnace_id: Option<String>,
    pub sensor_id: Option<String>,
}

/// One aggregate production sample, appended every tick
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionMetric {
    pub timestamp: DateTime<Utc>,
    /// Sum of active furnace production rates (tons/day)
    pub throughput: f64,
    /// Defect rate (%)
    pub defect_rate: f64,
    /// Total plant draw (MW)
    pub energy_consumption: f64,
    /// Overall equipment effectiveness (%)
    pub oee: f64,
    pub quality: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiStatus {
    Good,
    Warning,
    Critical,
}

/// Dashboard KPI, keyed by label
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub label: String,
    pub value: f64,
    pub unit: String,
    /// Last change in percent
    pub change: f64,
    pub trend: Trend,
    pub status: KpiStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraStatus {
    Online,
    Offline,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Defect detected in a camera frame
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Detector confidence in [0, 1]
    pub confidence: f64,
    pub bounding_box: BoundingBox,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraFeed {
    pub id: String,
    pub name: String,
    pub location: String,
    pub status: CameraStatus,
    pub detections: Vec<Detection>,
    /// Always `detections.len()`
    pub defect_count: usize,
    pub last_update: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HotspotReading {
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub status: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotspotStatus {
    Normal,
    Warning,
    Critical,
}

/// Digital twin hotspot (reference data, never mutated by the tick)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub id: String,
    pub name: String,
    pub position: Position,
    pub sensors: Vec<HotspotReading>,
    pub status: HotspotStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionType {
    Maintenance,
    Energy,
    Quality,
    Production,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    #[serde(rename = "type")]
    pub prediction_type: PredictionType,
    pub title: String,
    pub description: String,
    /// Model confidence in [0, 1]
    pub confidence: f64,
    pub impact: Impact,
    pub recommendation: String,
    pub timestamp: DateTime<Utc>,
}

/// Prediction contents before the store assigns an id
#[derive(Clone, Debug, PartialEq)]
pub struct NewPrediction {
    pub prediction_type: PredictionType,
    pub title: String,
    pub description: String,
    pub confidence: f64,
    pub impact: Impact,
    pub recommendation: String,
}

/// Consistent view pushed to WebSocket subscribers
#[derive(Clone, Debug, Serialize)]
pub struct PlantSnapshot {
    pub furnaces: Vec<Furnace>,
    pub sensors: Vec<Sensor>,
    pub kpis: Vec<Kpi>,
    pub timestamp: DateTime<Utc>,
}
