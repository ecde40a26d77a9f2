// Fixed plant layout loaded at process start

use crate::state::entity::*;
use chrono::{DateTime, Utc};
use uuid::Uuid;

fn furnace(
    id: &str,
    name: &str,
    status: FurnaceStatus,
    (temperature, target_temperature): (f64, f64),
    (pressure, target_pressure): (f64, f64),
    production_rate: f64,
    energy_consumption: f64,
    [carbon, silicon, manganese, iron]: [f64; 4],
    now: DateTime<Utc>,
) -> Furnace {
    Furnace {
        id: id.to_string(),
        name: name.to_string(),
        status,
        temperature,
        target_temperature,
        pressure,
        target_pressure,
        production_rate,
        energy_consumption,
        composition: Composition {
            carbon,
            silicon,
            manganese,
            iron,
        },
        last_updated: now,
    }
}

pub fn furnaces(now: DateTime<Utc>) -> Vec<Furnace> {
    use FurnaceStatus::*;
    vec![
        furnace("F1", "Blast Furnace 1", Active, (1650.0, 1700.0), (2.8, 3.0), 485.0, 1240.0, [4.2, 0.8, 0.5, 94.5], now),
        furnace("F2", "Blast Furnace 2", Active, (1720.0, 1700.0), (3.1, 3.0), 502.0, 1280.0, [4.0, 0.7, 0.6, 94.7], now),
        furnace("F3", "Blast Furnace 3", Active, (1680.0, 1700.0), (2.9, 3.0), 495.0, 1260.0, [4.1, 0.9, 0.4, 94.6], now),
        furnace("F4", "Electric Arc Furnace 1", Idle, (850.0, 1600.0), (1.0, 1.0), 0.0, 120.0, [0.2, 0.1, 0.1, 99.6], now),
        furnace("F5", "Electric Arc Furnace 2", Maintenance, (320.0, 0.0), (0.8, 1.0), 0.0, 15.0, [0.0, 0.0, 0.0, 100.0], now),
        furnace("F6", "Ladle Furnace 1", Active, (1580.0, 1600.0), (1.2, 1.0), 180.0, 420.0, [0.3, 0.2, 0.8, 98.7], now),
    ]
}

fn sensor(
    id: &str,
    name: &str,
    sensor_type: SensorType,
    value: f64,
    unit: &str,
    status: SensorStatus,
    zone: &str,
    trend: Trend,
    now: DateTime<Utc>,
) -> Sensor {
    Sensor {
        id: id.to_string(),
        name: name.to_string(),
        sensor_type,
        value,
        unit: unit.to_string(),
        status,
        zone: zone.to_string(),
        trend,
        last_updated: now,
    }
}

pub fn sensors(now: DateTime<Utc>) -> Vec<Sensor> {
    use SensorStatus::*;
    use SensorType::*;
    use Trend::*;
    vec![
        sensor("T001", "BF1 Top Temp", Temperature, 1650.0, "°C", Healthy, "Zone A", Stable, now),
        sensor("T002", "BF2 Top Temp", Temperature, 1720.0, "°C", Warning, "Zone A", Up, now),
        sensor("T003", "Cooling Water", Temperature, 45.0, "°C", Healthy, "Zone B", Down, now),
        sensor("P001", "BF1 Pressure", Pressure, 2.8, "bar", Healthy, "Zone A", Stable, now),
        sensor("P002", "BF2 Pressure", Pressure, 3.1, "bar", Warning, "Zone A", Up, now),
        sensor("P003", "Gas Line 1", Pressure, 1.5, "bar", Healthy, "Zone C", Stable, now),
        sensor("V001", "Motor 1 Vib", Vibration, 2.3, "mm/s", Healthy, "Zone D", Stable, now),
        sensor("V002", "Motor 2 Vib", Vibration, 4.8, "mm/s", Critical, "Zone D", Up, now),
        sensor("V003", "Pump A Vib", Vibration, 1.9, "mm/s", Healthy, "Zone B", Down, now),
        sensor("C001", "Carbon %", Chemical, 4.2, "%", Healthy, "Zone A", Stable, now),
        sensor("C002", "Silicon %", Chemical, 0.8, "%", Healthy, "Zone A", Stable, now),
        sensor("C003", "pH Sensor", Chemical, 7.2, "pH", Healthy, "Zone B", Stable, now),
        sensor("F001", "Water Flow", Flow, 485.0, "m³/h", Healthy, "Zone B", Stable, now),
        sensor("F002", "Gas Flow", Flow, 12500.0, "Nm³/h", Healthy, "Zone C", Up, now),
        sensor("L001", "Tank Level 1", Level, 78.0, "%", Healthy, "Zone B", Down, now),
        sensor("L002", "Tank Level 2", Level, 92.0, "%", Warning, "Zone B", Up, now),
        sensor("T004", "EAF Temp", Temperature, 850.0, "°C", Offline, "Zone E", Stable, now),
        sensor("P004", "EAF Pressure", Pressure, 0.0, "bar", Offline, "Zone E", Stable, now),
    ]
}

fn kpi(label: &str, value: f64, unit: &str, change: f64, trend: Trend, status: KpiStatus) -> Kpi {
    Kpi {
        label: label.to_string(),
        value,
        unit: unit.to_string(),
        change,
        trend,
        status,
    }
}

pub fn kpis() -> Vec<Kpi> {
    vec![
        kpi("Production Rate", 2847.0, "tons/day", 5.2, Trend::Up, KpiStatus::Good),
        kpi("Energy Efficiency", 87.3, "%", 2.1, Trend::Up, KpiStatus::Good),
        kpi("Quality Score", 94.6, "%", -0.8, Trend::Down, KpiStatus::Warning),
        kpi("Equipment Health", 91.2, "%", 0.0, Trend::Stable, KpiStatus::Good),
    ]
}

fn detection(id: &str, kind: &str, confidence: f64, (x, y, width, height): (f64, f64, f64, f64)) -> Detection {
    Detection {
        id: id.to_string(),
        kind: kind.to_string(),
        confidence,
        bounding_box: BoundingBox { x, y, width, height },
    }
}

fn camera(
    id: &str,
    name: &str,
    location: &str,
    status: CameraStatus,
    detections: Vec<Detection>,
    now: DateTime<Utc>,
) -> CameraFeed {
    CameraFeed {
        id: id.to_string(),
        name: name.to_string(),
        location: location.to_string(),
        status,
        defect_count: detections.len(),
        detections,
        last_update: now,
    }
}

pub fn cameras(now: DateTime<Utc>) -> Vec<CameraFeed> {
    use CameraStatus::*;
    vec![
        camera(
            "CAM001",
            "Production Line A",
            "Zone A - North",
            Online,
            vec![
                detection("D1", "Surface Defect", 0.92, (120.0, 80.0, 60.0, 40.0)),
                detection("D2", "Crack", 0.87, (240.0, 150.0, 45.0, 35.0)),
            ],
            now,
        ),
        camera("CAM002", "Production Line B", "Zone A - South", Online, vec![], now),
        camera(
            "CAM003",
            "Quality Check Station",
            "Zone B - Center",
            Online,
            vec![detection("D3", "Dimensional Issue", 0.78, (160.0, 100.0, 70.0, 50.0))],
            now,
        ),
        camera("CAM004", "Cooling Area", "Zone B - East", Online, vec![], now),
        camera("CAM005", "Storage Zone", "Zone C - West", Offline, vec![], now),
        camera("CAM006", "Loading Bay", "Zone D - North", Online, vec![], now),
    ]
}

fn reading(name: &str, value: f64, unit: &str, status: &str) -> HotspotReading {
    HotspotReading {
        name: name.to_string(),
        value,
        unit: unit.to_string(),
        status: status.to_string(),
    }
}

pub fn hotspots() -> Vec<Hotspot> {
    vec![
        Hotspot {
            id: "HS1".to_string(),
            name: "Blast Furnace 1".to_string(),
            position: Position { x: -2.0, y: 0.0, z: 0.0 },
            sensors: vec![
                reading("Temperature", 1650.0, "°C", "normal"),
                reading("Pressure", 2.8, "bar", "normal"),
                reading("Flow Rate", 485.0, "m³/h", "normal"),
            ],
            status: HotspotStatus::Normal,
        },
        Hotspot {
            id: "HS2".to_string(),
            name: "Cooling Tower".to_string(),
            position: Position { x: 2.0, y: 0.0, z: 0.0 },
            sensors: vec![
                reading("Temperature", 45.0, "°C", "warning"),
                reading("Water Level", 78.0, "%", "normal"),
                reading("Pump Status", 1.0, "active", "normal"),
            ],
            status: HotspotStatus::Warning,
        },
        Hotspot {
            id: "HS3".to_string(),
            name: "Sensor Array A".to_string(),
            position: Position { x: 0.0, y: 1.5, z: -2.0 },
            sensors: vec![
                reading("Vibration", 2.3, "mm/s", "normal"),
                reading("Humidity", 45.0, "%", "normal"),
            ],
            status: HotspotStatus::Normal,
        },
    ]
}

pub fn predictions(now: DateTime<Utc>) -> Vec<Prediction> {
    vec![
        Prediction {
            id: Uuid::now_v7().to_string(),
            prediction_type: PredictionType::Maintenance,
            title: "Motor 2 Bearing Failure Predicted".to_string(),
            description: "Vibration analysis indicates bearing degradation. Recommend maintenance within 48 hours.".to_string(),
            confidence: 0.89,
            impact: Impact::High,
            recommendation: "Schedule bearing replacement for Motor 2 during next maintenance window".to_string(),
            timestamp: now,
        },
        Prediction {
            id: Uuid::now_v7().to_string(),
            prediction_type: PredictionType::Energy,
            title: "Energy Optimization Opportunity".to_string(),
            description: "Current furnace temperatures can be reduced by 2% without affecting output quality.".to_string(),
            confidence: 0.76,
            impact: Impact::Medium,
            recommendation: "Adjust BF2 target temperature to 1666°C to save approximately 120 kWh".to_string(),
            timestamp: now,
        },
        Prediction {
            id: Uuid::now_v7().to_string(),
            prediction_type: PredictionType::Quality,
            title: "Quality Score Decline Detected".to_string(),
            description: "Carbon content variance increasing over past 6 hours. May affect product consistency.".to_string(),
            confidence: 0.82,
            impact: Impact::Medium,
            recommendation: "Review and stabilize carbon feed rate in BF1 and BF3".to_string(),
            timestamp: now,
        },
    ]
}
