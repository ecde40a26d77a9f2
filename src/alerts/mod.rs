// Alert rule engine: fixed threshold rules evaluated after each mutation

use crate::config::AlertConfig;
use crate::state::{
    Alert, Furnace, NewAlert, PlantStore, Sensor, SensorStatus, SensorType, Severity,
    VIBRATION_CRITICAL_LEVEL,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::warn;


/// Degrees above target at which a furnace is over temperature
pub const FURNACE_OVER_TEMP_MARGIN: f64 = 30.0;

pub const FURNACE_ALERT_SOURCE: &str = "Furnace Monitoring";
pub const SENSOR_ALERT_SOURCE: &str = "Sensor Network";

/// Over-temperature rule
///
/// Fires on every evaluation where the new temperature is above
/// target + 30, with no memory of earlier breaches.
pub fn furnace_over_temperature(furnace: &Furnace) -> Option<NewAlert> {
    if furnace.temperature <= furnace.target_temperature + FURNACE_OVER_TEMP_MARGIN {
        return None;
    }

    Some(NewAlert {
        severity: Severity::Critical,
        title: format!("{} Temperature Exceeded", furnace.name),
        message: format!(
            "Temperature reached {}°C (Target: {}°C)",
            furnace.temperature.round(),
            furnace.target_temperature
        ),
        source: FURNACE_ALERT_SOURCE.to_string(),
        furnace_id: Some(furnace.id.clone()),
        sensor_id: None,
    })
}

/// High vibration rule
///
/// Gated on the prior status so a sustained high level fires once, on the
/// tick that crosses the threshold.
pub fn sensor_high_vibration(prior: &Sensor, updated: &Sensor) -> Option<NewAlert> {
    if updated.sensor_type != SensorType::Vibration
        || updated.value <= VIBRATION_CRITICAL_LEVEL
        || prior.status == SensorStatus::Critical
    {
        return None;
    }

    Some(NewAlert {
        severity: Severity::Critical,
        title: "High Vibration Detected".to_string(),
        message: format!("{} vibration at {:.1} {}", updated.name, updated.value, updated.unit),
        source: SENSOR_ALERT_SOURCE.to_string(),
        furnace_id: None,
        sensor_id: Some(updated.id.clone()),
    })
}

/// Evaluates rules and appends the resulting alerts to the store
pub struct AlertEngine {
    /// Zero disables over-temperature suppression
    furnace_cooldown: Duration,

    /// furnace_id -> last over-temperature alert time
    last_furnace_alert: DashMap<String, DateTime<Utc>>,
}

impl AlertEngine {
    pub fn new(config: &AlertConfig) -> Result<Self> {
        let furnace_cooldown = i64::try_from(config.furnace_cooldown_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .with_context(|| {
                format!(
                    "alerts.furnace_cooldown_secs out of range: {}",
                    config.furnace_cooldown_secs
                )
            })?;

        Ok(Self {
            furnace_cooldown,
            last_furnace_alert: DashMap::new(),
        })
    }

    /// Check a furnace after its update
    pub fn on_furnace_update(&self, store: &PlantStore, updated: &Furnace) -> Option<Alert> {
        let new_alert = furnace_over_temperature(updated)?;

        let now = Utc::now();
        if self.furnace_cooldown > Duration::zero() {
            if let Some(last) = self.last_furnace_alert.get(&updated.id) {
                if now - *last < self.furnace_cooldown {
                    return None;
                }
            }
            self.last_furnace_alert.insert(updated.id.clone(), now);
        }

        let alert = store.append_alert(new_alert);
        warn!(
            alert_id = %alert.id,
            furnace_id = %updated.id,
            temperature = updated.temperature,
            target = updated.target_temperature,
            "Furnace over temperature"
        );
        Some(alert)
    }

    /// Check a sensor after its update, given its state before the update
    pub fn on_sensor_update(&self, store: &PlantStore, prior: &Sensor, updated: &Sensor) -> Option<Alert> {
        let new_alert = sensor_high_vibration(prior, updated)?;

        let alert = store.append_alert(new_alert);
        warn!(
            alert_id = %alert.id,
            sensor_id = %updated.id,
            value = updated.value,
            "High vibration"
        );
        Some(alert)
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self {
            furnace_cooldown: Duration::zero(),
            last_furnace_alert: DashMap::new(),
        }
    }
}
