use std::fmt;

/// Store mutator errors
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    FurnaceNotFound(String),
    SensorNotFound(String),
    AlertNotFound(String),
    CameraNotFound(String),
    KpiNotFound(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::FurnaceNotFound(id) => write!(f, "Furnace {} not found", id),
            StoreError::SensorNotFound(id) => write!(f, "Sensor {} not found", id),
            StoreError::AlertNotFound(id) => write!(f, "Alert {} not found", id),
            StoreError::CameraNotFound(id) => write!(f, "Camera {} not found", id),
            StoreError::KpiNotFound(label) => write!(f, "KPI '{}' not found", label),
        }
    }
}

impl std::error::Error for StoreError {}
