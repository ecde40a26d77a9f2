//! Process model constants and pure update functions.
//!
//! Noise terms are passed in already drawn so the dynamics can be checked
//! without an RNG.

use crate::state::SensorType;

/// Fraction of the gap to target closed per tick
pub const TEMPERATURE_PULL: f64 = 0.1;

/// Full width of the uniform temperature noise band (°C), i.e. ±10
pub const TEMPERATURE_NOISE_SPAN: f64 = 20.0;

/// Full width of the uniform pressure noise band (bar)
pub const PRESSURE_NOISE_SPAN: f64 = 0.2;

/// Full width of the uniform production rate noise band (tons/day)
pub const PRODUCTION_NOISE_SPAN: f64 = 10.0;

/// Draw (kW) of a furnace held exactly at target
pub const BASE_POWER: f64 = 1300.0;

/// Production rate at which the rate term contributes `RATE_POWER`
pub const REFERENCE_RATE: f64 = 500.0;

/// Draw (kW) attributable to running at `REFERENCE_RATE`
pub const RATE_POWER: f64 = 200.0;

/// KPI noise span as a fraction of the current value
pub const KPI_NOISE_FRACTION: f64 = 0.02;

/// Mean-reverting temperature step
pub fn next_temperature(current: f64, target: f64, noise: f64) -> f64 {
    (current + noise + (target - current) * TEMPERATURE_PULL).max(0.0)
}

/// Power draw derived from temperature and production rate
pub fn energy_consumption(temperature: f64, target_temperature: f64, production_rate: f64) -> f64 {
    let thermal = if target_temperature > 0.0 {
        temperature / target_temperature * BASE_POWER
    } else {
        0.0
    };

    thermal + production_rate / REFERENCE_RATE * RATE_POWER
}

/// Full width of the noise band for a sensor at `value`
///
/// Temperature and flow noise scale with the reading, the rest are fixed
/// bands.
pub fn sensor_noise_span(sensor_type: SensorType, value: f64) -> f64 {
    match sensor_type {
        SensorType::Temperature => value * 0.02,
        SensorType::Pressure => 0.3,
        SensorType::Vibration => 0.5,
        SensorType::Chemical => 0.1,
        SensorType::Flow => value * 0.05,
        SensorType::Level => 2.0,
    }
}
