use crate::alerts::AlertEngine;
use crate::config::SimulationConfig;
use crate::simulation::model::{self, *};
use crate::state::{
    FurnaceReading, FurnaceStatus, PlantStore, ProductionMetric, SensorStatus, StoreError,
};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

/// What one tick changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub furnaces_updated: usize,
    pub sensors_updated: usize,
    pub kpis_updated: usize,
    pub alerts_raised: usize,
}

/// Failure forced into a single tick
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub(crate) enum TickFault {
    Error,
    Panic,
}

/// Drives the plant model forward one tick at a time
pub struct Simulator {
    store: Arc<PlantStore>,
    alerts: AlertEngine,
    rng: StdRng,
    noise_scale: f64,

    /// Consumed one per tick, front first
    #[cfg(test)]
    faults: std::collections::VecDeque<TickFault>,
}

impl Simulator {
    pub fn new(store: Arc<PlantStore>, alerts: AlertEngine, config: &SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            store,
            alerts,
            rng,
            noise_scale: config.noise_scale,
            #[cfg(test)]
            faults: std::collections::VecDeque::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_faults(mut self, faults: impl IntoIterator<Item = TickFault>) -> Self {
        self.faults.extend(faults);
        self
    }

    /// Zero-mean uniform noise over a band `span` wide
    fn jitter(&mut self, span: f64) -> f64 {
        (self.rng.gen::<f64>() - 0.5) * span * self.noise_scale
    }

    /// Uniform draw in `[low, high]`, collapsing to the midpoint without noise
    fn draw_between(&mut self, low: f64, high: f64) -> f64 {
        (low + high) / 2.0 + self.jitter(high - low)
    }

    /// Run one tick
    ///
    /// Holds the store's tick gate throughout, so subscribers see either
    /// the whole tick or none of it. An error aborts the remainder of the
    /// tick; entities already updated keep their new values.
    pub fn tick(&mut self) -> Result<TickReport, StoreError> {
        #[cfg(test)]
        match self.faults.pop_front() {
            Some(TickFault::Error) => return Err(StoreError::FurnaceNotFound("F0".to_string())),
            Some(TickFault::Panic) => panic!("tick fault"),
            None => {}
        }

        let store = Arc::clone(&self.store);
        let _gate = store.begin_tick();
        let mut report = TickReport::default();

        for furnace in store.get_furnaces() {
            if furnace.status != FurnaceStatus::Active {
                continue;
            }

            let temperature_noise = self.jitter(TEMPERATURE_NOISE_SPAN);
            let temperature = model::next_temperature(
                furnace.temperature,
                furnace.target_temperature,
                temperature_noise,
            );
            let pressure = furnace.pressure + self.jitter(PRESSURE_NOISE_SPAN);
            let production_rate = (furnace.production_rate + self.jitter(PRODUCTION_NOISE_SPAN)).max(0.0);
            let energy_consumption =
                model::energy_consumption(temperature, furnace.target_temperature, production_rate);

            let updated = store.update_furnace(
                &furnace.id,
                FurnaceReading {
                    temperature,
                    pressure,
                    production_rate,
                    energy_consumption,
                },
            )?;
            report.furnaces_updated += 1;

            if self.alerts.on_furnace_update(&store, &updated).is_some() {
                report.alerts_raised += 1;
            }
        }

        for sensor in store.get_sensors() {
            if sensor.status == SensorStatus::Offline {
                continue;
            }

            let span = model::sensor_noise_span(sensor.sensor_type, sensor.value);
            let value = sensor.value + self.jitter(span);

            let updated = store.update_sensor_value(&sensor.id, value)?;
            report.sensors_updated += 1;

            if self.alerts.on_sensor_update(&store, &sensor, &updated).is_some() {
                report.alerts_raised += 1;
            }
        }

        for kpi in store.kpis() {
            if kpi.value <= 0.0 {
                continue;
            }

            let delta = self.jitter(kpi.value * KPI_NOISE_FRACTION);
            store.update_kpi(&kpi.label, kpi.value + delta, delta / kpi.value * 100.0)?;
            report.kpis_updated += 1;
        }

        let furnaces = store.get_furnaces();
        let throughput = furnaces
            .iter()
            .filter(|f| f.status == FurnaceStatus::Active)
            .map(|f| f.production_rate)
            .sum();
        let energy_kw: f64 = furnaces.iter().map(|f| f.energy_consumption).sum();

        let metric = ProductionMetric {
            timestamp: Utc::now(),
            throughput,
            defect_rate: self.draw_between(2.0, 5.0),
            energy_consumption: energy_kw / 1000.0,
            oee: self.draw_between(85.0, 95.0),
            quality: self.draw_between(90.0, 98.0),
        };
        store.append_metric(metric);

        Ok(report)
    }

    /// Tick forever on a fixed period
    ///
    /// A failed or panicking tick is logged and skipped; the next period
    /// runs normally. Cancel by aborting the task running this future.
    pub async fn run(mut self, tick_interval: Duration) {
        let mut ticker = interval(tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // First tick completes immediately; the seeded state stands for one period
        ticker.tick().await;

        info!(interval_ms = tick_interval.as_millis() as u64, "Simulation started");

        loop {
            ticker.tick().await;

            let stats = self.store.stats.clone();
            match panic::catch_unwind(AssertUnwindSafe(|| self.tick())) {
                Ok(Ok(report)) => {
                    stats.record_tick();
                    stats.record_alerts(report.alerts_raised as u64);
                    debug!(
                        furnaces = report.furnaces_updated,
                        sensors = report.sensors_updated,
                        kpis = report.kpis_updated,
                        alerts = report.alerts_raised,
                        "Simulation tick complete"
                    );
                }
                Ok(Err(e)) => {
                    stats.record_failed_tick();
                    error!(error = %e, "Simulation tick failed, skipping cycle");
                }
                Err(_) => {
                    stats.record_failed_tick();
                    error!("Simulation tick panicked, skipping cycle");
                }
            }
        }
    }
}

/// Spawn-friendly entry point for the simulation loop
pub async fn run_simulation(
    store: Arc<PlantStore>,
    alerts: AlertEngine,
    config: SimulationConfig,
) {
    let tick_interval = config.tick_interval();
    Simulator::new(store, alerts, &config).run(tick_interval).await;
}
