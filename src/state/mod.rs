// Entity store: plant collections, bounded metrics history, runtime counters

mod entity;
mod error;
mod history;
mod metrics;
mod seed;
mod store;

pub use entity::*;
pub use error::StoreError;
pub use metrics::{RuntimeStats, StatsSnapshot};
pub use store::{PlantStore, VIBRATION_CRITICAL_LEVEL, VIBRATION_WARNING_LEVEL};
