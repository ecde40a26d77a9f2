use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Tracks runtime counters for the simulation and broadcast loops
#[derive(Clone)]
pub struct RuntimeStats {
    /// Ticks that ran to completion
    ticks_completed: Arc<AtomicU64>,

    /// Ticks aborted by an error
    ticks_failed: Arc<AtomicU64>,

    /// Alerts raised by the rule engine (lifetime counter)
    alerts_raised: Arc<AtomicU64>,

    /// Live WebSocket subscribers
    websocket_connections: Arc<AtomicU64>,

    started_at: DateTime<Utc>,
}

impl RuntimeStats {
    pub fn new() -> Self {
        Self {
            ticks_completed: Arc::new(AtomicU64::new(0)),
            ticks_failed: Arc::new(AtomicU64::new(0)),
            alerts_raised: Arc::new(AtomicU64::new(0)),
            websocket_connections: Arc::new(AtomicU64::new(0)),
            started_at: Utc::now(),
        }
    }

    pub fn record_tick(&self) {
        self.ticks_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed_tick(&self) {
        self.ticks_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_alerts(&self, count: u64) {
        self.alerts_raised.fetch_add(count, Ordering::Relaxed);
    }

    /// Increment WebSocket connection count
    pub fn increment_ws_connection(&self) {
        self.websocket_connections.fetch_add(1, Ordering::Relaxed);
    }

    /// Decrement WebSocket connection count
    pub fn decrement_ws_connection(&self) {
        self.websocket_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn get_ws_connection_count(&self) -> u64 {
        self.websocket_connections.load(Ordering::Relaxed)
    }

    pub fn get_ticks_completed(&self) -> u64 {
        self.ticks_completed.load(Ordering::Relaxed)
    }

    pub fn get_ticks_failed(&self) -> u64 {
        self.ticks_failed.load(Ordering::Relaxed)
    }

    pub fn get_alerts_raised(&self) -> u64 {
        self.alerts_raised.load(Ordering::Relaxed)
    }

    /// Get snapshot of all counters
    pub fn get_snapshot(&self) -> StatsSnapshot {
        let now = Utc::now();
        StatsSnapshot {
            ticks_completed: self.get_ticks_completed(),
            ticks_failed: self.get_ticks_failed(),
            alerts_raised: self.get_alerts_raised(),
            websocket_connections: self.get_ws_connection_count(),
            uptime_seconds: (now - self.started_at).num_seconds().max(0) as u64,
            timestamp: now,
        }
    }
}

impl Default for RuntimeStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters at a point in time
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub ticks_completed: u64,
    pub ticks_failed: u64,
    pub alerts_raised: u64,
    pub websocket_connections: u64,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}
