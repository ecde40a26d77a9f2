use crate::state::{PlantStore, RuntimeStats};
use crate::subscription::protocol::UpdateMessage;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

/// A live streaming connection
#[derive(Debug, Clone)]
pub struct Subscriber {
    pub id: Uuid,
    pub connected_at: DateTime<Utc>,
}

/// Registry of live subscribers plus the snapshot source they push from
pub struct BroadcastHub {
    store: Arc<PlantStore>,
    push_interval: Duration,
    subscribers: Arc<DashMap<Uuid, Subscriber>>,
}

impl BroadcastHub {
    pub fn new(store: Arc<PlantStore>, push_interval: Duration) -> Self {
        Self {
            store,
            push_interval,
            subscribers: Arc::new(DashMap::new()),
        }
    }

    pub fn push_interval(&self) -> Duration {
        self.push_interval
    }

    /// Register a new subscriber
    ///
    /// The subscriber stays registered until the returned guard is released
    /// or dropped.
    pub fn subscribe(&self) -> SubscriberGuard {
        let subscriber = Subscriber {
            id: Uuid::new_v4(),
            connected_at: Utc::now(),
        };
        let id = subscriber.id;

        self.subscribers.insert(id, subscriber);
        self.store.stats.increment_ws_connection();

        info!(subscriber_id = %id, subscribers = self.subscribers.len(), "Subscriber connected");

        SubscriberGuard {
            id,
            subscribers: Arc::clone(&self.subscribers),
            stats: self.store.stats.clone(),
            released: false,
        }
    }

    /// Build the next push from a fresh snapshot
    pub fn next_update(&self) -> UpdateMessage {
        UpdateMessage::from(self.store.snapshot())
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Keeps one subscriber registered; teardown runs exactly once
pub struct SubscriberGuard {
    id: Uuid,
    subscribers: Arc<DashMap<Uuid, Subscriber>>,
    stats: RuntimeStats,
    released: bool,
}

impl SubscriberGuard {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Remove the subscriber; later calls are no-ops
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if self.subscribers.remove(&self.id).is_some() {
            self.stats.decrement_ws_connection();
            info!(subscriber_id = %self.id, subscribers = self.subscribers.len(), "Subscriber released");
        }
    }
}

impl Drop for SubscriberGuard {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HistoryConfig;

    fn hub() -> BroadcastHub {
        let store = Arc::new(PlantStore::seeded(&HistoryConfig::default()));
        BroadcastHub::new(store, Duration::from_millis(2000))
    }

    #[test]
    fn test_subscribe_and_drop() {
        let hub = hub();

        let first = hub.subscribe();
        let second = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 2);
        assert_ne!(first.id(), second.id());

        drop(first);
        assert_eq!(hub.subscriber_count(), 1);
        assert!(hub.subscribers.contains_key(&second.id()));

        drop(second);
        assert_eq!(hub.subscriber_count(), 0);
        assert_eq!(hub.store.stats.get_ws_connection_count(), 0);
    }

    #[test]
    fn test_release_is_idempotent() {
        let hub = hub();
        let _other = hub.subscribe();
        let mut guard = hub.subscribe();

        guard.release();
        guard.release();
        drop(guard);

        assert_eq!(hub.subscriber_count(), 1);
        assert_eq!(hub.store.stats.get_ws_connection_count(), 1);
    }

    #[test]
    fn test_next_update_is_fresh() {
        let hub = hub();
        let before = hub.next_update();

        hub.store.update_sensor_value("L001", 12.0).unwrap();
        let after = hub.next_update();

        assert!(after.data.timestamp >= before.data.timestamp);
        let l001 = after.data.sensors.iter().find(|s| s.id == "L001").unwrap();
        assert_eq!(l001.value, 12.0);
    }
}
