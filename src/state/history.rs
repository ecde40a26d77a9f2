use crate::state::entity::ProductionMetric;
use std::collections::VecDeque;

/// Bounded production metrics history
///
/// Appends never grow the buffer past `capacity`. When an append would
/// exceed it, the oldest samples are dropped until only the newest `retain`
/// remain, so trimming happens in bulk rather than on every append.
#[derive(Debug, Clone)]
pub struct MetricsHistory {
    samples: VecDeque<ProductionMetric>,
    capacity: usize,
    retain: usize,
}

impl MetricsHistory {
    /// Create an empty history
    ///
    /// `retain` is clamped to `1..=capacity`.
    pub fn new(capacity: usize, retain: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            retain: retain.clamp(1, capacity),
        }
    }

    pub fn push(&mut self, metric: ProductionMetric) {
        self.samples.push_back(metric);

        if self.samples.len() > self.capacity {
            let excess = self.samples.len() - self.retain;
            self.samples.drain(..excess);
        }
    }

    /// Newest `count` samples, oldest first
    pub fn tail(&self, count: usize) -> Vec<ProductionMetric> {
        let skip = self.samples.len().saturating_sub(count);
        self.samples.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn metric(throughput: f64) -> ProductionMetric {
        ProductionMetric {
            timestamp: Utc::now(),
            throughput,
            defect_rate: 2.5,
            energy_consumption: 4.2,
            oee: 90.0,
            quality: 95.0,
        }
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut history = MetricsHistory::new(1000, 500);

        for i in 0..2500 {
            history.push(metric(i as f64));
            assert!(history.len() <= 1000);
        }
    }

    #[test]
    fn test_trims_to_retain_on_overflow() {
        let mut history = MetricsHistory::new(10, 4);

        for i in 0..10 {
            history.push(metric(i as f64));
        }
        assert_eq!(history.len(), 10);

        // 11th append overflows, newest 4 survive
        history.push(metric(10.0));
        assert_eq!(history.len(), 4);

        let throughputs: Vec<f64> = history.tail(10).iter().map(|m| m.throughput).collect();
        assert_eq!(throughputs, vec![7.0, 8.0, 9.0, 10.0]);
    }

    #[test]
    fn test_tail_returns_newest_in_order() {
        let mut history = MetricsHistory::new(100, 50);
        for i in 0..30 {
            history.push(metric(i as f64));
        }

        let tail = history.tail(24);
        assert_eq!(tail.len(), 24);
        assert_eq!(tail.first().unwrap().throughput, 6.0);
        assert_eq!(tail.last().unwrap().throughput, 29.0);
    }

    #[test]
    fn test_tail_shorter_than_request() {
        let mut history = MetricsHistory::new(100, 50);
        assert!(history.tail(24).is_empty());

        history.push(metric(1.0));
        assert_eq!(history.tail(24).len(), 1);
    }

    #[test]
    fn test_retain_clamped_to_capacity() {
        let mut history = MetricsHistory::new(5, 50);
        for i in 0..6 {
            history.push(metric(i as f64));
        }
        assert_eq!(history.len(), 5);
        assert_eq!(history.capacity(), 5);
    }
}
