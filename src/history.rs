//! Metrics history for bottleneck-rs.
//!
//! Fixed-capacity ring buffer of classified snapshots. The sampling thread
//! is the only writer; the renderer reads it behind a mutex. Snapshots are
//! insertion-ordered and the oldest is evicted once capacity is reached.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::metrics::MetricsSnapshot;

/// Ring buffer of the most recent metrics snapshots.
pub struct History {
    samples: VecDeque<MetricsSnapshot>,
    capacity: usize,
}

impl History {
    /// Create an empty history retaining at most `capacity` snapshots.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a snapshot, evicting the oldest when at capacity.
    pub fn push(&mut self, snapshot: MetricsSnapshot) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(snapshot);
    }

    /// Most recent snapshot, if any sample has been collected.
    pub fn latest(&self) -> Option<&MetricsSnapshot> {
        self.samples.back()
    }

    /// Number of retained snapshots.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True until the first sample lands.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate retained snapshots, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &MetricsSnapshot> {
        self.samples.iter()
    }

    /// Snapshots with `timestamp >= cutoff`, oldest first.
    ///
    /// Falls back to the single latest snapshot when the window is empty,
    /// so windowed analysis always has input once anything was collected.
    /// Returns an empty vec only when the store itself is empty.
    pub fn since(&self, cutoff: DateTime<Utc>) -> Vec<MetricsSnapshot> {
        let recent: Vec<MetricsSnapshot> = self
            .samples
            .iter()
            .filter(|m| m.timestamp >= cutoff)
            .cloned()
            .collect();

        if recent.is_empty() {
            self.samples.back().cloned().into_iter().collect()
        } else {
            recent
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::metrics::baseline_snapshot;

    fn snapshot_at(offset_secs: i64) -> MetricsSnapshot {
        let mut snapshot = baseline_snapshot();
        snapshot.timestamp = Utc::now() + Duration::seconds(offset_secs);
        snapshot
    }

    #[test]
    fn push_evicts_oldest_beyond_capacity() {
        let mut history = History::new(3);
        for i in 0..4 {
            history.push(snapshot_at(i));
        }

        assert_eq!(history.len(), 3);
        let timestamps: Vec<_> = history.iter().map(|m| m.timestamp).collect();
        // Sample 0 was evicted and the rest stay in chronological order.
        assert!(timestamps.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(history.latest().map(|m| m.timestamp), Some(timestamps[2]));
    }

    #[test]
    fn since_filters_by_cutoff() {
        let mut history = History::new(10);
        for i in 0..5 {
            history.push(snapshot_at(i - 10));
        }

        let cutoff = Utc::now() + Duration::seconds(-8);
        let recent = history.since(cutoff);
        assert_eq!(recent.len(), 3);
        assert!(recent.iter().all(|m| m.timestamp >= cutoff));
    }

    #[test]
    fn since_falls_back_to_latest_when_window_is_empty() {
        let mut history = History::new(10);
        history.push(snapshot_at(-600));
        history.push(snapshot_at(-500));

        let recent = history.since(Utc::now());
        assert_eq!(recent.len(), 1);
        assert_eq!(
            recent[0].timestamp,
            history.latest().map(|m| m.timestamp).unwrap()
        );
    }

    #[test]
    fn since_on_empty_store_is_empty() {
        let history = History::new(10);
        assert!(history.since(Utc::now()).is_empty());
        assert!(history.latest().is_none());
    }
}
