//! Windowed bottleneck analysis for bottleneck-rs.
//!
//! Aggregates the classified snapshots in a trailing time window into a
//! [`WindowSummary`]: the current bottleneck, per-label confidences
//! averaged over the window, how often each label was dominant, and the
//! recommendations for the most recent snapshot. Summaries are recomputed
//! on every request and never cached.

use chrono::{Duration, Utc};
use serde::Serialize;

use crate::history::History;
use crate::metrics::{Bottleneck, MetricsSnapshot, Scores};
use crate::recommendations;

/// How often each label was the dominant bottleneck within the window.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct Frequency {
    /// Samples classified as CPU-bound
    pub cpu: u32,
    /// Samples classified as memory-bound
    pub memory: u32,
    /// Samples classified as GPU-bound
    pub gpu: u32,
    /// Samples classified as GPU-memory-bound
    pub gpu_memory: u32,
    /// Samples with no dominant bottleneck
    pub none: u32,
}

impl Frequency {
    fn tally(&mut self, label: Bottleneck) {
        match label {
            Bottleneck::Cpu => self.cpu += 1,
            Bottleneck::Memory => self.memory += 1,
            Bottleneck::Gpu => self.gpu += 1,
            Bottleneck::GpuMemory => self.gpu_memory += 1,
            Bottleneck::None => self.none += 1,
        }
    }
}

/// Summary of the trailing analysis window.
#[derive(Clone, Debug, Serialize)]
pub struct WindowSummary {
    /// Bottleneck of the most recent snapshot
    pub current_bottleneck: Bottleneck,
    /// Per-label confidence averaged over the window
    pub confidence: Scores,
    /// Dominant-label counts over the window
    pub frequency: Frequency,
    /// Most recent snapshot, for raw-metric passthrough
    pub current: MetricsSnapshot,
    /// Advice for the most recent snapshot, most relevant first
    pub recommendations: Vec<String>,
    /// Number of snapshots that fell inside the window
    pub window_samples: usize,
}

/// Summarize the trailing `window_secs` of history.
///
/// Returns `None` until the first sample has been collected. Once the
/// store is non-empty the `since` fallback guarantees at least one
/// snapshot to aggregate.
pub fn summarize(history: &History, window_secs: u64) -> Option<WindowSummary> {
    if history.is_empty() {
        return None;
    }

    let cutoff = Utc::now() - Duration::seconds(window_secs as i64);
    let recent = history.since(cutoff);
    let current = recent.last()?.clone();

    let mut confidence = Scores::default();
    let mut frequency = Frequency::default();
    for snapshot in &recent {
        frequency.tally(snapshot.bottleneck);
        confidence.cpu += snapshot.scores.cpu;
        confidence.memory += snapshot.scores.memory;
        confidence.gpu += snapshot.scores.gpu;
        confidence.gpu_memory += snapshot.scores.gpu_memory;
        confidence.none += snapshot.scores.none;
    }

    let count = recent.len() as f64;
    confidence.cpu /= count;
    confidence.memory /= count;
    confidence.gpu /= count;
    confidence.gpu_memory /= count;
    confidence.none /= count;

    let recommendations = recommendations::recommend(&current);

    Some(WindowSummary {
        current_bottleneck: current.bottleneck,
        confidence,
        frequency,
        current,
        recommendations,
        window_samples: recent.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::baseline_snapshot;

    fn classified_snapshot(offset_secs: i64, label: Bottleneck, score: f64) -> MetricsSnapshot {
        let mut snapshot = baseline_snapshot();
        snapshot.timestamp = Utc::now() + Duration::seconds(offset_secs);
        snapshot.bottleneck = label;
        let mut scores = Scores::default();
        match label {
            Bottleneck::Cpu => scores.cpu = score,
            Bottleneck::Memory => scores.memory = score,
            Bottleneck::Gpu => scores.gpu = score,
            Bottleneck::GpuMemory => scores.gpu_memory = score,
            Bottleneck::None => scores.none = score,
        }
        if label != Bottleneck::None {
            scores.none = 1.0 - score;
        }
        snapshot.scores = scores;
        snapshot
    }

    #[test]
    fn summarize_empty_history_is_none() {
        let history = History::new(10);
        assert!(summarize(&history, 30).is_none());
    }

    #[test]
    fn summarize_tallies_frequency_and_averages_confidence() {
        let mut history = History::new(10);
        history.push(classified_snapshot(-3, Bottleneck::Cpu, 0.9));
        history.push(classified_snapshot(-2, Bottleneck::Cpu, 0.7));
        history.push(classified_snapshot(-1, Bottleneck::None, 1.0));

        let summary = summarize(&history, 30).expect("history is non-empty");
        assert_eq!(summary.window_samples, 3);
        assert_eq!(summary.frequency.cpu, 2);
        assert_eq!(summary.frequency.none, 1);
        assert_eq!(summary.current_bottleneck, Bottleneck::None);
        // (0.9 + 0.7 + 0.0) / 3
        assert!((summary.confidence.cpu - 0.5333333333333333).abs() < 1e-9);
        // (0.1 + 0.3 + 1.0) / 3
        assert!((summary.confidence.none - 0.4666666666666667).abs() < 1e-9);
    }

    #[test]
    fn summarize_uses_latest_snapshot_when_window_is_stale() {
        let mut history = History::new(10);
        history.push(classified_snapshot(-600, Bottleneck::Memory, 1.0));

        let summary = summarize(&history, 30).expect("fallback to latest");
        assert_eq!(summary.window_samples, 1);
        assert_eq!(summary.current_bottleneck, Bottleneck::Memory);
        assert_eq!(summary.frequency.memory, 1);
    }
}
