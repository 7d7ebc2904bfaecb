//! Metrics data structures for bottleneck-rs.
//!
//! This module defines the [`MetricsSnapshot`] struct holding one fully
//! classified sample, the [`Bottleneck`] label enum, and the [`Scores`]
//! confidence map produced by the classifier.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Resource dimension that can limit performance.
///
/// The variant order is the scoring priority: when two labels end up with
/// exactly equal confidence, the earlier variant wins.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize)]
pub enum Bottleneck {
    /// CPU-bound (overall or single-core saturation)
    Cpu,
    /// System memory pressure
    Memory,
    /// GPU compute saturation
    Gpu,
    /// GPU memory (VRAM) exhaustion
    GpuMemory,
    /// No dominant bottleneck
    #[default]
    None,
}

impl Bottleneck {
    /// All labels in priority order.
    pub const ALL: [Bottleneck; 5] = [
        Bottleneck::Cpu,
        Bottleneck::Memory,
        Bottleneck::Gpu,
        Bottleneck::GpuMemory,
        Bottleneck::None,
    ];

    /// Short display label.
    pub fn label(self) -> &'static str {
        match self {
            Bottleneck::Cpu => "CPU",
            Bottleneck::Memory => "Memory",
            Bottleneck::Gpu => "GPU",
            Bottleneck::GpuMemory => "GPU Memory",
            Bottleneck::None => "None",
        }
    }
}

impl std::fmt::Display for Bottleneck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-label confidence scores.
///
/// All five labels are always present. After classification the values are
/// normalized so they sum to 1.0 (unless every bucket is zero).
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize)]
pub struct Scores {
    /// CPU confidence
    pub cpu: f64,
    /// Memory confidence
    pub memory: f64,
    /// GPU confidence
    pub gpu: f64,
    /// GPU memory confidence
    pub gpu_memory: f64,
    /// No-bottleneck confidence
    pub none: f64,
}

impl Scores {
    /// Score for a single label.
    pub fn get(&self, label: Bottleneck) -> f64 {
        match label {
            Bottleneck::Cpu => self.cpu,
            Bottleneck::Memory => self.memory,
            Bottleneck::Gpu => self.gpu,
            Bottleneck::GpuMemory => self.gpu_memory,
            Bottleneck::None => self.none,
        }
    }

    /// Iterate `(label, score)` pairs in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Bottleneck, f64)> + '_ {
        Bottleneck::ALL.iter().map(move |&label| (label, self.get(label)))
    }

    /// Sum across all five labels.
    pub fn total(&self) -> f64 {
        self.cpu + self.memory + self.gpu + self.gpu_memory + self.none
    }

    /// Label with the highest score. Earlier labels win ties, so the
    /// comparison is strict-greater over the priority order.
    pub fn dominant(&self) -> Bottleneck {
        let mut best = Bottleneck::Cpu;
        let mut best_score = self.cpu;
        for (label, score) in self.iter().skip(1) {
            if score > best_score {
                best = label;
                best_score = score;
            }
        }
        best
    }
}

/// Complete snapshot of system metrics at a point in time.
///
/// Built once per sampling tick, classified immediately, and immutable
/// afterwards. Survives only inside the history ring buffer.
///
/// GPU and target-process fields are zero when the source is unavailable;
/// `gpu_available` and `target_found` let the UI render those zeros as
/// "unavailable" / "not detected" instead of fake idle readings.
#[derive(Clone, Debug, Serialize)]
pub struct MetricsSnapshot {
    /// When the sample was taken
    pub timestamp: DateTime<Utc>,

    /// Average CPU usage across all cores (0-100, may transiently exceed 100)
    pub cpu_overall_pct: f32,
    /// Per-core CPU usage, indexed by logical core
    pub cpu_per_core_pct: Vec<f32>,

    /// Memory usage (0-100)
    pub memory_pct: f32,
    /// Memory in use in GB
    pub memory_used_gb: f64,
    /// Memory available in GB
    pub memory_available_gb: f64,

    /// Whether a GPU metrics source was detected at startup
    pub gpu_available: bool,
    /// GPU utilization (0-100)
    pub gpu_utilization_pct: f64,
    /// GPU memory usage (0-100)
    pub gpu_memory_pct: f64,
    /// GPU memory in use in GB
    pub gpu_memory_used_gb: f64,
    /// GPU temperature in Celsius
    pub gpu_temperature_c: f64,

    /// Whether the target process was found this cycle
    pub target_found: bool,
    /// Target process CPU usage (100 = one full core)
    pub target_cpu_pct: f32,
    /// Target process resident memory in MB
    pub target_memory_mb: f64,

    /// Dominant bottleneck, assigned by the classifier
    pub bottleneck: Bottleneck,
    /// Normalized per-label confidence scores
    pub scores: Scores,
}

impl MetricsSnapshot {
    /// Highest single-core usage, 0 when per-core data is missing.
    pub fn max_core_pct(&self) -> f32 {
        self.cpu_per_core_pct.iter().copied().fold(0.0, f32::max)
    }
}

/// Baseline snapshot for unit tests: idle CPU, moderate memory, no GPU,
/// no target process.
#[cfg(test)]
pub(crate) fn baseline_snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        timestamp: Utc::now(),
        cpu_overall_pct: 10.0,
        cpu_per_core_pct: vec![10.0, 10.0, 10.0, 10.0],
        memory_pct: 40.0,
        memory_used_gb: 6.4,
        memory_available_gb: 9.6,
        gpu_available: false,
        gpu_utilization_pct: 0.0,
        gpu_memory_pct: 0.0,
        gpu_memory_used_gb: 0.0,
        gpu_temperature_c: 0.0,
        target_found: false,
        target_cpu_pct: 0.0,
        target_memory_mb: 0.0,
        bottleneck: Bottleneck::None,
        scores: Scores::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominant_prefers_earlier_label_on_exact_tie() {
        let scores = Scores {
            cpu: 0.5,
            memory: 0.5,
            gpu: 0.0,
            gpu_memory: 0.0,
            none: 0.0,
        };
        assert_eq!(scores.dominant(), Bottleneck::Cpu);

        let scores = Scores {
            cpu: 0.0,
            memory: 0.2,
            gpu: 0.4,
            gpu_memory: 0.4,
            none: 0.0,
        };
        assert_eq!(scores.dominant(), Bottleneck::Gpu);
    }

    #[test]
    fn iter_follows_priority_order() {
        let labels: Vec<Bottleneck> = Scores::default().iter().map(|(l, _)| l).collect();
        assert_eq!(labels, Bottleneck::ALL);
    }

    #[test]
    fn max_core_is_zero_without_per_core_data() {
        let mut snapshot = baseline_snapshot();
        snapshot.cpu_per_core_pct.clear();
        assert_eq!(snapshot.max_core_pct(), 0.0);
    }
}
