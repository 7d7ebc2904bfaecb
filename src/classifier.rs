//! Bottleneck classification for bottleneck-rs.
//!
//! This module scores a metrics snapshot against each resource dimension
//! and selects the dominant bottleneck. Scoring is additive: a bucket can
//! receive several contributions (tiered single-core pressure, linear
//! excess over a threshold, target-process load), which avoids oscillating
//! classifications near a single hard cutoff. The raw buckets are then
//! normalized into a relative-confidence distribution.

use crate::metrics::{Bottleneck, MetricsSnapshot, Scores};
use crate::thresholds::Thresholds;

/// Single-core usage above this means a saturated core (%).
const CORE_SATURATED: f64 = 85.0;
/// Single-core usage above this means heavy single-thread load (%).
const CORE_HIGH: f64 = 70.0;
/// Single-core usage above this means some single-thread pressure (%).
const CORE_ELEVATED: f64 = 60.0;
/// Target process using more than 1.5 logical cores (%).
const TARGET_CPU_HEAVY: f64 = 150.0;
/// Target process using more than one logical core (%).
const TARGET_CPU_FULL_CORE: f64 = 100.0;
/// Below this maximum bucket value, no bottleneck is flagged.
const NONE_FLOOR: f64 = 0.3;

/// Classify a snapshot into a dominant bottleneck and a normalized
/// confidence score per label.
///
/// Pure function of the snapshot and thresholds: no history access, no
/// side effects, deterministic.
pub fn classify(snapshot: &MetricsSnapshot, thresholds: &Thresholds) -> (Bottleneck, Scores) {
    let mut scores = Scores::default();

    // A single saturated core limits single-threaded workloads long before
    // the overall average looks busy, so max core usage leads the CPU score.
    let max_core = f64::from(snapshot.max_core_pct());
    if max_core > CORE_SATURATED {
        scores.cpu += 0.8;
    } else if max_core > CORE_HIGH {
        scores.cpu += 0.5;
    } else if max_core > CORE_ELEVATED {
        scores.cpu += 0.3;
    }

    // Overall CPU carries less weight than core saturation.
    let overall = f64::from(snapshot.cpu_overall_pct);
    if overall > thresholds.cpu_high {
        scores.cpu += (overall - thresholds.cpu_high) / 30.0;
    }

    let target_cpu = f64::from(snapshot.target_cpu_pct);
    if target_cpu > TARGET_CPU_HEAVY {
        scores.cpu += 0.4;
    } else if target_cpu > TARGET_CPU_FULL_CORE {
        scores.cpu += 0.2;
    }

    let memory = f64::from(snapshot.memory_pct);
    if memory > thresholds.memory_high {
        scores.memory += (memory - thresholds.memory_high) / 15.0;
    }

    // Sentinel zeros from an absent GPU must never score, so these buckets
    // are gated on the capability flag rather than the values.
    if snapshot.gpu_available {
        if snapshot.gpu_utilization_pct > thresholds.gpu_high {
            scores.gpu += (snapshot.gpu_utilization_pct - thresholds.gpu_high) / 10.0;
        }
        if snapshot.gpu_memory_pct > thresholds.gpu_memory_high {
            scores.gpu_memory += (snapshot.gpu_memory_pct - thresholds.gpu_memory_high) / 15.0;
        }
    }

    // No dimension stands out: flag None without zeroing the residual
    // signals, so they still show up in the normalized confidences.
    let max_score = scores
        .cpu
        .max(scores.memory)
        .max(scores.gpu)
        .max(scores.gpu_memory);
    if max_score < NONE_FLOOR {
        scores.none = 1.0;
    }

    let total = scores.total();
    if total > 0.0 {
        scores.cpu /= total;
        scores.memory /= total;
        scores.gpu /= total;
        scores.gpu_memory /= total;
        scores.none /= total;
    } else {
        // Unreachable given the None floor, but guard the division anyway.
        return (Bottleneck::None, scores);
    }

    (scores.dominant(), scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::baseline_snapshot;

    const TOLERANCE: f64 = 1e-9;

    fn classify_default(snapshot: &MetricsSnapshot) -> (Bottleneck, Scores) {
        classify(snapshot, &Thresholds::default())
    }

    #[test]
    fn saturated_core_dominates() {
        let mut snapshot = baseline_snapshot();
        snapshot.cpu_per_core_pct = vec![90.0, 10.0, 10.0, 10.0];
        snapshot.cpu_overall_pct = 50.0;

        let (label, scores) = classify_default(&snapshot);
        // Only the 0.8 single-core tier fires, so it normalizes to 1.0.
        assert_eq!(label, Bottleneck::Cpu);
        assert!((scores.cpu - 1.0).abs() < TOLERANCE);
        assert_eq!(scores.none, 0.0);
    }

    #[test]
    fn baseline_classifies_as_none() {
        let (label, scores) = classify_default(&baseline_snapshot());
        assert_eq!(label, Bottleneck::None);
        assert_eq!(scores.cpu, 0.0);
        assert_eq!(scores.memory, 0.0);
        assert_eq!(scores.gpu, 0.0);
        assert_eq!(scores.gpu_memory, 0.0);
        assert!((scores.none - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn high_memory_classifies_as_memory() {
        let mut snapshot = baseline_snapshot();
        snapshot.memory_pct = 95.0;

        let (label, scores) = classify_default(&snapshot);
        // (95 - 85) / 15 = 0.667 exceeds the None floor and is the only
        // nonzero bucket, so it normalizes to 1.0.
        assert_eq!(label, Bottleneck::Memory);
        assert!((scores.memory - 1.0).abs() < TOLERANCE);
        assert_eq!(scores.none, 0.0);
    }

    #[test]
    fn scores_sum_to_one() {
        let mut snapshot = baseline_snapshot();
        snapshot.cpu_overall_pct = 97.0;
        snapshot.cpu_per_core_pct = vec![99.0, 95.0, 88.0, 72.0];
        snapshot.memory_pct = 93.0;
        snapshot.gpu_available = true;
        snapshot.gpu_utilization_pct = 99.0;
        snapshot.gpu_memory_pct = 97.0;
        snapshot.target_found = true;
        snapshot.target_cpu_pct = 180.0;

        let (label, scores) = classify_default(&snapshot);
        assert!((scores.total() - 1.0).abs() < TOLERANCE);
        assert_eq!(label, scores.dominant());
    }

    #[test]
    fn unavailable_gpu_never_scores() {
        let mut snapshot = baseline_snapshot();
        snapshot.gpu_available = false;
        snapshot.gpu_utilization_pct = 100.0;
        snapshot.gpu_memory_pct = 100.0;

        let (label, scores) = classify_default(&snapshot);
        assert_eq!(scores.gpu, 0.0);
        assert_eq!(scores.gpu_memory, 0.0);
        assert_eq!(label, Bottleneck::None);
    }

    #[test]
    fn equal_cpu_and_memory_buckets_resolve_to_cpu() {
        let mut snapshot = baseline_snapshot();
        // 0.5 from the >70% core tier, 0.5 from (92.5 - 85) / 15.
        snapshot.cpu_per_core_pct = vec![75.0, 10.0, 10.0, 10.0];
        snapshot.memory_pct = 92.5;

        let (label, scores) = classify_default(&snapshot);
        assert!((scores.cpu - scores.memory).abs() < TOLERANCE);
        assert_eq!(label, Bottleneck::Cpu);
    }

    #[test]
    fn overall_cpu_excess_is_uncapped_and_linear() {
        let mut snapshot = baseline_snapshot();
        snapshot.cpu_overall_pct = 100.0;
        snapshot.cpu_per_core_pct = vec![10.0; 4];

        let (label, scores) = classify_default(&snapshot);
        // Only bucket is (100 - 85) / 30 = 0.5.
        assert_eq!(label, Bottleneck::Cpu);
        assert!((scores.cpu - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn weak_signals_dilute_none_confidence() {
        let mut snapshot = baseline_snapshot();
        snapshot.memory_pct = 87.0;

        let (label, scores) = classify_default(&snapshot);
        // Memory bucket is (87 - 85) / 15 = 0.133, below the floor, so None
        // fires at 1.0 but the residual memory signal still dilutes it.
        assert_eq!(label, Bottleneck::None);
        assert!(scores.none < 1.0);
        assert!(scores.memory > 0.0);
        assert!((scores.total() - 1.0).abs() < TOLERANCE);
    }
}
