//! Actionable recommendations for bottleneck-rs.
//!
//! This module maps a classified snapshot to advice the user can act on.
//! The mapping is deterministic: the same snapshot always yields the same
//! recommendation list.

use crate::metrics::{Bottleneck, MetricsSnapshot};

/// Single-core usage above which CPU advice targets single-thread limits (%).
const SINGLE_CORE_ADVICE: f32 = 80.0;
/// Single-core usage worth a note even without a flagged bottleneck (%).
const SINGLE_CORE_NOTE: f32 = 60.0;

/// Generate advice for the snapshot's bottleneck, most relevant first.
///
/// Branches exhaustively on the label; the CPU branch further splits on
/// single-core saturation, since the fix for a single-thread limit
/// (faster cores) differs from the fix for overall load (fewer tasks).
pub fn recommend(snapshot: &MetricsSnapshot) -> Vec<String> {
    let max_core = snapshot.max_core_pct();

    match snapshot.bottleneck {
        Bottleneck::Cpu => {
            if max_core > SINGLE_CORE_ADVICE {
                vec![
                    format!("Single-core bottleneck detected (core at {:.0}%)", max_core),
                    "The target process is limited by single-threaded performance".into(),
                    "Faster single-core clocks will help more than extra cores".into(),
                    "Lower simulation-heavy settings: AI density, object counts, weather detail"
                        .into(),
                ]
            } else {
                vec![
                    "CPU bottleneck detected - reduce CPU-intensive settings".into(),
                    "Close unnecessary background applications".into(),
                    "Lower AI density and scenery object counts".into(),
                    "Consider upgrading to a faster CPU".into(),
                ]
            }
        }
        Bottleneck::Memory => vec![
            "Memory shortage detected - close unnecessary applications".into(),
            "Consider adding more RAM to your system".into(),
            "Lower texture quality in the target application".into(),
            "Check for memory leaks in background processes".into(),
        ],
        Bottleneck::Gpu => vec![
            "GPU bottleneck - lower graphics settings".into(),
            "Reduce anti-aliasing and post-processing effects".into(),
            "Lower render resolution or enable dynamic resolution scaling".into(),
            "Check GPU temperatures and fan curves".into(),
        ],
        Bottleneck::GpuMemory => vec![
            "GPU memory bottleneck - lower texture quality and resolution".into(),
            "Reduce visual range and object density".into(),
            "Close other GPU-intensive applications".into(),
            "Consider a GPU upgrade with more VRAM".into(),
        ],
        Bottleneck::None => {
            let mut recommendations = vec![
                "System performance appears balanced. No immediate bottlenecks detected."
                    .to_string(),
            ];
            if max_core > SINGLE_CORE_NOTE {
                recommendations.push(format!(
                    "Note: highest core usage is {:.0}% - monitor for single-core limits",
                    max_core
                ));
            }
            recommendations
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::baseline_snapshot;

    #[test]
    fn identical_snapshots_yield_identical_advice() {
        let mut snapshot = baseline_snapshot();
        snapshot.bottleneck = Bottleneck::Cpu;
        snapshot.cpu_per_core_pct = vec![92.0, 40.0, 35.0, 20.0];

        assert_eq!(recommend(&snapshot), recommend(&snapshot.clone()));
    }

    #[test]
    fn cpu_advice_splits_on_single_core_saturation() {
        let mut snapshot = baseline_snapshot();
        snapshot.bottleneck = Bottleneck::Cpu;

        snapshot.cpu_per_core_pct = vec![92.0, 40.0, 35.0, 20.0];
        let single_core = recommend(&snapshot);
        assert_eq!(single_core.len(), 4);
        assert!(single_core[0].contains("Single-core"));
        assert!(single_core[0].contains("92%"));

        snapshot.cpu_per_core_pct = vec![75.0; 4];
        let general = recommend(&snapshot);
        assert_eq!(general.len(), 4);
        assert!(general[0].contains("CPU bottleneck"));
    }

    #[test]
    fn every_flagged_bottleneck_gets_four_lines() {
        for label in [Bottleneck::Memory, Bottleneck::Gpu, Bottleneck::GpuMemory] {
            let mut snapshot = baseline_snapshot();
            snapshot.bottleneck = label;
            assert_eq!(recommend(&snapshot).len(), 4, "label {:?}", label);
        }
    }

    #[test]
    fn balanced_system_notes_elevated_core_usage() {
        let mut snapshot = baseline_snapshot();
        snapshot.bottleneck = Bottleneck::None;

        assert_eq!(recommend(&snapshot).len(), 1);

        snapshot.cpu_per_core_pct = vec![65.0, 10.0, 10.0, 10.0];
        let with_note = recommend(&snapshot);
        assert_eq!(with_note.len(), 2);
        assert!(with_note[1].contains("65%"));
    }
}
