//! Snapshot collection for bottleneck-rs.
//!
//! The [`Sampler`] performs one full sampling pass: host CPU and memory via
//! `sysinfo`, GPU via the sysfs provider, and the target process by
//! case-insensitive name matching. Every snapshot is classified before it
//! is returned, so the history only ever holds fully classified samples.
//!
//! [`spawn`] runs the sampler on its own thread at a fixed period,
//! independent of the render cadence; the two activities share only the
//! history behind its mutex.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use sysinfo::System;

use crate::classifier;
use crate::gpu::{GpuDevice, GpuSample};
use crate::history::History;
use crate::metrics::{Bottleneck, MetricsSnapshot, Scores};
use crate::thresholds::Thresholds;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Collects one classified snapshot per tick.
pub struct Sampler {
    /// System information collector
    sys: System,
    /// GPU handle, probed once at construction
    gpu: Option<GpuDevice>,
    /// Lowercased process name patterns to match against
    patterns: Vec<String>,
    /// Classification thresholds
    thresholds: Thresholds,
}

impl Sampler {
    /// Create a sampler matching processes against `patterns`.
    ///
    /// GPU availability is resolved here, once; a GPU appearing later is
    /// not picked up until restart.
    pub fn new(patterns: Vec<String>, thresholds: Thresholds) -> Self {
        Self {
            sys: System::new_all(),
            gpu: GpuDevice::probe(),
            patterns: patterns.iter().map(|p| p.to_lowercase()).collect(),
            thresholds,
        }
    }

    /// Whether a GPU metrics source was detected at startup.
    pub fn gpu_available(&self) -> bool {
        self.gpu.is_some()
    }

    /// Collect host, GPU, and target-process metrics into one classified
    /// snapshot.
    ///
    /// Individual source failures degrade to zero sentinels; collection
    /// itself never fails.
    pub fn collect(&mut self) -> MetricsSnapshot {
        self.sys.refresh_all();
        let timestamp = Utc::now();

        let cpu_per_core_pct: Vec<f32> = self.sys.cpus().iter().map(|c| c.cpu_usage()).collect();
        let cpu_overall_pct =
            cpu_per_core_pct.iter().sum::<f32>() / cpu_per_core_pct.len().max(1) as f32;

        let mem_total = self.sys.total_memory();
        let mem_used = self.sys.used_memory();
        let mem_available = self.sys.available_memory();
        let memory_pct = if mem_total > 0 {
            mem_used as f32 / mem_total as f32 * 100.0
        } else {
            0.0
        };

        let gpu_sample: GpuSample = self.gpu.as_ref().map(|g| g.read()).unwrap_or_default();

        let (target_found, target_cpu_pct, target_memory_mb) = self.read_target_process();

        let mut snapshot = MetricsSnapshot {
            timestamp,
            cpu_overall_pct,
            cpu_per_core_pct,
            memory_pct,
            memory_used_gb: mem_used as f64 / BYTES_PER_GB,
            memory_available_gb: mem_available as f64 / BYTES_PER_GB,
            gpu_available: self.gpu.is_some(),
            gpu_utilization_pct: gpu_sample.utilization_pct,
            gpu_memory_pct: gpu_sample.memory_pct,
            gpu_memory_used_gb: gpu_sample.memory_used_gb,
            gpu_temperature_c: gpu_sample.temperature_c,
            target_found,
            target_cpu_pct,
            target_memory_mb,
            bottleneck: Bottleneck::None,
            scores: Scores::default(),
        };

        let (bottleneck, scores) = classifier::classify(&snapshot, &self.thresholds);
        snapshot.bottleneck = bottleneck;
        snapshot.scores = scores;

        snapshot
    }

    /// First process whose name contains any configured pattern,
    /// case-insensitive. Returns `(found, cpu_pct, memory_mb)` with zeros
    /// when nothing matches.
    fn read_target_process(&self) -> (bool, f32, f64) {
        for process in self.sys.processes().values() {
            let name = process.name().to_string_lossy().to_lowercase();
            if self.patterns.iter().any(|p| name.contains(p.as_str())) {
                let cpu_pct = process.cpu_usage();
                let memory_mb = process.memory() as f64 / BYTES_PER_MB;
                return (true, cpu_pct, memory_mb);
            }
        }
        (false, 0.0, 0.0)
    }
}

/// Spawn the background sampling thread.
///
/// Pushes one classified snapshot per `interval` until `running` clears.
/// An in-flight collection always completes before the thread exits, so
/// the history never sees a partial snapshot.
pub fn spawn(
    mut sampler: Sampler,
    history: Arc<Mutex<History>>,
    running: Arc<AtomicBool>,
    interval: Duration,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while running.load(Ordering::Relaxed) {
            let snapshot = sampler.collect();
            if let Ok(mut history) = history.lock() {
                history.push(snapshot);
            }
            thread::sleep(interval);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_produces_a_classified_snapshot() {
        let mut sampler = Sampler::new(
            vec!["bottleneck-rs-no-such-process".into()],
            Thresholds::default(),
        );
        let snapshot = sampler.collect();

        assert!(!snapshot.cpu_per_core_pct.is_empty());
        assert_eq!(snapshot.bottleneck, snapshot.scores.dominant());
        assert!((snapshot.scores.total() - 1.0).abs() < 1e-9);
        assert!(!snapshot.target_found);
        assert_eq!(snapshot.target_cpu_pct, 0.0);
        assert_eq!(snapshot.target_memory_mb, 0.0);
    }

    #[test]
    fn spawned_thread_pushes_and_stops() {
        let sampler = Sampler::new(Vec::new(), Thresholds::default());
        let history = Arc::new(Mutex::new(History::new(16)));
        let running = Arc::new(AtomicBool::new(true));

        let handle = spawn(
            sampler,
            history.clone(),
            running.clone(),
            Duration::from_millis(10),
        );
        thread::sleep(Duration::from_millis(300));
        running.store(false, Ordering::Relaxed);
        handle.join().expect("sampler thread should exit cleanly");

        let history = history.lock().unwrap();
        assert!(!history.is_empty());
        let timestamps: Vec<_> = history.iter().map(|m| m.timestamp).collect();
        assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
    }
}
