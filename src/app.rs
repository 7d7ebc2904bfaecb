//! Application state for bottleneck-rs.
//!
//! This module contains the [`App`] struct which wires the background
//! sampler to the display: it owns the shared history, the read helpers
//! the renderer uses, and the capability flags probed at startup.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use chrono::Utc;

use crate::analyzer::{self, WindowSummary};
use crate::config::Config;
use crate::history::History;
use crate::metrics::MetricsSnapshot;
use crate::sampler::{self, Sampler};
use crate::thresholds::Thresholds;

/// Multiple of the sample interval after which data counts as stale.
const STALE_INTERVALS: i64 = 3;

/// Main application state.
///
/// The sampler is constructed here so availability probing happens once,
/// then handed to the background thread by [`App::start_sampling`]. After
/// that the app only reads the shared history.
pub struct App {
    /// Application configuration from CLI
    pub config: Config,
    /// Classification thresholds
    pub thresholds: Thresholds,
    /// Whether a GPU metrics source was detected at startup
    pub gpu_available: bool,
    /// Shared snapshot history, written by the sampling thread
    history: Arc<Mutex<History>>,
    /// Sampler, present until the background thread takes it
    sampler: Option<Sampler>,
}

impl App {
    /// Create a new application instance, probing metric sources.
    pub fn new(config: Config) -> Self {
        let thresholds = Thresholds::default();
        let sampler = Sampler::new(config.target_patterns(), thresholds.clone());
        let gpu_available = sampler.gpu_available();
        let history = Arc::new(Mutex::new(History::new(config.history_size)));

        Self {
            config,
            thresholds,
            gpu_available,
            history,
            sampler: Some(sampler),
        }
    }

    /// Start the background sampling thread.
    ///
    /// May only be called once; later calls are a no-op returning `None`.
    pub fn start_sampling(&mut self, running: Arc<AtomicBool>) -> Option<JoinHandle<()>> {
        let sampler = self.sampler.take()?;
        Some(sampler::spawn(
            sampler,
            Arc::clone(&self.history),
            running,
            Duration::from_secs(self.config.interval.max(1)),
        ))
    }

    /// Most recent snapshot, if any.
    pub fn latest(&self) -> Option<MetricsSnapshot> {
        self.history
            .lock()
            .ok()
            .and_then(|history| history.latest().cloned())
    }

    /// All retained snapshots, oldest first (for the trailing charts).
    pub fn snapshots(&self) -> Vec<MetricsSnapshot> {
        self.history
            .lock()
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of retained snapshots.
    pub fn sample_count(&self) -> usize {
        self.history.lock().map(|history| history.len()).unwrap_or(0)
    }

    /// Window summary over the configured analysis window.
    pub fn summary(&self) -> Option<WindowSummary> {
        self.history
            .lock()
            .ok()
            .and_then(|history| analyzer::summarize(&history, self.config.window))
    }

    /// Whether the newest snapshot is older than a small multiple of the
    /// sample interval, indicating the sampling thread has stalled.
    pub fn is_stale(&self) -> bool {
        match self.latest() {
            Some(snapshot) => {
                let age = Utc::now() - snapshot.timestamp;
                age.num_seconds() > STALE_INTERVALS * self.config.interval.max(1) as i64
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn test_app() -> App {
        App::new(Config::parse_from(["bottleneck-rs", "--history-size", "8"]))
    }

    #[test]
    fn starts_empty_and_not_stale() {
        let app = test_app();
        assert!(app.latest().is_none());
        assert!(app.summary().is_none());
        assert_eq!(app.sample_count(), 0);
        assert!(!app.is_stale());
    }

    #[test]
    fn sampling_can_only_start_once() {
        let mut app = test_app();
        let running = Arc::new(AtomicBool::new(false));
        let first = app.start_sampling(Arc::clone(&running));
        assert!(first.is_some());
        assert!(app.start_sampling(Arc::clone(&running)).is_none());
        if let Some(handle) = first {
            let _ = handle.join();
        }
    }
}
