//! Threshold definitions for bottleneck-rs.
//!
//! This module defines the high-usage thresholds the classifier scores
//! against. Values are percentages.

/// Threshold configuration for bottleneck scoring.
///
/// Passed to the classifier as an immutable value; the defaults match the
/// tuning the tool ships with.
#[derive(Clone, Debug)]
pub struct Thresholds {
    /// Overall CPU usage considered high (%)
    pub cpu_high: f64,
    /// Memory usage considered high (%)
    pub memory_high: f64,
    /// GPU utilization considered high (%)
    pub gpu_high: f64,
    /// GPU memory usage considered high (%)
    pub gpu_memory_high: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cpu_high: 85.0,
            memory_high: 85.0,
            gpu_high: 90.0,
            gpu_memory_high: 85.0,
        }
    }
}
