//! Command-line configuration for bottleneck-rs.
//!
//! This module defines all CLI arguments using `clap` for parsing.
//! The configuration controls sampling and display cadence, the analysis
//! window, history capacity, and the target process patterns.

use clap::Parser;

/// Process name variants the target simulator is known to run under.
///
/// Tuned for Falcon BMS (native or under Wine/Proton); extend with
/// `--process` for other applications. Matching is case-insensitive
/// substring, first match wins.
pub const DEFAULT_TARGET_PATTERNS: [&str; 4] =
    ["Falcon BMS.exe", "bms.exe", "falcon4.exe", "FalconBMS.exe"];

/// Real-time performance bottleneck monitor.
///
/// bottleneck-rs continuously samples host CPU, memory, and GPU usage plus
/// one target process, classifies the dominant bottleneck among them, and
/// shows a live dashboard with the classification, its confidence, and
/// actionable recommendations.
///
/// # Examples
///
/// ```bash
/// # Run with the TUI dashboard (default)
/// bottleneck-rs
///
/// # Watch a different process, sampling every 2 seconds
/// bottleneck-rs -i 2 --process dcs.exe
///
/// # Headless JSON output for piping into other tools
/// bottleneck-rs --headless --json
/// ```
#[derive(Parser, Debug, Clone)]
#[command(version, about = "Identify CPU, memory, and GPU bottlenecks in real time")]
pub struct Config {
    /// Interval in seconds between metric samples.
    ///
    /// One second matches the granularity of the per-core counters; larger
    /// values reduce overhead at the cost of slower bottleneck detection.
    #[arg(short, long, default_value_t = 1)]
    pub interval: u64,

    /// Interval in seconds between display refreshes.
    ///
    /// The display reads the shared history and never blocks sampling, so
    /// it can run on a slower cadence.
    #[arg(short, long, default_value_t = 2)]
    pub refresh: u64,

    /// Trailing analysis window in seconds.
    ///
    /// Bottleneck frequencies and averaged confidences are computed over
    /// this window, smoothing out single-sample spikes.
    #[arg(short, long, default_value_t = 30)]
    pub window: u64,

    /// Number of snapshots to keep in the in-memory history.
    ///
    /// At 1-second sampling, 300 snapshots = 5 minutes of history. Older
    /// snapshots are evicted; nothing is persisted to disk.
    #[arg(long, default_value_t = 300)]
    pub history_size: usize,

    /// Additional target process name patterns (repeatable).
    ///
    /// Patterns are matched case-insensitively as substrings of live
    /// process names, on top of the built-in defaults.
    #[arg(short, long = "process", value_name = "PATTERN")]
    pub processes: Vec<String>,

    /// Run in headless mode (no TUI, one status line per refresh).
    ///
    /// Useful over SSH or when piping output. Forced automatically when
    /// stdout is not a terminal.
    #[arg(long)]
    pub headless: bool,

    /// In headless mode, print each window summary as a JSON line.
    #[arg(long)]
    pub json: bool,
}

impl Config {
    /// Built-in allow-list plus any user-supplied patterns.
    pub fn target_patterns(&self) -> Vec<String> {
        let mut patterns: Vec<String> = DEFAULT_TARGET_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .collect();
        patterns.extend(self.processes.iter().cloned());
        patterns
    }
}
