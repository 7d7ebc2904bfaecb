//! # bottleneck-rs
//!
//! A real-time performance bottleneck monitor for games and simulators.
//!
//! ## Overview
//!
//! `bottleneck-rs` answers the question "what is limiting my frame rate
//! right now?" by continuously sampling host and per-process metrics and
//! classifying the dominant bottleneck among competing resources:
//!
//! - CPU (overall load or a single saturated core)
//! - System memory pressure
//! - GPU compute saturation
//! - GPU memory (VRAM) exhaustion
//!
//! ## Features
//!
//! - **Background Sampling**: One snapshot per second of CPU (overall and
//!   per-core), memory, GPU, and the target process
//! - **Bottleneck Classification**: Weighted heuristic scoring normalized
//!   into a confidence per resource dimension
//! - **Windowed Analysis**: Frequencies and averaged confidences over a
//!   trailing window, smoothing out single-sample spikes
//! - **Recommendations**: Actionable advice for the detected bottleneck
//! - **TUI Dashboard**: Real-time terminal UI with charts and confidence
//!   bars; headless and JSON output modes for non-interactive use
//!
//! ## Usage
//!
//! ```bash
//! # Run with TUI (default)
//! bottleneck-rs
//!
//! # Watch a specific process
//! bottleneck-rs --process dcs.exe
//!
//! # Headless JSON stream
//! bottleneck-rs --headless --json
//! ```
//!
//! ## Module Organization
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`metrics`]: Snapshot, label, and score data structures
//! - [`thresholds`]: High-usage thresholds for scoring
//! - [`classifier`]: Bottleneck scoring and selection
//! - [`sampler`]: Metric collection and the background sampling thread
//! - [`gpu`]: GPU metrics via sysfs
//! - [`history`]: In-memory snapshot ring buffer
//! - [`analyzer`]: Windowed summaries
//! - [`recommendations`]: Advice generation
//! - [`app`]: Shared application state
//! - [`ui`]: Terminal user interface

mod analyzer;
mod app;
mod classifier;
mod config;
mod gpu;
mod history;
mod metrics;
mod recommendations;
mod sampler;
mod thresholds;
mod ui;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use app::App;
use config::Config;

fn main() -> std::io::Result<()> {
    // GPU metrics come from /sys; other platforms degrade to CPU/memory only.
    #[cfg(not(target_os = "linux"))]
    {
        eprintln!("Warning: GPU metrics are read from /sys and are Linux-only.");
        eprintln!("CPU, memory, and process monitoring will still work.");
        eprintln!();
    }

    let config = Config::parse();
    let mut app = App::new(config.clone());

    // Setup Ctrl+C / SIGTERM handler
    let running = Arc::new(AtomicBool::new(true));
    setup_signal_handler(running.clone());

    let sampler_handle = app.start_sampling(running.clone());

    // Give the sampler a head start so the first frame has data.
    std::thread::sleep(Duration::from_millis(500));

    // Check if stdout is a TTY - if not, force headless mode
    let use_headless = config.headless || !is_terminal();
    if !config.headless && !is_terminal() {
        eprintln!("Warning: stdout is not a TTY, running in headless mode");
    }

    let result = if use_headless {
        ui::run_headless(&app, &running)
    } else {
        ui::run(&app, &running)
    };

    // Stop the sampler and let any in-flight collection finish.
    running.store(false, Ordering::Relaxed);
    if let Some(handle) = sampler_handle {
        let _ = handle.join();
    }

    result
}

/// Global flag for signal handler (must be static for signal safety).
static SIGNAL_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Set up signal handlers for graceful shutdown.
fn setup_signal_handler(running: Arc<AtomicBool>) {
    // Spawn a thread to monitor the signal flag and propagate to running
    let running_clone = running.clone();
    std::thread::spawn(move || {
        while running_clone.load(Ordering::Relaxed) {
            if SIGNAL_RECEIVED.load(Ordering::Relaxed) {
                running_clone.store(false, Ordering::Relaxed);
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(50));
        }
    });

    unsafe {
        libc::signal(
            libc::SIGINT,
            signal_handler as *const () as libc::sighandler_t,
        );
        libc::signal(
            libc::SIGTERM,
            signal_handler as *const () as libc::sighandler_t,
        );
    }
}

/// Signal handler that sets the signal flag (async-signal-safe).
extern "C" fn signal_handler(_: i32) {
    SIGNAL_RECEIVED.store(true, Ordering::Relaxed);
}

/// Check if stdout is connected to a terminal.
fn is_terminal() -> bool {
    unsafe { libc::isatty(libc::STDOUT_FILENO) != 0 }
}
