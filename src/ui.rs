//! Terminal User Interface for bottleneck-rs.
//!
//! This module provides a real-time dashboard using `ratatui` that displays:
//!
//! - Status bar with timestamp, current bottleneck, and sample count
//! - System, GPU, and target-process panels
//! - Trailing charts for CPU, memory, and GPU utilization
//! - Bottleneck confidence bars and top recommendations
//!
//! A headless mode prints one status line (or JSON summary) per refresh
//! for non-interactive use.
//!
//! # Controls
//!
//! - `q` or `Esc`: Quit

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::Span,
    widgets::{
        Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, List, ListItem, Paragraph,
    },
    Frame, Terminal,
};

use crate::analyzer::WindowSummary;
use crate::app::App;
use crate::metrics::{Bottleneck, MetricsSnapshot};

/// Confidence below which a label is omitted from the bar display.
const CONFIDENCE_DISPLAY_FLOOR: f64 = 0.1;
/// How many recommendations the dashboard shows.
const MAX_RECOMMENDATIONS: usize = 3;

/// Run the TUI event loop.
///
/// Redraws on the configured refresh cadence until the user presses `q`
/// or `Esc`, or the `running` flag is cleared.
pub fn run(app: &App, running: &Arc<AtomicBool>) -> std::io::Result<()> {
    enable_raw_mode()?;
    if let Err(e) = std::io::stdout().execute(EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e);
    }

    let result = run_tui_loop(app, running);

    // Always clean up terminal state
    let _ = disable_raw_mode();
    let _ = std::io::stdout().execute(LeaveAlternateScreen);

    result
}

/// Inner TUI loop - separated to ensure cleanup happens on any exit path.
fn run_tui_loop(app: &App, running: &Arc<AtomicBool>) -> std::io::Result<()> {
    let backend = CrosstermBackend::new(std::io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let refresh = Duration::from_secs(app.config.refresh.max(1));
    let mut last_draw: Option<Instant> = None;

    while running.load(Ordering::Relaxed) {
        // Check for input
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => {
                            running.store(false, Ordering::Relaxed);
                        }
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            running.store(false, Ordering::Relaxed);
                        }
                        _ => {}
                    }
                }
            }
        }

        // Redraw on the render cadence, independent of sampling
        let due = last_draw.map(|t| t.elapsed() >= refresh).unwrap_or(true);
        if due {
            let summary = app.summary();
            terminal.draw(|f| draw_ui(f, app, summary.as_ref()))?;
            last_draw = Some(Instant::now());
        }
    }

    Ok(())
}

/// Main UI drawing function.
fn draw_ui(f: &mut Frame, app: &App, summary: Option<&WindowSummary>) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Status bar
            Constraint::Length(8), // System / GPU / target panels
            Constraint::Min(10),   // Charts
            Constraint::Length(9), // Bottleneck analysis + recommendations
        ])
        .split(size);

    draw_status_bar(f, app, summary, chunks[0]);

    let summary = match summary {
        Some(summary) => summary,
        None => {
            let loading = Paragraph::new("Collecting initial metrics...").block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title("Metrics"),
            );
            f.render_widget(loading, chunks[1]);
            return;
        }
    };

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[1]);

    draw_system_panel(f, &summary.current, panels[0]);
    draw_gpu_panel(f, &summary.current, panels[1]);
    draw_target_panel(f, &summary.current, panels[2]);

    draw_charts(f, app, chunks[2]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[3]);

    draw_bottleneck_panel(f, summary, bottom[0]);
    draw_recommendations(f, summary, bottom[1]);
}

/// Draw the top status bar.
fn draw_status_bar(f: &mut Frame, app: &App, summary: Option<&WindowSummary>, area: Rect) {
    let status_text = if let Some(summary) = summary {
        let stale = if app.is_stale() { " | ⚠ STALE DATA" } else { "" };
        format!(
            " bottleneck-rs | {} | Bottleneck: {} | Samples: {}{} | [q]uit",
            summary.current.timestamp.format("%Y-%m-%d %H:%M:%S"),
            summary.current_bottleneck,
            app.sample_count(),
            stale,
        )
    } else {
        " bottleneck-rs | Collecting initial metrics... | [q]uit".to_string()
    };

    let status = Paragraph::new(status_text)
        .style(Style::default().fg(Color::White).bg(Color::DarkGray))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title("Status"),
        );

    f.render_widget(status, area);
}

/// Draw the host CPU and memory panel.
fn draw_system_panel(f: &mut Frame, current: &MetricsSnapshot, area: Rect) {
    let mut items = vec![
        ListItem::new(format!(
            "CPU:      {:>5.1}% overall",
            current.cpu_overall_pct
        )),
        ListItem::new(format!("Max core: {:>5.1}%", current.max_core_pct())),
    ];

    // Top active cores, busiest first, quiet cores skipped.
    let mut cores: Vec<(usize, f32)> = current
        .cpu_per_core_pct
        .iter()
        .copied()
        .enumerate()
        .collect();
    cores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let active: Vec<String> = cores
        .iter()
        .take(4)
        .filter(|(_, usage)| *usage > 5.0)
        .map(|(core, usage)| format!("C{}:{:.0}%", core, usage))
        .collect();
    if !active.is_empty() {
        items.push(ListItem::new(format!("Active:   {}", active.join(" "))));
    }

    items.push(ListItem::new(format!(
        "Memory:   {:>5.1}%",
        current.memory_pct
    )));
    items.push(ListItem::new(format!(
        "Used:     {:>5.1} GB ({:.1} GB free)",
        current.memory_used_gb, current.memory_available_gb
    )));

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title("System"),
    );
    f.render_widget(list, area);
}

/// Draw the GPU panel, or an unavailable notice.
fn draw_gpu_panel(f: &mut Frame, current: &MetricsSnapshot, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title("GPU");

    if !current.gpu_available {
        let notice = Paragraph::new("Not available\n(no supported GPU metrics source)")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(notice, area);
        return;
    }

    let items = vec![
        ListItem::new(format!("Usage:    {:>5.1}%", current.gpu_utilization_pct)),
        ListItem::new(format!("Memory:   {:>5.1}%", current.gpu_memory_pct)),
        ListItem::new(format!("VRAM:     {:>5.1} GB", current.gpu_memory_used_gb)),
        ListItem::new(format!("Temp:     {:>5.0}°C", current.gpu_temperature_c)),
    ];
    f.render_widget(List::new(items).block(block), area);
}

/// Draw the target-process panel, or a not-detected notice.
fn draw_target_panel(f: &mut Frame, current: &MetricsSnapshot, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title("Target Process");

    if !current.target_found {
        let notice = Paragraph::new("Not detected\n(not running or different process name)")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(notice, area);
        return;
    }

    let items = vec![
        ListItem::new(format!("CPU:      {:>6.1}%", current.target_cpu_pct)),
        ListItem::new(format!("Memory:   {:>6.0} MB", current.target_memory_mb)),
    ];
    f.render_widget(List::new(items).block(block), area);
}

/// Draw the trailing utilization charts.
fn draw_charts(f: &mut Frame, app: &App, area: Rect) {
    let snapshots = app.snapshots();
    if snapshots.is_empty() {
        return;
    }

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    draw_percent_chart(
        f,
        &snapshots,
        cols[0],
        "CPU %",
        |m| f64::from(m.cpu_overall_pct),
        app.thresholds.cpu_high,
        Color::Yellow,
    );
    draw_percent_chart(
        f,
        &snapshots,
        cols[1],
        "Memory %",
        |m| f64::from(m.memory_pct),
        app.thresholds.memory_high,
        Color::Green,
    );

    if app.gpu_available {
        draw_percent_chart(
            f,
            &snapshots,
            cols[2],
            "GPU %",
            |m| m.gpu_utilization_pct,
            app.thresholds.gpu_high,
            Color::Magenta,
        );
    } else {
        let notice = Paragraph::new("GPU not available")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title("GPU %"),
            );
        f.render_widget(notice, cols[2]);
    }
}

/// Draw one percentage chart with a threshold line.
fn draw_percent_chart<F>(
    f: &mut Frame,
    snapshots: &[MetricsSnapshot],
    area: Rect,
    title: &str,
    value_fn: F,
    threshold: f64,
    color: Color,
) where
    F: Fn(&MetricsSnapshot) -> f64,
{
    let data: Vec<(f64, f64)> = snapshots
        .iter()
        .enumerate()
        .map(|(i, m)| (i as f64, value_fn(m)))
        .collect();

    let latest = data.last().map(|(_, y)| *y).unwrap_or(0.0);
    let max_y = data.iter().map(|(_, y)| *y).fold(100.0, f64::max);

    let exceeded = latest >= threshold;
    let (border_color, title_style) = if exceeded {
        (
            Color::Red,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else {
        (Color::White, Style::default().fg(Color::White))
    };

    let threshold_line = vec![(0.0, threshold), (data.len() as f64, threshold)];
    let datasets = vec![
        Dataset::default()
            .name(title)
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(color))
            .data(&data),
        Dataset::default()
            .name("high")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&threshold_line),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(Span::styled(title, title_style))
                .border_style(Style::default().fg(border_color)),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, data.len() as f64]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .labels(vec![
                    Span::raw("0"),
                    Span::styled(format!("{:.0}", threshold), Style::default().fg(Color::Red)),
                    Span::raw(format!("{:.0}", max_y)),
                ])
                .bounds([0.0, max_y * 1.05]),
        );

    f.render_widget(chart, area);
}

/// Color associated with a bottleneck label.
fn label_color(label: Bottleneck) -> Color {
    match label {
        Bottleneck::Cpu => Color::Yellow,
        Bottleneck::Memory => Color::Green,
        Bottleneck::Gpu => Color::Magenta,
        Bottleneck::GpuMemory => Color::LightMagenta,
        Bottleneck::None => Color::Gray,
    }
}

/// Draw the bottleneck analysis panel: dominant label, confidence bars,
/// and the window frequency tally.
fn draw_bottleneck_panel(f: &mut Frame, summary: &WindowSummary, area: Rect) {
    let primary_style = if summary.current_bottleneck == Bottleneck::None {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    };

    let mut items = vec![ListItem::new(format!(
        "Primary: {}",
        summary.current_bottleneck
    ))
    .style(primary_style)];

    // Averaged confidences, strongest first, residual noise hidden.
    let mut confidences: Vec<(Bottleneck, f64)> = summary.confidence.iter().collect();
    confidences.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    for (label, confidence) in confidences {
        if confidence <= CONFIDENCE_DISPLAY_FLOOR {
            continue;
        }
        let bar = "█".repeat((confidence * 20.0) as usize);
        items.push(
            ListItem::new(format!(
                "{:<11} {:>5.1}% {}",
                label.label(),
                confidence * 100.0,
                bar
            ))
            .style(Style::default().fg(label_color(label))),
        );
    }

    items.push(ListItem::new(format!(
        "Window:  CPU {} | Mem {} | GPU {} | VRAM {} | None {}",
        summary.frequency.cpu,
        summary.frequency.memory,
        summary.frequency.gpu,
        summary.frequency.gpu_memory,
        summary.frequency.none,
    )));

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(format!("Bottleneck ({} samples)", summary.window_samples)),
    );
    f.render_widget(list, area);
}

/// Draw the top recommendations.
fn draw_recommendations(f: &mut Frame, summary: &WindowSummary, area: Rect) {
    let items: Vec<ListItem> = summary
        .recommendations
        .iter()
        .take(MAX_RECOMMENDATIONS)
        .enumerate()
        .map(|(i, rec)| ListItem::new(format!("{}. {}", i + 1, rec)))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title("Recommendations"),
    );
    f.render_widget(list, area);
}

/// Run in headless mode (no TUI, one line per refresh).
pub fn run_headless(app: &App, running: &Arc<AtomicBool>) -> std::io::Result<()> {
    let refresh = Duration::from_secs(app.config.refresh.max(1));

    if !app.config.json {
        println!("bottleneck-rs - Performance Bottleneck Monitor");
        println!("==============================================");
        println!(
            "Sampling every {}s, reporting every {}s",
            app.config.interval, app.config.refresh
        );
        if !app.gpu_available {
            println!("GPU metrics not available (no supported device found)");
        }
        println!("Press Ctrl+C to stop.\n");
    }

    while running.load(Ordering::Relaxed) {
        match app.summary() {
            Some(summary) if app.config.json => {
                if let Ok(line) = serde_json::to_string(&summary) {
                    println!("{}", line);
                }
            }
            Some(summary) => {
                let current = &summary.current;
                let gpu = if current.gpu_available {
                    format!("{:5.1}%", current.gpu_utilization_pct)
                } else {
                    "  n/a".to_string()
                };
                let target = if current.target_found {
                    format!("{:5.1}%", current.target_cpu_pct)
                } else {
                    "  n/a".to_string()
                };
                let stale = if app.is_stale() { " [STALE]" } else { "" };
                println!(
                    "[{}] CPU: {:5.1}% (max core {:5.1}%) | Mem: {:5.1}% | GPU: {} | Target: {} | Bottleneck: {} ({:.0}%) | Samples: {}{}",
                    current.timestamp.format("%H:%M:%S"),
                    current.cpu_overall_pct,
                    current.max_core_pct(),
                    current.memory_pct,
                    gpu,
                    target,
                    summary.current_bottleneck,
                    summary.confidence.get(summary.current_bottleneck) * 100.0,
                    app.sample_count(),
                    stale,
                );
            }
            None => println!("Collecting initial metrics..."),
        }

        std::thread::sleep(refresh);
    }

    if !app.config.json {
        println!("\nStopped.");
    }
    Ok(())
}
