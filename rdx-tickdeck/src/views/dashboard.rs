//! System resource dashboard.

use super::ViewProvider;
use crate::common::Mode;
use crate::engine::RenderState;
use crate::time::TickEvent;
use chrono::{DateTime, Local};
use colored::{Color, Colorize};
use sysinfo::System;
use tracing::trace;

/// One sample of the metrics shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemInfo {
    pub date_time: String,
    /// Percentage, 0 to 100.
    pub cpu_usage: f64,
    /// Bytes.
    pub mem_total: u64,
    pub mem_used: u64,
    pub mem_percent: f64,
    pub num_cpu: usize,
    pub os: String,
    pub arch: String,
}

/// The color a usage percentage is drawn in.
pub fn color_for_percent(pct: f64) -> Color {
    match pct {
        p if p >= 90.0 => Color::Red,
        p if p >= 70.0 => Color::Yellow,
        p if p >= 50.0 => Color::Magenta,
        _ => Color::Green,
    }
}

/// Human-readable size with binary units.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    match bytes {
        b if b >= GB => format!("{:.1} GB", b as f64 / GB as f64),
        b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{} B", b),
    }
}

/// `[████░░░░]` with `width` cells (at least two), clamped to 0..=100%.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let width = width.max(2);
    let filled = ((percent / 100.0) * width as f64).clamp(0.0, width as f64) as usize;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn render_dashboard(info: &SystemInfo) -> String {
    let frame = "╔══════════════════════════════════════╗\n\
                 ║       🖥  Dev Dashboard              ║\n\
                 ╚══════════════════════════════════════╝";
    let cpu = format!("{:.1}%", info.cpu_usage).color(color_for_percent(info.cpu_usage));
    let mem = format!("{:.1}%", info.mem_percent).color(color_for_percent(info.mem_percent));

    format!(
        "{}\n\n  {}  {}\n  {}   {}/{} ({} CPUs)\n\n  {}  {}  {}\n  {}    {}  {}  ({} / {})\n",
        frame.bold().cyan(),
        "📅 Date/Time:".bold(),
        info.date_time,
        "💻 Platform:".bold(),
        info.os,
        info.arch,
        info.num_cpu,
        "⚡ CPU Usage:".bold(),
        cpu,
        progress_bar(info.cpu_usage, 20),
        "🧠 Memory:".bold(),
        mem,
        progress_bar(info.mem_percent, 20),
        format_bytes(info.mem_used),
        format_bytes(info.mem_total),
    )
}

/// Resamples CPU and memory on every tick.
///
/// CPU usage is measured between consecutive refreshes, so the first
/// sample after startup reads as zero.
pub struct DashboardView {
    system: System,
    info: SystemInfo,
}

impl DashboardView {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu_usage();
        let mut view = Self {
            system,
            info: SystemInfo::default(),
        };
        view.info = view.collect(Local::now());
        view
    }

    pub fn info(&self) -> &SystemInfo {
        &self.info
    }

    fn collect(&mut self, now: DateTime<Local>) -> SystemInfo {
        self.system.refresh_memory();
        self.system.refresh_cpu_usage();

        let mem_total = self.system.total_memory();
        let mem_used = mem_total.saturating_sub(self.system.available_memory());
        let mem_percent = if mem_total > 0 {
            mem_used as f64 / mem_total as f64 * 100.0
        } else {
            0.0
        };

        SystemInfo {
            date_time: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            cpu_usage: f64::from(self.system.global_cpu_usage()),
            mem_total,
            mem_used,
            mem_percent,
            num_cpu: std::thread::available_parallelism().map_or(1, |n| n.get()),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }
}

impl Default for DashboardView {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewProvider for DashboardView {
    fn mode(&self) -> Mode {
        Mode::Dashboard
    }

    fn on_tick(&mut self, _tick: &TickEvent, _state: &RenderState, now: DateTime<Local>) {
        self.info = self.collect(now);
        trace!(
            "Dashboard sample: cpu {:.1}%, mem {:.1}%",
            self.info.cpu_usage,
            self.info.mem_percent
        );
    }

    fn render(&self, _state: &RenderState, _now: DateTime<Local>) -> String {
        render_dashboard(&self.info)
    }
}
