pub mod export;

use crate::analytics::LogAnalytics;
use crate::filter::select_for_console;
use crate::model::{format_iso, level_style, LogEntry};
use crate::render::{Renderer, Style};
use std::collections::HashMap;
use std::io::{self, Write};

pub use export::{export_logs, render_export, ExportFormat};

const BANNER_WIDTH: usize = 80;

/// Display options for console output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleOptions {
    /// Most recent entries kept after filtering.
    pub max_lines: usize,
    /// Least severe level shown.
    pub min_level: String,
    /// Substring the context must contain.
    pub context: Option<String>,
    pub show_metadata: bool,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self {
            max_lines: 100,
            min_level: "DEBUG".to_string(),
            context: None,
            show_metadata: false,
        }
    }
}

/// Limits applied when building the text report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub top_contexts: usize,
    pub top_slow_queries: usize,
    pub top_error_patterns: usize,
    pub message_width: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_contexts: 10,
            top_slow_queries: 5,
            top_error_patterns: 10,
            message_width: 80,
        }
    }
}

/// Writes the filtered, tail-limited selection of `entries` to `out`.
pub fn write_console<W: Write>(
    out: &mut W,
    entries: &[LogEntry],
    options: &ConsoleOptions,
    renderer: &dyn Renderer,
) -> io::Result<()> {
    let selected = select_for_console(
        entries,
        &options.min_level,
        options.context.as_deref(),
        options.max_lines,
    );

    writeln!(
        out,
        "{}",
        renderer.bold(&format!("📋 Showing {} of {} log entries", selected.len(), entries.len()))
    )?;

    for (index, entry) in selected.iter().enumerate() {
        write_console_entry(out, index + 1, entry, options.show_metadata, renderer)?;
    }
    Ok(())
}

fn write_console_entry<W: Write>(
    out: &mut W,
    index: usize,
    entry: &LogEntry,
    show_metadata: bool,
    renderer: &dyn Renderer,
) -> io::Result<()> {
    let (icon, level) = match level_style(&entry.level) {
        Some(style) => (style.icon, renderer.paint(style.style, &format!("{:<7}", entry.level))),
        None => ("•", format!("{:<7}", entry.level)),
    };

    writeln!(
        out,
        "{} {} {} {} {} {}",
        renderer.dim(&format!("{:>4}.", index)),
        renderer.gray(&entry.iso_timestamp()),
        icon,
        level,
        renderer.cyan(&format!("[{}]", entry.context)),
        entry.message
    )?;

    if show_metadata && !entry.metadata.is_empty() {
        let metadata = serde_json::to_string(&entry.metadata).map_err(io::Error::other)?;
        writeln!(out, "      {} {}", renderer.dim("📋 Metadata:"), metadata)?;
    }
    if let Some(trace_id) = &entry.trace_id {
        writeln!(out, "      {} {}", renderer.dim("🔗 Trace ID:"), trace_id)?;
    }
    if let Some(user_id) = &entry.user_id {
        writeln!(out, "      {} {}", renderer.dim("👤 User ID:"), user_id)?;
    }
    if let Some(duration) = entry.duration {
        writeln!(out, "      {} {}", renderer.dim("⏱️ Duration:"), renderer.paint(Style::Yellow, &format!("{}ms", duration)))?;
    }
    Ok(())
}

/// Builds the multi-section analysis report as plain text.
pub fn generate_report(analytics: &LogAnalytics, options: &ReportOptions) -> String {
    let rule = "=".repeat(BANNER_WIDTH);
    let total = analytics.total_entries;
    let mut lines: Vec<String> = Vec::new();

    lines.push(rule.clone());
    lines.push("📊 LOG ANALYSIS REPORT".to_string());
    lines.push(rule.clone());

    lines.push(String::new());
    lines.push("📋 SUMMARY".to_string());
    lines.push(format!("  Total Entries: {}", total));
    lines.push(format!(
        "  Time Range:    {} → {}",
        format_iso(&analytics.time_range.start),
        format_iso(&analytics.time_range.end)
    ));
    lines.push(format!("  Duration:      {}", analytics.time_range.duration));

    lines.push(String::new());
    lines.push("📈 LEVEL DISTRIBUTION".to_string());
    for (level, count) in sorted_counts(&analytics.level_counts) {
        lines.push(format!("  {:<10} {:>8} ({:>6.2}%)", level, count, percentage(count, total)));
    }

    lines.push(String::new());
    lines.push("🏷️ CONTEXT DISTRIBUTION".to_string());
    for (context, count) in sorted_counts(&analytics.context_counts).into_iter().take(options.top_contexts) {
        lines.push(format!("  {:<20} {:>8} ({:>6.2}%)", context, count, percentage(count, total)));
    }

    let metrics = &analytics.performance_metrics;
    lines.push(String::new());
    lines.push("⚡ PERFORMANCE METRICS".to_string());
    lines.push(format!("  Average Response Time: {:.2}ms", metrics.average_response_time));
    lines.push(format!("  Error Rate:            {:.2}%", metrics.error_rate));
    lines.push(format!("  Slow Queries:          {}", metrics.slow_queries.len()));

    if !metrics.slow_queries.is_empty() {
        lines.push(String::new());
        lines.push("🐌 SLOWEST QUERIES".to_string());
        for (index, entry) in metrics.slow_queries.iter().take(options.top_slow_queries).enumerate() {
            lines.push(format!(
                "  {:>2}. {:>10} - {}",
                index + 1,
                format!("{}ms", entry.duration.unwrap_or(0.0)),
                truncate(&entry.message, options.message_width)
            ));
        }
    }

    if !analytics.error_patterns.is_empty() {
        lines.push(String::new());
        lines.push("❌ ERROR PATTERNS".to_string());
        for (index, pattern) in analytics.error_patterns.iter().take(options.top_error_patterns).enumerate() {
            lines.push(format!("  {:>2}. {}", index + 1, truncate(pattern, options.message_width)));
        }
    }

    lines.push(String::new());
    lines.push(rule);
    lines.join("\n")
}

/// Count-descending order, ties broken by name so output is stable.
fn sorted_counts(counts: &HashMap<String, usize>) -> Vec<(&str, usize)> {
    let mut sorted: Vec<(&str, usize)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    sorted
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Shortens `text` to at most `width` characters, marking the cut with `...`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
