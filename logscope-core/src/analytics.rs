use crate::error::{LogscopeError, Result};
use crate::model::LogEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_SLOW_QUERY_THRESHOLD_MS: f64 = 1000.0;
pub const DEFAULT_SLOW_QUERY_LIMIT: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogAnalytics {
    pub total_entries: usize,
    pub level_counts: HashMap<String, usize>,
    pub context_counts: HashMap<String, usize>,
    /// Distinct ERROR messages in order of first appearance.
    pub error_patterns: Vec<String>,
    pub performance_metrics: PerformanceMetrics,
    pub time_range: TimeRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Mean of all present durations in milliseconds, unrounded.
    pub average_response_time: f64,
    pub slow_queries: Vec<LogEntry>,
    /// Percentage of entries at ERROR level.
    pub error_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    /// Entries with a duration strictly above this count as slow.
    pub slow_query_threshold_ms: f64,
    pub slow_query_limit: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            slow_query_threshold_ms: DEFAULT_SLOW_QUERY_THRESHOLD_MS,
            slow_query_limit: DEFAULT_SLOW_QUERY_LIMIT,
        }
    }
}

pub fn analyze(entries: &[LogEntry]) -> Result<LogAnalytics> {
    analyze_with(entries, &AnalysisOptions::default())
}

pub fn analyze_with(entries: &[LogEntry], options: &AnalysisOptions) -> Result<LogAnalytics> {
    if entries.is_empty() {
        return Err(LogscopeError::EmptyInput);
    }

    let mut level_counts: HashMap<String, usize> = HashMap::new();
    let mut context_counts: HashMap<String, usize> = HashMap::new();
    let mut error_messages: Vec<&str> = Vec::new();
    let mut durations: Vec<f64> = Vec::new();

    for entry in entries {
        *level_counts.entry(entry.level.clone()).or_insert(0) += 1;
        *context_counts.entry(entry.context.clone()).or_insert(0) += 1;

        if entry.is_error() {
            error_messages.push(&entry.message);
        }
        if let Some(duration) = entry.duration {
            durations.push(duration);
        }
    }

    let mut sorted_by_time: Vec<&LogEntry> = entries.iter().collect();
    sorted_by_time.sort_by_key(|entry| entry.timestamp);
    let start = sorted_by_time[0].timestamp;
    let end = sorted_by_time[sorted_by_time.len() - 1].timestamp;

    let average_response_time = if durations.is_empty() {
        0.0
    } else {
        durations.iter().sum::<f64>() / durations.len() as f64
    };

    let mut slow_queries: Vec<LogEntry> = entries
        .iter()
        .filter(|entry| entry.duration.is_some_and(|d| d > options.slow_query_threshold_ms))
        .cloned()
        .collect();
    slow_queries.sort_by(|a, b| b.duration.unwrap_or(0.0).total_cmp(&a.duration.unwrap_or(0.0)));
    slow_queries.truncate(options.slow_query_limit);

    let error_count = entries.iter().filter(|entry| entry.is_error()).count();
    let error_rate = error_count as f64 / entries.len() as f64 * 100.0;

    let mut error_patterns: Vec<String> = Vec::new();
    for message in error_messages {
        if !error_patterns.iter().any(|seen| seen == message) {
            error_patterns.push(message.to_string());
        }
    }

    debug!(
        "Analyzed {} entries: {} levels, {} contexts, {} slow queries",
        entries.len(),
        level_counts.len(),
        context_counts.len(),
        slow_queries.len()
    );

    Ok(LogAnalytics {
        total_entries: entries.len(),
        level_counts,
        context_counts,
        error_patterns,
        performance_metrics: PerformanceMetrics {
            average_response_time,
            slow_queries,
            error_rate,
        },
        time_range: TimeRange {
            start,
            end,
            duration: format_elapsed((end - start).num_milliseconds()),
        },
    })
}

/// Formats elapsed milliseconds as `1h 2m 3s`, `2m 3s` or `3s`, truncating
/// to whole seconds.
pub fn format_elapsed(millis: i64) -> String {
    let total_seconds = millis.max(0) / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
