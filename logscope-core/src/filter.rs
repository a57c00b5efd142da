use crate::model::{meets_min_level, LogEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        *timestamp >= self.start && *timestamp <= self.end
    }
}

/// Criteria for [`filter_logs`]. Every criterion left as `None` matches all
/// entries; the ones that are set must all match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilters {
    /// Accepted level labels, compared exactly.
    pub level: Option<Vec<String>>,
    /// Entry is kept when its context contains any of these.
    pub context: Option<Vec<String>>,
    pub time_range: Option<TimeWindow>,
    /// Case-insensitive substring of the message.
    pub search_term: Option<String>,
    pub user_id: Option<String>,
    pub trace_id: Option<String>,
}

impl LogFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_levels<I, S>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.level = Some(levels.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_contexts<I, S>(mut self, contexts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context = Some(contexts.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_time_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.time_range = Some(TimeWindow::new(start, end));
        self
    }

    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(levels) = &self.level {
            if !levels.iter().any(|level| *level == entry.level) {
                return false;
            }
        }

        if let Some(contexts) = &self.context {
            if !contexts.iter().any(|ctx| entry.context.contains(ctx.as_str())) {
                return false;
            }
        }

        if let Some(window) = &self.time_range {
            if !window.contains(&entry.timestamp) {
                return false;
            }
        }

        if let Some(term) = &self.search_term {
            if !entry.message.to_lowercase().contains(&term.to_lowercase()) {
                return false;
            }
        }

        if let Some(user_id) = &self.user_id {
            if entry.user_id.as_ref() != Some(user_id) {
                return false;
            }
        }

        if let Some(trace_id) = &self.trace_id {
            if entry.trace_id.as_ref() != Some(trace_id) {
                return false;
            }
        }

        true
    }
}

/// Returns the entries matching every set criterion, in their original order.
pub fn filter_logs(entries: &[LogEntry], filters: &LogFilters) -> Vec<LogEntry> {
    entries.iter().filter(|entry| filters.matches(entry)).cloned().collect()
}

/// Selection used for console display: minimum severity, then context
/// substring, then the most recent `max_lines` entries.
pub fn select_for_console<'a>(
    entries: &'a [LogEntry],
    min_level: &str,
    context: Option<&str>,
    max_lines: usize,
) -> Vec<&'a LogEntry> {
    let mut selected: Vec<&LogEntry> = entries
        .iter()
        .filter(|entry| meets_min_level(&entry.level, min_level))
        .filter(|entry| context.map_or(true, |ctx| entry.context.contains(ctx)))
        .collect();

    if selected.len() > max_lines {
        let excess = selected.len() - max_lines;
        selected.drain(..excess);
    }
    selected
}
