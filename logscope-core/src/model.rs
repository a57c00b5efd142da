use crate::render::Style;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::LazyLock;

pub const DEFAULT_LEVEL: &str = "INFO";
pub const DEFAULT_CONTEXT: &str = "APP";
pub const ERROR_LEVEL: &str = "ERROR";

/// Priority and console presentation for one of the recognised levels.
/// Lower priority means more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelStyle {
    pub priority: u8,
    pub style: Style,
    pub icon: &'static str,
}

static LEVEL_STYLES: LazyLock<HashMap<&'static str, LevelStyle>> = LazyLock::new(|| {
    HashMap::from([
        ("ERROR", LevelStyle { priority: 0, style: Style::Red, icon: "❌" }),
        ("WARN", LevelStyle { priority: 1, style: Style::Yellow, icon: "⚠️" }),
        ("INFO", LevelStyle { priority: 2, style: Style::Green, icon: "ℹ️" }),
        ("DEBUG", LevelStyle { priority: 3, style: Style::Blue, icon: "🐛" }),
        ("VERBOSE", LevelStyle { priority: 4, style: Style::Magenta, icon: "📝" }),
    ])
});

/// Looks up the style of a level label, ignoring ASCII case.
pub fn level_style(level: &str) -> Option<&'static LevelStyle> {
    LEVEL_STYLES.get(level.to_ascii_uppercase().as_str())
}

/// Returns `None` for labels outside the recognised set.
pub fn level_priority(level: &str) -> Option<u8> {
    level_style(level).map(|s| s.priority)
}

/// Whether `level` is at least as severe as `min_level`. Unrecognised labels
/// on either side never exclude an entry.
pub fn meets_min_level(level: &str, min_level: &str) -> bool {
    match (level_priority(level), level_priority(min_level)) {
        (Some(priority), Some(threshold)) => priority <= threshold,
        _ => true,
    }
}

/// One normalized log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub context: String,
    pub message: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl LogEntry {
    pub fn new(
        timestamp: DateTime<Utc>,
        level: impl Into<String>,
        context: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            level: level.into(),
            context: context.into(),
            message: message.into(),
            metadata: Map::new(),
            trace_id: None,
            user_id: None,
            request_id: None,
            duration: None,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration = Some(duration_ms);
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == ERROR_LEVEL
    }

    /// Timestamp as `2023-01-01T10:00:00.000Z`.
    pub fn iso_timestamp(&self) -> String {
        format_iso(&self.timestamp)
    }
}

pub fn format_iso(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_iso(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
