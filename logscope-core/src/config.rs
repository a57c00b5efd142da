//! Configuration Module
//!
//! Loads formatter settings from `config.toml`. Every field has a default, so
//! a partial file (or none at all) is valid.

use crate::analytics::{AnalysisOptions, DEFAULT_SLOW_QUERY_LIMIT, DEFAULT_SLOW_QUERY_THRESHOLD_MS};
use crate::output::{ConsoleOptions, ReportOptions};
use crate::parser::SKIP_PREVIEW_CHARS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV_VAR: &str = "LOGSCOPE_CONFIG";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormatterConfig {
    #[serde(default)]
    pub console: ConsoleSection,
    #[serde(default)]
    pub analysis: AnalysisSection,
    #[serde(default)]
    pub report: ReportSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleSection {
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
    #[serde(default = "default_min_level")]
    pub min_level: String,
    #[serde(default)]
    pub show_metadata: bool,
    #[serde(default = "default_colors")]
    pub colors: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSection {
    #[serde(default = "default_slow_query_threshold_ms")]
    pub slow_query_threshold_ms: f64,
    #[serde(default = "default_slow_query_limit")]
    pub slow_query_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    #[serde(default = "default_top_contexts")]
    pub top_contexts: usize,
    #[serde(default = "default_top_slow_queries")]
    pub top_slow_queries: usize,
    #[serde(default = "default_top_error_patterns")]
    pub top_error_patterns: usize,
    #[serde(default = "default_message_width")]
    pub message_width: usize,
    #[serde(default = "default_skip_preview_chars")]
    pub skip_preview_chars: usize,
}

fn default_max_lines() -> usize {
    100
}

fn default_min_level() -> String {
    "DEBUG".to_string()
}

fn default_colors() -> bool {
    true
}

fn default_slow_query_threshold_ms() -> f64 {
    DEFAULT_SLOW_QUERY_THRESHOLD_MS
}

fn default_slow_query_limit() -> usize {
    DEFAULT_SLOW_QUERY_LIMIT
}

fn default_top_contexts() -> usize {
    10
}

fn default_top_slow_queries() -> usize {
    5
}

fn default_top_error_patterns() -> usize {
    10
}

fn default_message_width() -> usize {
    80
}

fn default_skip_preview_chars() -> usize {
    SKIP_PREVIEW_CHARS
}

impl Default for ConsoleSection {
    fn default() -> Self {
        Self {
            max_lines: default_max_lines(),
            min_level: default_min_level(),
            show_metadata: false,
            colors: default_colors(),
        }
    }
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            slow_query_threshold_ms: default_slow_query_threshold_ms(),
            slow_query_limit: default_slow_query_limit(),
        }
    }
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            top_contexts: default_top_contexts(),
            top_slow_queries: default_top_slow_queries(),
            top_error_patterns: default_top_error_patterns(),
            message_width: default_message_width(),
            skip_preview_chars: default_skip_preview_chars(),
        }
    }
}

impl FormatterConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| anyhow::anyhow!("Failed to parse config: {}", e))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml_string()?)
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }

    /// `$LOGSCOPE_CONFIG`, else `<config dir>/logscope/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Ok(PathBuf::from(path));
        }
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("logscope").join("config.toml"))
    }

    /// Loads the file at [`default_path`](Self::default_path), or returns the
    /// defaults when it does not exist.
    pub fn load_or_default() -> Result<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        debug!("Loading config from {}", path.display());
        Self::load(path)
    }

    pub fn console_options(&self) -> ConsoleOptions {
        ConsoleOptions {
            max_lines: self.console.max_lines,
            min_level: self.console.min_level.clone(),
            context: None,
            show_metadata: self.console.show_metadata,
        }
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            slow_query_threshold_ms: self.analysis.slow_query_threshold_ms,
            slow_query_limit: self.analysis.slow_query_limit,
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            top_contexts: self.report.top_contexts,
            top_slow_queries: self.report.top_slow_queries,
            top_error_patterns: self.report.top_error_patterns,
            message_width: self.report.message_width,
        }
    }
}
