use crate::analytics::{analyze_with, LogAnalytics};
use crate::config::FormatterConfig;
use crate::error::Result;
use crate::filter::{filter_logs, LogFilters};
use crate::model::LogEntry;
use crate::output::{export_logs, generate_report, write_console, ConsoleOptions};
use crate::parser::{parse_file_with_preview, parse_line};
use crate::render::{default_renderer, Renderer};
use std::io::{self, Write};
use std::path::Path;

/// Entry point bundling configuration and rendering for the log operations.
pub struct LogFormatter {
    config: FormatterConfig,
    renderer: Box<dyn Renderer>,
}

impl Default for LogFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl LogFormatter {
    pub fn new() -> Self {
        Self::with_config(FormatterConfig::default())
    }

    /// Builds a formatter from the user's config file, or defaults when none exists.
    pub fn from_default_config() -> Result<Self> {
        let config = FormatterConfig::load_or_default()?;
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        let renderer = default_renderer(config.console.colors);
        Self { config, renderer }
    }

    /// Replaces the console renderer.
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// Console options seeded from the configuration.
    pub fn console_options(&self) -> ConsoleOptions {
        self.config.console_options()
    }

    pub fn parse_line(&self, line: &str) -> Option<LogEntry> {
        parse_line(line)
    }

    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Vec<LogEntry>> {
        parse_file_with_preview(path, self.config.report.skip_preview_chars)
    }

    /// Prints the selected entries to stdout.
    pub fn format_for_console(&self, entries: &[LogEntry], options: &ConsoleOptions) -> io::Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.write_console(&mut handle, entries, options)?;
        handle.flush()
    }

    pub fn write_console<W: Write>(&self, out: &mut W, entries: &[LogEntry], options: &ConsoleOptions) -> io::Result<()> {
        write_console(out, entries, options, self.renderer.as_ref())
    }

    pub fn analyze(&self, entries: &[LogEntry]) -> Result<LogAnalytics> {
        analyze_with(entries, &self.config.analysis_options())
    }

    pub fn generate_report(&self, analytics: &LogAnalytics) -> String {
        generate_report(analytics, &self.config.report_options())
    }

    pub fn export_logs(&self, entries: &[LogEntry], format: &str, path: impl AsRef<Path>) -> Result<()> {
        export_logs(entries, format, path)
    }

    pub fn filter_logs(&self, entries: &[LogEntry], filters: &LogFilters) -> Vec<LogEntry> {
        filter_logs(entries, filters)
    }
}
