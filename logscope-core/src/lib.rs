// Logscope Library - log parsing, filtering, analytics and export
//
// Parses JSON and fixed-format log lines into structured entries, then
// filters, summarizes, renders and exports them.

pub mod analytics;
pub mod config;
pub mod error;
pub mod filter;
pub mod formatter;
pub mod model;
pub mod output;
pub mod parser;
pub mod render;

pub use analytics::{analyze, analyze_with, format_elapsed, AnalysisOptions, LogAnalytics, PerformanceMetrics, TimeRange};
pub use config::FormatterConfig;
pub use error::{LogscopeError, Result};
pub use filter::{filter_logs, LogFilters, TimeWindow};
pub use formatter::LogFormatter;
pub use model::{level_priority, LogEntry};
pub use output::{export_logs, generate_report, write_console, ConsoleOptions, ExportFormat, ReportOptions};
pub use parser::{parse_file, parse_line};
pub use render::{PlainRenderer, Renderer, Style};

#[cfg(feature = "color")]
pub use render::AnsiRenderer;

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, defaulting this crate
/// to `info`. Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match "logscope_core=info".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
