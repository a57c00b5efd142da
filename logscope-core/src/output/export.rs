use crate::error::{LogscopeError, Result};
use crate::model::LogEntry;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

const CSV_HEADER: &str = "timestamp,level,context,message,traceId,userId,duration";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Txt,
}

impl FromStr for ExportFormat {
    type Err = LogscopeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "txt" => Ok(ExportFormat::Txt),
            other => Err(LogscopeError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Txt => write!(f, "txt"),
        }
    }
}

/// Serializes `entries` in the given export format.
pub fn render_export(entries: &[LogEntry], format: ExportFormat) -> Result<String> {
    let content = match format {
        ExportFormat::Json => serde_json::to_string_pretty(entries)?,
        ExportFormat::Csv => {
            let mut rows = Vec::with_capacity(entries.len() + 1);
            rows.push(CSV_HEADER.to_string());
            rows.extend(entries.iter().map(csv_row));
            rows.join("\n")
        }
        ExportFormat::Txt => entries
            .iter()
            .map(|entry| {
                format!(
                    "{} [{}] [{}] {}",
                    entry.iso_timestamp(),
                    entry.level,
                    entry.context,
                    entry.message
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    };
    Ok(content)
}

/// Writes `entries` to `path` in `format` (`json`, `csv` or `txt`),
/// replacing any existing file. An unknown format fails before anything is
/// written.
pub fn export_logs(entries: &[LogEntry], format: &str, path: impl AsRef<Path>) -> Result<()> {
    let format: ExportFormat = format.parse()?;
    let path = path.as_ref();
    let content = render_export(entries, format)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;

    info!("Exported {} entries as {} to {}", entries.len(), format, path.display());
    Ok(())
}

fn csv_row(entry: &LogEntry) -> String {
    let timestamp = entry.iso_timestamp();
    let duration = entry.duration.map(|d| d.to_string()).unwrap_or_default();
    let cells = [
        timestamp.as_str(),
        entry.level.as_str(),
        entry.context.as_str(),
        entry.message.as_str(),
        entry.trace_id.as_deref().unwrap_or(""),
        entry.user_id.as_deref().unwrap_or(""),
        duration.as_str(),
    ];

    let quoted: Vec<String> = cells.iter().map(|cell| csv_quote(cell)).collect();
    quoted.join(",")
}

fn csv_quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}
