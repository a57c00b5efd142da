use crate::error::{LogscopeError, Result};
use crate::model::{LogEntry, DEFAULT_CONTEXT, DEFAULT_LEVEL};
use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

/// Characters of an unparseable line echoed in the skip warning.
pub const SKIP_PREVIEW_CHARS: usize = 100;

// `<ISO-8601> [LEVEL] [context] message`
static FIXED_FORMAT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:\d{2}))\s+\[([^\]]+)\]\s+\[([^\]]*)\]\s*(.*)$",
    )
    .expect("Failed to compile fixed-format log regex")
});

const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parses one line, trying a JSON object first and the fixed text format
/// second. Returns `None` when neither matches.
pub fn parse_line(line: &str) -> Option<LogEntry> {
    let line = line.trim_start().trim_end_matches(['\r', '\n']);
    parse_json_line(line.trim_end()).or_else(|| parse_fixed_format_line(line))
}

fn parse_json_line(line: &str) -> Option<LogEntry> {
    if !line.starts_with('{') {
        return None;
    }
    let object = match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(object)) => object,
        _ => return None,
    };

    let timestamp = first_present(&object, &["timestamp", "time"])
        .and_then(parse_timestamp_value)
        .unwrap_or_else(Utc::now);
    let level = text_field(&object, &["level"]).unwrap_or_else(|| DEFAULT_LEVEL.to_string());
    let context = text_field(&object, &["context", "logger"]).unwrap_or_else(|| DEFAULT_CONTEXT.to_string());
    let message = text_field(&object, &["message", "msg"]).unwrap_or_default();
    let metadata = match object.get("metadata") {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };

    Some(LogEntry {
        timestamp,
        level,
        context,
        message,
        metadata,
        trace_id: text_field(&object, &["traceId"]),
        user_id: text_field(&object, &["userId"]),
        request_id: text_field(&object, &["requestId"]),
        duration: duration_field(&object),
    })
}

fn parse_fixed_format_line(line: &str) -> Option<LogEntry> {
    let caps = FIXED_FORMAT_REGEX.captures(line)?;
    let timestamp = DateTime::parse_from_rfc3339(&caps[1]).ok()?.with_timezone(&Utc);

    Some(LogEntry::new(timestamp, &caps[2], &caps[3], &caps[4]))
}

/// First key among `keys` whose value is present and not null.
fn first_present<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

fn text_field(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    match first_present(object, keys)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Milliseconds from a number, or from a string holding one.
fn duration_field(object: &Map<String, Value>) -> Option<f64> {
    match object.get("duration")? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|d| d.is_finite()),
        _ => None,
    }
}

fn parse_timestamp_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp_str(s),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|naive| naive.and_utc())
}

/// Reads and parses a log file, skipping lines that match neither format.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<LogEntry>> {
    parse_file_with_preview(path, SKIP_PREVIEW_CHARS)
}

pub fn parse_file_with_preview(path: impl AsRef<Path>, preview_chars: usize) -> Result<Vec<LogEntry>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LogscopeError::FileNotFound(path.to_path_buf()));
    }

    info!("Reading log file: {}", path.display());
    let data = std::fs::read(path)?;
    debug!("Read {} bytes from file {}", data.len(), path.display());

    let content = decode_log_bytes(&data);
    let entries = parse_content(&content, preview_chars);
    info!("Parsed {} entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Parses every non-blank line of `content` in order.
pub fn parse_content(content: &str, preview_chars: usize) -> Vec<LogEntry> {
    let mut entries = Vec::new();

    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Some(entry) => entries.push(entry),
            None => {
                let preview: String = line.chars().take(preview_chars).collect();
                warn!(line_number = index + 1, "Skipping unparseable log line: {}", preview);
            }
        }
    }

    entries
}

/// Decodes raw file bytes, honouring a BOM and falling back to Windows-1252
/// for content that is not valid UTF-8.
pub fn decode_log_bytes(data: &[u8]) -> String {
    use encoding_rs::WINDOWS_1252;

    if let Some((encoding, bom_len)) = encoding_rs::Encoding::for_bom(data) {
        debug!("Detected {} byte order mark", encoding.name());
        let (text, _) = encoding.decode_without_bom_handling(&data[bom_len..]);
        return text.into_owned();
    }

    match std::str::from_utf8(data) {
        Ok(text) => text.to_string(),
        Err(_) => {
            debug!("Content is not valid UTF-8, decoding as {}", WINDOWS_1252.name());
            let (text, _, _) = WINDOWS_1252.decode(data);
            text.into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_fixed_format_line() {
        let entry = parse_line("2023-01-01T10:00:00.000Z [INFO] [APP] hello").unwrap();

        assert_eq!(entry.timestamp, Utc.with_ymd_and_hms(2023, 1, 1, 10, 0, 0).unwrap());
        assert_eq!(entry.level, "INFO");
        assert_eq!(entry.context, "APP");
        assert_eq!(entry.message, "hello");
        assert!(entry.metadata.is_empty());
        assert_eq!(entry.trace_id, None);
        assert_eq!(entry.user_id, None);
        assert_eq!(entry.request_id, None);
        assert_eq!(entry.duration, None);
    }

    #[test]
    fn test_fixed_format_keeps_message_remainder() {
        let entry = parse_line("2023-01-01T10:00:00.000Z [WARN] [DB] pool [primary] exhausted, retrying").unwrap();
        assert_eq!(entry.level, "WARN");
        assert_eq!(entry.context, "DB");
        assert_eq!(entry.message, "pool [primary] exhausted, retrying");
    }

    #[test]
    fn test_parse_json_line_full() {
        let line = r#"{"timestamp":"2023-05-01T08:30:00.250Z","level":"ERROR","context":"AUTH","message":"login failed","metadata":{"ip":"10.0.0.1"},"traceId":"t-9","userId":"u-1","requestId":"r-7","duration":1250}"#;
        let entry = parse_line(line).unwrap();

        assert_eq!(entry.iso_timestamp(), "2023-05-01T08:30:00.250Z");
        assert_eq!(entry.level, "ERROR");
        assert_eq!(entry.context, "AUTH");
        assert_eq!(entry.message, "login failed");
        assert_eq!(entry.metadata["ip"], "10.0.0.1");
        assert_eq!(entry.trace_id.as_deref(), Some("t-9"));
        assert_eq!(entry.user_id.as_deref(), Some("u-1"));
        assert_eq!(entry.request_id.as_deref(), Some("r-7"));
        assert_eq!(entry.duration, Some(1250.0));
    }

    #[test]
    fn test_parse_json_line_fallback_keys() {
        let line = r#"{"time":"2023-05-01 08:30:00","logger":"worker","msg":"job done"}"#;
        let entry = parse_line(line).unwrap();

        assert_eq!(entry.timestamp, Utc.with_ymd_and_hms(2023, 5, 1, 8, 30, 0).unwrap());
        assert_eq!(entry.level, "INFO");
        assert_eq!(entry.context, "worker");
        assert_eq!(entry.message, "job done");
    }

    #[test]
    fn test_parse_json_line_defaults() {
        let before = Utc::now();
        let entry = parse_line("{}").unwrap();
        let after = Utc::now();

        assert!(entry.timestamp >= before && entry.timestamp <= after);
        assert_eq!(entry.level, "INFO");
        assert_eq!(entry.context, "APP");
        assert_eq!(entry.message, "");
        assert!(entry.metadata.is_empty());
        assert_eq!(entry.duration, None);
    }

    #[test]
    fn test_parse_json_epoch_millis_timestamp() {
        let entry = parse_line(r#"{"timestamp":1672567200000,"message":"epoch"}"#).unwrap();
        assert_eq!(entry.timestamp, Utc.with_ymd_and_hms(2023, 1, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_unparseable_lines() {
        let cases = [
            "not a log line",
            "2023-01-01 [INFO] missing context",
            "[INFO] [APP] no timestamp",
            "{broken json",
            "42",
            r#""just a string""#,
        ];

        for line in cases {
            assert!(parse_line(line).is_none(), "Expected no entry for: '{}'", line);
        }
    }

    #[test]
    fn test_parse_content_skips_garbage_and_blank_lines() {
        let content = "2023-01-01T10:00:00.000Z [INFO] [APP] first\n\n   \ngarbage here\r\n{\"level\":\"WARN\",\"message\":\"second\"}\n";
        let entries = parse_content(content, SKIP_PREVIEW_CHARS);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[1].message, "second");
    }

    #[test]
    fn test_fixed_format_keeps_trailing_whitespace() {
        let cases = [
            ("2023-01-01T10:00:00.000Z [INFO] [APP] trailing   ", "trailing   "),
            ("  2023-01-01T10:00:00.000Z [INFO] [APP] indented\t", "indented\t"),
            ("2023-01-01T10:00:00.000Z [INFO] [APP] windows\r", "windows"),
        ];

        for (line, expected) in cases {
            let entry = parse_line(line).unwrap();
            assert_eq!(entry.message, expected, "Message mismatch for: '{:?}'", line);
        }
    }

    #[test]
    fn test_json_scalar_values_in_text_fields() {
        let cases = [
            (r#"{"level":30}"#, "30", None, ""),
            (r#"{"userId":7,"message":true}"#, "INFO", Some("7"), "true"),
            (r#"{"level":false,"userId":1.5,"message":0}"#, "false", Some("1.5"), "0"),
            (r#"{"level":["WARN"],"userId":{"id":7},"message":null}"#, "INFO", None, ""),
        ];

        for (line, level, user_id, message) in cases {
            let entry = parse_line(line).unwrap();
            assert_eq!(entry.level, level, "Level mismatch for: {}", line);
            assert_eq!(entry.user_id.as_deref(), user_id, "User id mismatch for: {}", line);
            assert_eq!(entry.message, message, "Message mismatch for: {}", line);
        }
    }

    #[test]
    fn test_json_non_object_metadata_ignored() {
        let cases = [r#"[1,2]"#, r#""x""#, "5", "true", "null"];

        for metadata in cases {
            let line = format!(r#"{{"message":"m","metadata":{}}}"#, metadata);
            let entry = parse_line(&line).unwrap();
            assert!(entry.metadata.is_empty(), "Expected empty metadata for: {}", metadata);
        }
    }

    #[test]
    fn test_json_duration_values() {
        let cases = [
            (r#"{"duration":1500}"#, Some(1500.0)),
            (r#"{"duration":12.5}"#, Some(12.5)),
            (r#"{"duration":"1500"}"#, Some(1500.0)),
            (r#"{"duration":" 42.5 "}"#, Some(42.5)),
            (r#"{"duration":"fast"}"#, None),
            (r#"{"duration":"NaN"}"#, None),
            (r#"{"duration":true}"#, None),
            (r#"{"duration":null}"#, None),
        ];

        for (line, expected) in cases {
            assert_eq!(parse_line(line).unwrap().duration, expected, "Duration mismatch for: {}", line);
        }
    }

    #[test]
    fn test_json_round_trip_preserves_core_fields() {
        let original = LogEntry::new(
            Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap(),
            "DEBUG",
            "CACHE",
            "evicted \"hot\" key",
        );
        let line = serde_json::to_string(&original).unwrap();
        let parsed = parse_line(&line).unwrap();

        assert_eq!(parsed.level, original.level);
        assert_eq!(parsed.context, original.context);
        assert_eq!(parsed.message, original.message);
        assert_eq!(parsed.timestamp, original.timestamp);
    }

    #[test]
    fn test_decode_utf8_bom_and_latin1() {
        let with_bom = b"\xEF\xBB\xBFhello";
        assert_eq!(decode_log_bytes(with_bom), "hello");

        let latin1 = b"caf\xE9";
        assert_eq!(decode_log_bytes(latin1), "café");
    }

    #[test]
    fn test_decode_utf16_boms() {
        let cases: [(&[u8], &str); 3] = [
            (b"\xFF\xFEh\x00i\x00\n\x00", "hi\n"),
            (b"\xFE\xFF\x00h\x00i\x00\n", "hi\n"),
            (b"\xFF\xFE", ""),
        ];

        for (bytes, expected) in cases {
            assert_eq!(decode_log_bytes(bytes), expected, "Decode mismatch for: {:?}", bytes);
        }
    }

    #[test]
    fn test_parse_content_from_utf16_file_bytes() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "2023-01-01T10:00:00.000Z [INFO] [APP] wide\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }

        let entries = parse_content(&decode_log_bytes(&bytes), SKIP_PREVIEW_CHARS);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "wide");
    }
}
