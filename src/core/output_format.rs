//! Output format configuration for log entries
//!
//! Provides different output formats for log entries:
//! - Text: Human-readable format (default)
//! - Json: Machine-readable JSON format
//! - Logfmt: Key-value format compatible with log aggregation tools

use super::error::Result;
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Keys every record writes itself. A field with one of these keys is
/// written as `fields.<key>` instead.
pub const METADATA_KEYS: [&str; 6] = [
    "timestamp",
    "level",
    "message",
    "caller",
    "thread_id",
    "thread_name",
];

fn field_key(key: &str) -> Cow<'_, str> {
    if METADATA_KEYS.contains(&key) {
        Cow::Owned(format!("fields.{}", key))
    } else {
        Cow::Borrowed(key)
    }
}

/// Escape CR, LF and TAB so a value cannot start a forged line
pub(crate) fn escape_control(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(
            value
                .replace('\n', "\\n")
                .replace('\r', "\\r")
                .replace('\t', "\\t"),
        )
    } else {
        Cow::Borrowed(value)
    }
}

/// Output format for log entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    ///
    /// Example: `[2025-01-08T10:30:45.123Z] [INFO ] main - Request processed status=200`
    #[default]
    Text,

    /// JSON format for machine processing, one object per line
    ///
    /// Example: `{"timestamp":"2025-01-08T10:30:45.123Z","level":"INFO","message":"Request processed","status":200}`
    Json,

    /// Logfmt format (key=value pairs)
    ///
    /// Example: `timestamp=2025-01-08T10:30:45.123Z level=INFO message="Request processed" status=200`
    Logfmt,
}

/// Encoding selector accepted by the logger options
///
/// `Json` is structured output, `Console` the human-readable line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    #[default]
    Json,
    Console,
}

impl From<Encoding> for OutputFormat {
    fn from(encoding: Encoding) -> Self {
        match encoding {
            Encoding::Json => OutputFormat::Json,
            Encoding::Console => OutputFormat::Text,
        }
    }
}

impl OutputFormat {
    /// Format a log entry according to this output format
    ///
    /// A record that cannot be rendered is reported on stderr and comes back
    /// empty. Appenders use [`OutputFormat::try_format`] to surface the error.
    pub fn format(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        match self.try_format(entry, timestamp_format) {
            Ok(line) => line,
            Err(e) => {
                eprintln!("[LOGGER ERROR] Failed to format entry: {}", e);
                String::new()
            }
        }
    }

    pub fn try_format(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> Result<String> {
        match self {
            OutputFormat::Text => Ok(self.format_text(entry, timestamp_format)),
            OutputFormat::Json => self.format_json(entry, timestamp_format),
            OutputFormat::Logfmt => Ok(self.format_logfmt(entry, timestamp_format)),
        }
    }

    fn format_text(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        let timestamp_str = timestamp_format.format(&entry.timestamp);
        let thread_name = entry.thread_name.as_ref().unwrap_or(&entry.thread_id);

        let mut line = format!(
            "[{}] [{:5}] {} - {}",
            timestamp_str,
            entry.level.to_str(),
            thread_name,
            escape_control(&entry.message)
        );

        if let Some(ref caller) = entry.caller {
            line.push_str(&format!(" ({})", caller));
        }

        if !entry.context.is_empty() {
            line.push(' ');
            line.push_str(&entry.context.format_fields());
        }

        line
    }

    /// Build the JSON object for an entry: metadata first, then fields in order.
    ///
    /// Metadata is never overwritten; see [`METADATA_KEYS`].
    pub fn to_json_object(entry: &LogEntry, timestamp_format: &TimestampFormat) -> Map<String, Value> {
        let mut json_obj = Map::new();

        json_obj.insert("timestamp".to_string(), timestamp_format.to_json(&entry.timestamp));
        json_obj.insert("level".to_string(), Value::String(entry.level.to_str().to_string()));
        json_obj.insert("message".to_string(), Value::String(entry.message.clone()));

        if let Some(ref caller) = entry.caller {
            json_obj.insert("caller".to_string(), Value::String(caller.to_string()));
        }

        json_obj.insert("thread_id".to_string(), Value::String(entry.thread_id.clone()));
        if let Some(ref name) = entry.thread_name {
            json_obj.insert("thread_name".to_string(), Value::String(name.clone()));
        }

        for (key, value) in entry.context.fields() {
            json_obj.insert(field_key(key).into_owned(), value.clone());
        }

        json_obj
    }

    fn format_json(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> Result<String> {
        let json_obj = Self::to_json_object(entry, timestamp_format);
        Ok(serde_json::to_string(&Value::Object(json_obj))?)
    }

    fn format_logfmt(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        let mut parts = Vec::new();

        parts.push(format!(
            "timestamp={}",
            self.escape_logfmt_value(&timestamp_format.format(&entry.timestamp))
        ));
        parts.push(format!("level={}", entry.level.to_str()));

        // Message is always quoted
        parts.push(format!("message={}", self.quote_logfmt_value(&entry.message)));

        if let Some(ref caller) = entry.caller {
            parts.push(format!("caller={}", self.escape_logfmt_value(&caller.to_string())));
        }

        parts.push(format!("thread_id={}", self.escape_logfmt_value(&entry.thread_id)));
        if let Some(ref name) = entry.thread_name {
            parts.push(format!("thread_name={}", self.escape_logfmt_value(name)));
        }

        for (key, value) in entry.context.fields() {
            let formatted_value = match value {
                Value::String(s) => self.quote_logfmt_value(s),
                Value::Number(_) | Value::Bool(_) | Value::Null => value.to_string(),
                Value::Array(_) | Value::Object(_) => self.quote_logfmt_value(&value.to_string()),
            };
            parts.push(format!("{}={}", self.escape_logfmt_key(&field_key(key)), formatted_value));
        }

        parts.join(" ")
    }

    /// Escape a logfmt key (remove spaces and special chars)
    fn escape_logfmt_key(&self, key: &str) -> String {
        key.chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || *c == '.')
            .collect()
    }

    /// Escape a logfmt value (quote if contains spaces)
    fn escape_logfmt_value(&self, value: &str) -> String {
        if value.contains([' ', '"', '=', '\n', '\r', '\t']) {
            self.quote_logfmt_value(value)
        } else {
            value.to_string()
        }
    }

    fn quote_logfmt_value(&self, value: &str) -> String {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{}\"", escape_control(&escaped))
    }
}
