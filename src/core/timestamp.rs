//! Time and duration encodings
//!
//! [`TimestampFormat`] renders both the record timestamp and `time` fields;
//! [`DurationFormat`] renders `duration` fields. Numeric variants produce JSON
//! numbers, everything else produces strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::SystemTime;

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// Standardized timestamp format options
///
/// # Examples
///
/// ```
/// use structured_logger::core::TimestampFormat;
/// use std::time::SystemTime;
///
/// let format = TimestampFormat::Iso8601;
/// let timestamp = format.format_system_time(&SystemTime::now());
/// assert!(timestamp.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// ISO 8601 with nanoseconds: `2025-01-08T10:30:45.123456789Z`
    ///
    /// Keeps the full precision of a `time` field.
    Iso8601Nanos,

    /// RFC 3339 format: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Unix timestamp in microseconds: `1736332245123456`
    UnixMicros,

    /// Unix timestamp in nanoseconds: `1736332245123456789`
    UnixNanos,

    /// Custom strftime format
    ///
    /// ```
    /// use structured_logger::core::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format a `DateTime<Utc>` according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::Iso8601Nanos => datetime.format("%Y-%m-%dT%H:%M:%S%.9fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::UnixMicros => datetime.timestamp_micros().to_string(),
            TimestampFormat::UnixNanos => unix_nanos(datetime).to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }

    /// Encode as a JSON value: numbers for the Unix variants, strings otherwise
    #[must_use]
    pub fn to_json(&self, datetime: &DateTime<Utc>) -> Value {
        match self {
            TimestampFormat::Unix => Value::from(datetime.timestamp()),
            TimestampFormat::UnixMillis => Value::from(datetime.timestamp_millis()),
            TimestampFormat::UnixMicros => Value::from(datetime.timestamp_micros()),
            TimestampFormat::UnixNanos => integer_value(unix_nanos(datetime)),
            _ => Value::String(self.format(datetime)),
        }
    }

    /// Format a `SystemTime` according to this format
    #[must_use]
    pub fn format_system_time(&self, timestamp: &SystemTime) -> String {
        let datetime: DateTime<Utc> = (*timestamp).into();
        self.format(&datetime)
    }

    /// Check if this is a Unix-based numeric format
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TimestampFormat::Unix
                | TimestampFormat::UnixMillis
                | TimestampFormat::UnixMicros
                | TimestampFormat::UnixNanos
        )
    }
}

fn unix_nanos(datetime: &DateTime<Utc>) -> i128 {
    i128::from(datetime.timestamp()) * NANOS_PER_SEC + i128::from(datetime.timestamp_subsec_nanos())
}

fn total_nanos(duration: &chrono::Duration) -> i128 {
    i128::from(duration.num_seconds()) * NANOS_PER_SEC + i128::from(duration.subsec_nanos())
}

/// Integers beyond `i64` degrade to a float rather than failing
fn integer_value(value: i128) -> Value {
    match i64::try_from(value) {
        Ok(v) => Value::from(v),
        Err(_) => Value::from(value as f64),
    }
}

/// Encoding of `duration` fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationFormat {
    /// Human-readable string: `1.5s`, `1m30s`, `250ms`, `1h0m0s`
    #[default]
    String,
    /// Integer nanoseconds
    Nanos,
    /// Integer milliseconds
    Millis,
    /// Floating-point seconds
    Seconds,
}

impl DurationFormat {
    #[must_use]
    pub fn to_json(&self, duration: &chrono::Duration) -> Value {
        let nanos = total_nanos(duration);
        match self {
            DurationFormat::String => Value::String(format_duration(nanos)),
            DurationFormat::Nanos => integer_value(nanos),
            DurationFormat::Millis => Value::from(duration.num_milliseconds()),
            DurationFormat::Seconds => Value::from(nanos as f64 / NANOS_PER_SEC as f64),
        }
    }
}

/// Render a nanosecond count the way Go's `time.Duration` prints itself
pub(crate) fn format_duration(nanos: i128) -> String {
    if nanos == 0 {
        return "0s".to_string();
    }

    let sign = if nanos < 0 { "-" } else { "" };
    let abs = nanos.unsigned_abs();

    let body = if abs < 1_000 {
        format!("{}ns", abs)
    } else if abs < 1_000_000 {
        format!("{}µs", decimal(abs, 3))
    } else if abs < NANOS_PER_SEC as u128 {
        format!("{}ms", decimal(abs, 6))
    } else {
        let secs = abs / NANOS_PER_SEC as u128;
        let frac = abs % NANOS_PER_SEC as u128;
        let minutes = secs / 60;
        let hours = minutes / 60;

        let seconds = decimal((secs % 60) * NANOS_PER_SEC as u128 + frac, 9);
        if hours > 0 {
            format!("{}h{}m{}s", hours, minutes % 60, seconds)
        } else if minutes > 0 {
            format!("{}m{}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    };

    format!("{}{}", sign, body)
}

/// `value / 10^scale` with the fraction's trailing zeros removed
fn decimal(value: u128, scale: u32) -> String {
    let unit = 10_u128.pow(scale);
    let whole = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return whole.to_string();
    }

    let digits = format!("{:0width$}", frac, width = scale as usize);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
