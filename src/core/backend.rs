//! The contract between the logger facade and whatever writes records

use super::error::Result;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::metrics::LoggerMetrics;

/// Level filtering, writing and flushing of finished records.
///
/// The facade checks [`enabled`](Backend::enabled) before doing any work for a
/// call, so a disabled level costs a single comparison. Writes never fail from
/// the caller's point of view; implementations report their own failures.
pub trait Backend: Send + Sync {
    fn enabled(&self, level: LogLevel) -> bool;

    fn write(&self, entry: LogEntry);

    /// Block until every accepted record has reached its destination
    fn flush(&self) -> Result<()>;

    fn metrics(&self) -> Option<&LoggerMetrics> {
        None
    }
}
