//! Appender trait for log output destinations

use super::{error::Result, log_entry::LogEntry};

/// A destination for finished records.
///
/// The engine serializes access, so implementations take `&mut self` and need
/// no interior locking of their own.
pub trait Appender: Send + Sync {
    fn append(&mut self, entry: &LogEntry) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
