//! In-process capture of finished records

use crate::core::{Appender, LogEntry, OutputFormat, Result, TimestampFormat};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Keeps every record it receives.
///
/// Clones share the same storage, so one clone can be handed to the logger
/// while another is kept for inspection.
///
/// ```
/// use structured_logger::appenders::MemoryAppender;
/// use structured_logger::{fields, Context, Logger};
///
/// let memory = MemoryAppender::new();
/// let logger = Logger::builder().appender(memory.clone()).build();
///
/// logger.info(&Context::background(), "cache warmed", vec![fields::int("entries", 42)]);
///
/// let records = memory.records();
/// assert_eq!(records[0]["message"], "cache warmed");
/// assert_eq!(records[0]["entries"], 42);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryAppender {
    entries: Arc<Mutex<Vec<LogEntry>>>,
    timestamp_format: TimestampFormat,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries.lock().iter().map(|e| e.message.clone()).collect()
    }

    /// Records as the JSON objects the JSON format would write
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.entries
            .lock()
            .iter()
            .map(|e| OutputFormat::to_json_object(e, &self.timestamp_format))
            .collect()
    }

    /// Records rendered in the given format
    pub fn lines(&self, format: &OutputFormat) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|e| format.format(e, &self.timestamp_format))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Appender for MemoryAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
