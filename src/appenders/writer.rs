//! Appender over any `io::Write` sink

use crate::core::{Appender, LogEntry, OutputFormat, Result, TimestampFormat};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// Writes one formatted line per record to an arbitrary writer.
///
/// This is what the logger builder's `writer(..)` option installs; the
/// default logger writes JSON to stdout through it.
pub struct WriterAppender<W: Write + Send + Sync> {
    writer: W,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl<W: Write + Send + Sync> WriterAppender<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::Json,
        }
    }

    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterAppender<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + Sync> Appender for WriterAppender<W> {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let mut line = self.output_format.try_format(entry, &self.timestamp_format)?;
        line.push('\n');
        // One write per record keeps lines whole on shared sinks
        self.writer.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "writer"
    }
}

/// Clonable in-memory byte sink
///
/// ```
/// use structured_logger::appenders::SharedBuffer;
/// use std::io::Write;
///
/// let buffer = SharedBuffer::new();
/// let mut sink = buffer.clone();
/// sink.write_all(b"line\n").unwrap();
/// assert_eq!(buffer.contents(), "line\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(String::from).collect()
    }

    pub fn clear(&self) {
        self.bytes.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
