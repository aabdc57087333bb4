//! Console appender implementation

#[cfg(feature = "console")]
use crate::core::output_format::escape_control;
use crate::core::{Appender, LogEntry, OutputFormat, Result, TimestampFormat};
#[cfg(feature = "console")]
use colored::Colorize;

/// Writes records to stdout, and error-or-worse records to stderr
pub struct ConsoleAppender {
    use_colors: bool,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self::with_colors(true)
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
        }
    }

    /// ```
    /// use structured_logger::appenders::ConsoleAppender;
    /// use structured_logger::OutputFormat;
    ///
    /// let appender = ConsoleAppender::new().with_output_format(OutputFormat::Json);
    /// ```
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

    fn render(&self, entry: &LogEntry) -> String {
        match self.output_format {
            OutputFormat::Text if self.use_colors => self.format_colored(entry),
            _ => self.output_format.format(entry, &self.timestamp_format),
        }
    }

    #[cfg(feature = "console")]
    fn format_colored(&self, entry: &LogEntry) -> String {
        let level = format!("{:5}", entry.level.to_str())
            .color(entry.level.color_code())
            .to_string();

        let mut line = format!(
            "[{}] [{}] {} - {}",
            self.timestamp_format.format(&entry.timestamp),
            level,
            entry.thread_name.as_ref().unwrap_or(&entry.thread_id),
            escape_control(&entry.message)
        );

        if let Some(ref caller) = entry.caller {
            line.push_str(&format!(" ({})", caller).dimmed().to_string());
        }

        if !entry.context.is_empty() {
            line.push(' ');
            line.push_str(&entry.context.format_fields());
        }

        line
    }

    #[cfg(not(feature = "console"))]
    fn format_colored(&self, entry: &LogEntry) -> String {
        OutputFormat::Text.format(entry, &self.timestamp_format)
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let output = self.render(entry);

        if entry.level.priority() == crate::core::LogPriority::Critical {
            eprintln!("{}", output);
        } else {
            println!("{}", output);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        // Both streams are written to
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
