//! Logger facade
//!
//! A [`Logger`] merges the fields of a call with those bound at construction
//! and those derived from the caller's [`Context`], translates them, and
//! hands the finished record to its [`Backend`]. Records carry their fields
//! in a fixed order:
//!
//! - typed calls: static fields, call-site fields, dynamic fields
//! - sugared calls: static fields, dynamic key/values, call-site key/values
//!
//! Configuration is fixed once [`LoggerBuilder::build`] returns.

use super::{
    appender::Appender,
    backend::Backend,
    context::Context,
    engine::Engine,
    error::{LoggerError, Result},
    log_context::LogContext,
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    output_format::{Encoding, OutputFormat},
    overflow_policy::{OverflowCallback, OverflowPolicy},
    timestamp::{DurationFormat, TimestampFormat},
    translate::{translate, translate_into, EncoderConfig},
};
use crate::appenders::WriterAppender;
use crate::fields::{Field, Untyped};
use std::fmt;
use std::io::Write;
use std::panic::Location;
use std::sync::Arc;

/// Derives typed fields from the caller's context
pub type FieldsProvider = Arc<dyn Fn(&Context) -> Vec<Field> + Send + Sync>;
/// Derives loosely-typed key/value pairs from the caller's context
pub type KeyValuesProvider = Arc<dyn Fn(&Context) -> Vec<Untyped> + Send + Sync>;
/// Runs after a fatal record has been written and flushed
pub type FatalHook = Arc<dyn Fn(&str) + Send + Sync>;

pub const ODD_KEY_VALUES_MESSAGE: &str = "Ignored key without a value.";
pub const NON_STRING_KEYS_MESSAGE: &str = "Ignored key-value pairs with non-string keys.";

#[derive(Clone)]
pub struct Logger {
    backend: Arc<dyn Backend>,
    static_context: LogContext,
    dynamic_fields: Option<FieldsProvider>,
    dynamic_key_values: Option<KeyValuesProvider>,
    encoder: Arc<EncoderConfig>,
    fatal_hook: FatalHook,
    add_caller: bool,
}

impl Logger {
    /// ```
    /// use structured_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .min_level(LogLevel::Info)
    ///     .encoding(Encoding::Console)
    ///     .static_fields(vec![fields::string("service", "billing")])
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Wrap an arbitrary backend with default facade settings
    pub fn from_backend(backend: Arc<dyn Backend>) -> Self {
        Self::builder().backend(backend).build()
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.backend.enabled(level)
    }

    /// Log a record with typed fields.
    ///
    /// Panic-level calls unwind and fatal-level calls run the fatal hook even
    /// when the level is disabled.
    #[track_caller]
    pub fn log(
        &self,
        ctx: &Context,
        level: LogLevel,
        message: impl AsRef<str>,
        fields: impl IntoIterator<Item = Field>,
    ) {
        let message = message.as_ref();
        self.record(ctx, level, message, fields, Location::caller());
        self.escalate(level, message);
    }

    /// Log a record with alternating keys and values.
    ///
    /// A value that already is a [`Field`] is taken as-is; otherwise a string
    /// key consumes the value after it, whose kind is inferred.
    #[track_caller]
    pub fn logw(
        &self,
        ctx: &Context,
        level: LogLevel,
        message: impl AsRef<str>,
        key_values: impl IntoIterator<Item = Untyped>,
    ) {
        let message = message.as_ref();
        self.record_sugared(ctx, level, message, key_values, Location::caller());
        self.escalate(level, message);
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, ctx: &Context, message: impl AsRef<str>, fields: impl IntoIterator<Item = Field>) {
        self.log(ctx, LogLevel::Debug, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, ctx: &Context, message: impl AsRef<str>, fields: impl IntoIterator<Item = Field>) {
        self.log(ctx, LogLevel::Info, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, ctx: &Context, message: impl AsRef<str>, fields: impl IntoIterator<Item = Field>) {
        self.log(ctx, LogLevel::Warn, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, ctx: &Context, message: impl AsRef<str>, fields: impl IntoIterator<Item = Field>) {
        self.log(ctx, LogLevel::Error, message, fields);
    }

    /// Write the record, then panic with `message`
    #[track_caller]
    pub fn panic(&self, ctx: &Context, message: impl AsRef<str>, fields: impl IntoIterator<Item = Field>) -> ! {
        let message = message.as_ref();
        self.record(ctx, LogLevel::Panic, message, fields, Location::caller());
        panic!("{}", message)
    }

    /// Write and flush the record, then run the fatal hook
    #[inline]
    #[track_caller]
    pub fn fatal(&self, ctx: &Context, message: impl AsRef<str>, fields: impl IntoIterator<Item = Field>) {
        self.log(ctx, LogLevel::Fatal, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn debugw(&self, ctx: &Context, message: impl AsRef<str>, key_values: impl IntoIterator<Item = Untyped>) {
        self.logw(ctx, LogLevel::Debug, message, key_values);
    }

    #[inline]
    #[track_caller]
    pub fn infow(&self, ctx: &Context, message: impl AsRef<str>, key_values: impl IntoIterator<Item = Untyped>) {
        self.logw(ctx, LogLevel::Info, message, key_values);
    }

    #[inline]
    #[track_caller]
    pub fn warnw(&self, ctx: &Context, message: impl AsRef<str>, key_values: impl IntoIterator<Item = Untyped>) {
        self.logw(ctx, LogLevel::Warn, message, key_values);
    }

    #[inline]
    #[track_caller]
    pub fn errorw(&self, ctx: &Context, message: impl AsRef<str>, key_values: impl IntoIterator<Item = Untyped>) {
        self.logw(ctx, LogLevel::Error, message, key_values);
    }

    #[track_caller]
    pub fn panicw(&self, ctx: &Context, message: impl AsRef<str>, key_values: impl IntoIterator<Item = Untyped>) -> ! {
        let message = message.as_ref();
        self.record_sugared(ctx, LogLevel::Panic, message, key_values, Location::caller());
        panic!("{}", message)
    }

    #[inline]
    #[track_caller]
    pub fn fatalw(&self, ctx: &Context, message: impl AsRef<str>, key_values: impl IntoIterator<Item = Untyped>) {
        self.logw(ctx, LogLevel::Fatal, message, key_values);
    }

    /// A child logger with `fields` appended to the static fields
    #[must_use]
    pub fn with(&self, fields: impl IntoIterator<Item = Field>) -> Logger {
        let mut child = self.clone();
        translate_into(&mut child.static_context, fields, &self.encoder);
        child
    }

    /// Flush everything written so far
    pub fn sync(&self) -> Result<()> {
        self.backend.flush()
    }

    pub fn metrics(&self) -> Option<&LoggerMetrics> {
        self.backend.metrics()
    }

    /// The pre-encoded static fields
    pub fn static_fields(&self) -> &LogContext {
        &self.static_context
    }

    fn record(
        &self,
        ctx: &Context,
        level: LogLevel,
        message: &str,
        fields: impl IntoIterator<Item = Field>,
        location: &'static Location<'static>,
    ) {
        if !self.backend.enabled(level) {
            return;
        }

        let mut fields: Vec<Field> = fields.into_iter().collect();
        if let Some(ref provider) = self.dynamic_fields {
            fields.extend(provider(ctx));
        }
        self.emit(level, message, fields, location);
    }

    fn record_sugared(
        &self,
        ctx: &Context,
        level: LogLevel,
        message: &str,
        key_values: impl IntoIterator<Item = Untyped>,
        location: &'static Location<'static>,
    ) {
        if !self.backend.enabled(level) {
            return;
        }

        let mut args = match self.dynamic_key_values {
            Some(ref provider) => provider(ctx),
            None => Vec::new(),
        };
        args.extend(key_values);

        let fields = self.sweeten(args, location);
        self.emit(level, message, fields, location);
    }

    fn emit(&self, level: LogLevel, message: &str, fields: Vec<Field>, location: &'static Location<'static>) {
        let mut context = self.static_context.clone();
        translate_into(&mut context, fields, &self.encoder);

        let mut entry = LogEntry::new(level, message).with_context(context);
        if self.add_caller {
            entry = entry.with_caller(location);
        }
        self.backend.write(entry);
    }

    #[track_caller]
    fn escalate(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Panic => panic!("{}", message),
            LogLevel::Fatal => {
                if let Err(e) = self.backend.flush() {
                    eprintln!("[LOGGER ERROR] Failed to flush before fatal exit: {}", e);
                }
                (self.fatal_hook)(message);
            }
            _ => {}
        }
    }

    /// Pair up loosely-typed arguments into fields.
    ///
    /// A dangling key and non-string keys are reported in separate
    /// error-level records instead of being silently lost.
    fn sweeten(&self, args: Vec<Untyped>, location: &'static Location<'static>) -> Vec<Field> {
        let mut fields = Vec::with_capacity(args.len() / 2);
        let mut invalid = Vec::new();
        let mut args = args.into_iter().enumerate();

        while let Some((position, mut arg)) = args.next() {
            if let Some(field) = arg.take::<Field>() {
                fields.push(field);
                continue;
            }

            let Some((_, value)) = args.next() else {
                self.report_misuse(ODD_KEY_VALUES_MESSAGE, vec![arg.into_field("ignored")], location);
                break;
            };

            match arg.as_str().map(str::to_owned) {
                Some(key) => fields.push(value.into_field(key)),
                None => {
                    let mut pair = LogContext::new().with_field("position", position);
                    translate_into(
                        &mut pair,
                        [arg.into_field("key"), value.into_field("value")],
                        &self.encoder,
                    );
                    invalid.push(serde_json::Value::Object(pair.into_map()));
                }
            }
        }

        if !invalid.is_empty() {
            self.report_misuse(
                NON_STRING_KEYS_MESSAGE,
                vec![crate::fields::reflect_json("invalid", serde_json::Value::Array(invalid))],
                location,
            );
        }

        fields
    }

    fn report_misuse(&self, message: &str, fields: Vec<Field>, location: &'static Location<'static>) {
        if self.backend.enabled(LogLevel::Error) {
            self.emit(LogLevel::Error, message, fields, location);
        }
    }
}

impl Default for Logger {
    /// JSON to stdout at debug level
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("static_fields", &self.static_context)
            .field("dynamic_fields", &self.dynamic_fields.is_some())
            .field("dynamic_key_values", &self.dynamic_key_values.is_some())
            .field("encoder", &self.encoder)
            .field("add_caller", &self.add_caller)
            .finish()
    }
}

/// Builder for constructing a Logger with a fluent API
///
/// Options apply in call order: a later call overrides an earlier one, and
/// list-valued options such as [`static_fields`](Self::static_fields) replace
/// rather than merge. Without a writer or appender, records go to stdout.
///
/// ```
/// use structured_logger::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Debug)
///     .appender(ConsoleAppender::new())
///     .async_mode(1000)
///     .overflow_policy(OverflowPolicy::AlertAndDrop)
///     .on_overflow(Arc::new(|count| {
///         eprintln!("ALERT: {} logs dropped", count);
///     }))
///     .build();
/// ```
#[must_use = "builder methods return a new value"]
pub struct LoggerBuilder {
    min_level: LogLevel,
    output_format: OutputFormat,
    timestamp_format: TimestampFormat,
    encoder: EncoderConfig,
    writer: Option<Box<dyn Write + Send + Sync>>,
    appenders: Vec<Box<dyn Appender>>,
    backend: Option<Arc<dyn Backend>>,
    static_fields: Vec<Field>,
    dynamic_fields: Option<FieldsProvider>,
    dynamic_key_values: Option<KeyValuesProvider>,
    fatal_hook: Option<FatalHook>,
    async_buffer: Option<usize>,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
    add_caller: bool,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Debug,
            output_format: OutputFormat::Json,
            timestamp_format: TimestampFormat::default(),
            encoder: EncoderConfig::default(),
            writer: None,
            appenders: Vec::new(),
            backend: None,
            static_fields: Vec::new(),
            dynamic_fields: None,
            dynamic_key_values: None,
            fatal_hook: None,
            async_buffer: None,
            overflow_policy: OverflowPolicy::AlertAndDrop,
            on_overflow: None,
            add_caller: true,
        }
    }

    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Select structured (`Json`) or human-readable (`Console`) output
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.output_format = encoding.into();
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Format of the record timestamp written by the writer sink
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Encoding of `time` field values
    pub fn field_time_format(mut self, format: TimestampFormat) -> Self {
        self.encoder.time_format = format;
        self
    }

    /// Encoding of `duration` field values
    pub fn duration_format(mut self, format: DurationFormat) -> Self {
        self.encoder.duration_format = format;
        self
    }

    /// Output sink; replaces any earlier writer
    pub fn writer<W>(mut self, writer: W) -> Self
    where
        W: Write + Send + Sync + 'static,
    {
        self.writer = Some(Box::new(writer));
        self
    }

    /// Add an appender next to the writer sink
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    /// Replace the built-in engine.
    ///
    /// The level, sink, appender and async options are then ignored.
    pub fn backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Fields written on every record; replaces any earlier list
    pub fn static_fields(mut self, fields: Vec<Field>) -> Self {
        self.static_fields = fields;
        self
    }

    pub fn dynamic_fields<F>(mut self, provider: F) -> Self
    where
        F: Fn(&Context) -> Vec<Field> + Send + Sync + 'static,
    {
        self.dynamic_fields = Some(Arc::new(provider));
        self
    }

    pub fn dynamic_key_values<F>(mut self, provider: F) -> Self
    where
        F: Fn(&Context) -> Vec<Untyped> + Send + Sync + 'static,
    {
        self.dynamic_key_values = Some(Arc::new(provider));
        self
    }

    /// Replace the default fatal action, `std::process::exit(1)`
    pub fn fatal_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.fatal_hook = Some(Arc::new(hook));
        self
    }

    /// Enable async mode with specified buffer size
    ///
    /// If not called, records are written on the caller's thread. The size
    /// must be at least 1; see [`LoggerBuilder::try_build`].
    pub fn async_mode(mut self, buffer_size: usize) -> Self {
        self.async_buffer = Some(buffer_size);
        self
    }

    /// Determines what happens when the async buffer is full.
    /// Default is `AlertAndDrop`.
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    /// Invoked with the total count of dropped records
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }

    /// Record the call site of every log call (on by default)
    pub fn add_caller(mut self, enabled: bool) -> Self {
        self.add_caller = enabled;
        self
    }

    fn build_engine(
        min_level: LogLevel,
        async_buffer: Option<usize>,
        overflow_policy: OverflowPolicy,
        on_overflow: Option<OverflowCallback>,
        appenders: Vec<Box<dyn Appender>>,
    ) -> Engine {
        let mut engine = match async_buffer {
            Some(size) => Engine::with_async_config(size, overflow_policy, on_overflow),
            None => Engine::new(),
        };

        engine.set_min_level(min_level);
        for appender in appenders {
            engine.add_appender(appender);
        }
        engine
    }

    fn validate(&self) -> Result<()> {
        if self.async_buffer == Some(0) {
            return Err(LoggerError::config("async_mode", "buffer size must be at least 1"));
        }
        Ok(())
    }

    /// Build the logger, or report why the configuration is invalid
    pub fn try_build(self) -> Result<Logger> {
        self.validate()?;
        Ok(self.build())
    }

    /// Build the logger.
    ///
    /// An invalid configuration is reported on stderr and corrected: a zero
    /// async buffer becomes a buffer of one.
    #[must_use]
    pub fn build(mut self) -> Logger {
        if let Err(e) = self.validate() {
            eprintln!("[LOGGER WARNING] {}. Using a buffer of 1.", e);
            self.async_buffer = Some(1);
        }

        let encoder = Arc::new(self.encoder);

        let backend = match self.backend {
            Some(backend) => backend,
            None => {
                let mut appenders = self.appenders;
                let writer = match self.writer {
                    Some(writer) => Some(writer),
                    None if appenders.is_empty() => {
                        Some(Box::new(std::io::stdout()) as Box<dyn Write + Send + Sync>)
                    }
                    None => None,
                };
                if let Some(writer) = writer {
                    let sink = WriterAppender::new(writer)
                        .with_output_format(self.output_format)
                        .with_timestamp_format(self.timestamp_format);
                    appenders.insert(0, Box::new(sink));
                }

                Arc::new(Self::build_engine(
                    self.min_level,
                    self.async_buffer,
                    self.overflow_policy,
                    self.on_overflow,
                    appenders,
                )) as Arc<dyn Backend>
            }
        };

        let fatal_hook: FatalHook = match self.fatal_hook {
            Some(hook) => hook,
            None => Arc::new(|_message: &str| std::process::exit(1)),
        };

        Logger {
            backend,
            static_context: translate(self.static_fields, &encoder),
            dynamic_fields: self.dynamic_fields,
            dynamic_key_values: self.dynamic_key_values,
            encoder,
            fatal_hook,
            add_caller: self.add_caller,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
