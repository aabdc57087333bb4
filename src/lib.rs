//! # Structured Logger
//!
//! A leveled, structured logging facade. Records carry a message plus an
//! ordered list of typed [`fields`]; the facade merges static, call-site and
//! context-derived fields, translates them into a JSON-compatible form and
//! hands them to a pluggable [`Backend`].
//!
//! ## Features
//!
//! - **Typed fields**: one constructor per kind, plus optional and repeated variants
//! - **Kind inference**: [`fields::any`] picks the most specific kind for a value
//! - **Two call styles**: typed (`info`) and sugared key/value (`infow`)
//! - **Context-aware**: fields derived from a request-scoped [`Context`]
//! - **Async engine**: bounded queue with overflow policies and metrics
//!
//! ## Example
//!
//! ```
//! use structured_logger::prelude::*;
//!
//! let memory = MemoryAppender::new();
//! let logger = Logger::builder()
//!     .min_level(LogLevel::Info)
//!     .static_fields(vec![fields::string("service", "checkout")])
//!     .appender(memory.clone())
//!     .build();
//!
//! let ctx = Context::background();
//! logger.info(&ctx, "order placed", vec![
//!     fields::uint64("order_id", 1001),
//!     fields::float64("total", 42.5),
//! ]);
//! logger.debug(&ctx, "filtered out", vec![]);
//!
//! let records = memory.records();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0]["service"], "checkout");
//! assert_eq!(records[0]["order_id"], 1001);
//! ```

pub mod appenders;
pub mod core;
pub mod fields;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, FileAppender, MemoryAppender, WriterAppender};
    pub use crate::core::{
        Appender, Backend, Context, DurationFormat, Encoding, LogContext, LogEntry, LogLevel,
        LogPriority, Logger, LoggerBuilder, LoggerError, LoggerMetrics, OutputFormat,
        OverflowCallback, OverflowPolicy, Result, TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::fields::{self, Field, Untyped};
}

pub use crate::appenders::{ConsoleAppender, FileAppender, MemoryAppender, SharedBuffer, WriterAppender};
pub use crate::core::global::{
    debug, debugw, error, errorw, fatal, fatalw, global, info, infow, panic, panicw,
    replace_globals, warn, warnw,
};
pub use crate::core::{
    translate, translate_into, Appender, Backend, Caller, Context, DurationFormat, EncoderConfig,
    Encoding, Engine, FatalHook, FieldsProvider, KeyValuesProvider, LogContext, LogEntry,
    LogLevel, LogPriority, Logger, LoggerBuilder, LoggerError, LoggerMetrics, MetricsSnapshot,
    OutputFormat, OverflowCallback, OverflowPolicy, Result, TimestampFormat,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use crate::fields::{Field, FieldKind, FieldValue, Untyped};
