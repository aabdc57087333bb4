//! Core logger types and traits

pub mod appender;
pub mod backend;
pub mod context;
pub mod engine;
pub mod error;
pub mod global;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod overflow_policy;
pub mod timestamp;
pub mod translate;

pub use appender::Appender;
pub use backend::Backend;
pub use context::Context;
pub use engine::{Engine, DEFAULT_SHUTDOWN_TIMEOUT};
pub use error::{LoggerError, Result};
pub use log_context::LogContext;
pub use log_entry::{Caller, LogEntry};
pub use log_level::LogLevel;
pub use logger::{FatalHook, FieldsProvider, KeyValuesProvider, Logger, LoggerBuilder};
pub use metrics::{LoggerMetrics, MetricsSnapshot};
pub use output_format::{Encoding, OutputFormat};
pub use overflow_policy::{LogPriority, OverflowCallback, OverflowPolicy};
pub use timestamp::{DurationFormat, TimestampFormat};
pub use translate::{translate, translate_into, EncoderConfig};
