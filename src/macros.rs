//! Logging macros for ergonomic log message formatting.
//!
//! The message is built with `format!`, and typed fields follow a `;`.
//! Formatting only happens once the level is known to be enabled.
//!
//! # Examples
//!
//! ```
//! use structured_logger::prelude::*;
//! use structured_logger::{info, kv};
//!
//! let logger = Logger::builder().appender(MemoryAppender::new()).build();
//! let ctx = Context::background();
//!
//! // Basic logging
//! info!(logger, &ctx, "Server started");
//!
//! // With format arguments and fields
//! let port = 8080;
//! info!(logger, &ctx, "Server listening on port {}", port; fields::uint16("port", port));
//!
//! // Sugared key/values
//! logger.infow(&ctx, "User logged in", kv!["user_id", 42, "action", "login"]);
//! ```

/// Log a formatted message at an explicit level, with optional fields.
///
/// # Examples
///
/// ```
/// # use structured_logger::prelude::*;
/// # let logger = Logger::builder().appender(MemoryAppender::new()).build();
/// # let ctx = Context::background();
/// use structured_logger::log;
/// log!(logger, &ctx, LogLevel::Info, "Simple message");
/// log!(logger, &ctx, LogLevel::Error, "Error code: {}", 500; fields::int("code", 500));
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $ctx:expr, $level:expr, $fmt:literal $(, $arg:expr)* ; $($field:expr),+ $(,)?) => {{
        let level = $level;
        let logger = &$logger;
        if logger.enabled(level) || level.escalates() {
            logger.log($ctx, level, format!($fmt $(, $arg)*), vec![$($field),+]);
        }
    }};
    ($logger:expr, $ctx:expr, $level:expr, $fmt:literal $(, $arg:expr)*) => {{
        let level = $level;
        let logger = &$logger;
        if logger.enabled(level) || level.escalates() {
            logger.log($ctx, level, format!($fmt $(, $arg)*), ::std::vec::Vec::new());
        }
    }};
}

/// Log a debug-level message.
///
/// ```
/// # use structured_logger::prelude::*;
/// # let logger = Logger::builder().appender(MemoryAppender::new()).build();
/// # let ctx = Context::background();
/// use structured_logger::debug;
/// debug!(logger, &ctx, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, $ctx, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, $ctx, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// ```
/// # use structured_logger::prelude::*;
/// # let logger = Logger::builder().appender(MemoryAppender::new()).build();
/// # let ctx = Context::background();
/// use structured_logger::warn;
/// warn!(logger, &ctx, "Retry attempt {} of {}", 3, 5; fields::int("attempt", 3));
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, $ctx, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, $ctx, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message, then run the logger's fatal hook.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, $ctx, $crate::LogLevel::Fatal, $($arg)+)
    };
}

/// Build the loosely-typed argument list of the sugared methods.
///
/// ```
/// use structured_logger::{fields, kv};
///
/// let args = kv!["user", "ana", fields::int("attempt", 2), "ok", true];
/// assert_eq!(args.len(), 5);
/// assert_eq!(args[0].as_str(), Some("user"));
/// ```
#[macro_export]
macro_rules! kv {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::fields::Untyped::new($value)),*]
    };
}
