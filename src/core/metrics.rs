//! Engine counters
//!
//! Tracks dropped records, queue overflow, blocking and escalation events.
//! A [`MetricsSnapshot`] is a plain serializable copy, so the counters can be
//! logged like any other value:
//!
//! ```
//! use structured_logger::core::LoggerMetrics;
//! use structured_logger::fields;
//!
//! let metrics = LoggerMetrics::new();
//! metrics.record_logged();
//! let field = fields::reflect("logger_metrics", metrics.snapshot());
//! assert_eq!(field.key(), "logger_metrics");
//! ```

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records dropped on overflow or lost to a failing appender
    dropped_count: AtomicU64,

    /// Records handed to every appender successfully
    total_logged: AtomicU64,

    /// Number of times the async queue was found full
    queue_full_events: AtomicU64,

    /// Number of times a caller waited for queue space
    block_events: AtomicU64,

    /// Critical records written synchronously instead of being dropped
    critical_logs_preserved: AtomicU64,

    /// Panic and fatal records that escalated after being written
    escalations: AtomicU64,
}

/// Point-in-time copy of [`LoggerMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub dropped: u64,
    pub logged: u64,
    pub queue_full_events: u64,
    pub block_events: u64,
    pub critical_preserved: u64,
    pub escalations: u64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            dropped_count: AtomicU64::new(0),
            total_logged: AtomicU64::new(0),
            queue_full_events: AtomicU64::new(0),
            block_events: AtomicU64::new(0),
            critical_logs_preserved: AtomicU64::new(0),
            escalations: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queue_full_events(&self) -> u64 {
        self.queue_full_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_events(&self) -> u64 {
        self.block_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn critical_logs_preserved(&self) -> u64 {
        self.critical_logs_preserved.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn escalations(&self) -> u64 {
        self.escalations.load(Ordering::Relaxed)
    }

    /// Record a dropped log, returning the previous count
    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_queue_full(&self) -> u64 {
        self.queue_full_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_block(&self) -> u64 {
        self.block_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_critical_preserved(&self) -> u64 {
        self.critical_logs_preserved.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_escalation(&self) -> u64 {
        self.escalations.fetch_add(1, Ordering::Relaxed)
    }

    /// Drop rate as a percentage (0.0 - 100.0); 0.0 before any record
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = self.total_logged() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            dropped: self.dropped_count(),
            logged: self.total_logged(),
            queue_full_events: self.queue_full_events(),
            block_events: self.block_events(),
            critical_preserved: self.critical_logs_preserved(),
            escalations: self.escalations(),
        }
    }

    pub fn reset(&self) {
        self.dropped_count.store(0, Ordering::Relaxed);
        self.total_logged.store(0, Ordering::Relaxed);
        self.queue_full_events.store(0, Ordering::Relaxed);
        self.block_events.store(0, Ordering::Relaxed);
        self.critical_logs_preserved.store(0, Ordering::Relaxed);
        self.escalations.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}
