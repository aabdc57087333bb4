//! Overflow policies for the async engine queue
//!
//! When the bounded queue between callers and the writer thread is full,
//! the policy decides what happens to the incoming record. Critical records
//! bypass the policy and are written synchronously.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Policy for handling queue overflow in async mode
///
/// ```
/// use structured_logger::core::OverflowPolicy;
/// use std::time::Duration;
///
/// let policy = OverflowPolicy::BlockWithTimeout(Duration::from_millis(100));
/// assert!(policy.may_block());
/// assert!(!OverflowPolicy::default().may_block());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Drop the incoming record, counting it
    DropNewest,

    /// Evict the oldest queued record to make room
    DropOldest,

    /// Wait for space; back-pressures the caller
    Block,

    /// Wait up to the timeout, then drop with an alert
    BlockWithTimeout(Duration),

    /// Drop, warn on stderr and notify the overflow callback
    #[default]
    AlertAndDrop,
}

impl OverflowPolicy {
    pub fn may_block(&self) -> bool {
        matches!(self, OverflowPolicy::Block | OverflowPolicy::BlockWithTimeout(_))
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
            OverflowPolicy::DropOldest => write!(f, "DropOldest"),
            OverflowPolicy::Block => write!(f, "Block"),
            OverflowPolicy::BlockWithTimeout(d) => write!(f, "BlockWithTimeout({:?})", d),
            OverflowPolicy::AlertAndDrop => write!(f, "AlertAndDrop"),
        }
    }
}

/// Priority of a record when the queue overflows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogPriority {
    /// Debug, Info
    #[default]
    Normal = 0,
    /// Warn
    High = 1,
    /// Error, Panic, Fatal; never dropped
    Critical = 2,
}

impl fmt::Display for LogPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogPriority::Normal => write!(f, "Normal"),
            LogPriority::High => write!(f, "High"),
            LogPriority::Critical => write!(f, "Critical"),
        }
    }
}

/// Called with the running total of dropped records
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_policy_default() {
        assert_eq!(OverflowPolicy::default(), OverflowPolicy::AlertAndDrop);
    }

    #[test]
    fn test_overflow_policy_display() {
        assert_eq!(OverflowPolicy::DropOldest.to_string(), "DropOldest");
        assert_eq!(
            OverflowPolicy::BlockWithTimeout(Duration::from_millis(100)).to_string(),
            "BlockWithTimeout(100ms)"
        );
    }

    #[test]
    fn test_log_priority_ordering() {
        assert!(LogPriority::Normal < LogPriority::High);
        assert!(LogPriority::High < LogPriority::Critical);
    }
}
