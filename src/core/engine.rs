//! The writing engine behind the logger facade
//!
//! `Engine` owns the appenders and decides when records reach them: on the
//! caller's thread in synchronous mode, or through a bounded queue drained by
//! a worker thread in async mode. Panic and fatal records always bypass the
//! queue, after everything queued before them has been written.

use super::{
    appender::Appender,
    backend::Backend,
    error::{panic_message, Result},
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    overflow_policy::{LogPriority, OverflowCallback, OverflowPolicy},
};
use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default shutdown timeout for engine cleanup (5 seconds)
///
/// Used when the engine is dropped without an explicit `shutdown()`, and as
/// the bound on how long `flush()` waits for the async queue to drain.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

const BATCH_SIZE: usize = 50;
const BATCH_TIMEOUT_MS: u64 = 10;
const WORKER_THREAD_NAME: &str = "structured-logger";

type SharedAppenders = Arc<RwLock<Vec<Box<dyn Appender>>>>;

pub struct Engine {
    min_level: LogLevel,
    appenders: SharedAppenders,
    sender: RwLock<Option<Sender<LogEntry>>>,
    /// Second receiver used to evict the oldest record under `DropOldest`
    evictor: Option<Receiver<LogEntry>>,
    async_handle: Mutex<Option<thread::JoinHandle<()>>>,
    /// Records accepted into the queue and not yet written
    pending: Arc<AtomicUsize>,
    metrics: Arc<LoggerMetrics>,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
}

impl Engine {
    /// Synchronous engine writing on the caller's thread
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Debug,
            appenders: Arc::new(RwLock::new(Vec::new())),
            sender: RwLock::new(None),
            evictor: None,
            async_handle: Mutex::new(None),
            pending: Arc::new(AtomicUsize::new(0)),
            metrics: Arc::new(LoggerMetrics::new()),
            overflow_policy: OverflowPolicy::AlertAndDrop,
            on_overflow: None,
        }
    }

    #[must_use]
    pub fn with_async(buffer_size: usize) -> Self {
        Self::with_async_config(buffer_size, OverflowPolicy::AlertAndDrop, None)
    }

    /// Async engine with custom overflow configuration
    ///
    /// A zero `buffer_size` is raised to one.
    #[must_use]
    pub fn with_async_config(
        buffer_size: usize,
        overflow_policy: OverflowPolicy,
        on_overflow: Option<OverflowCallback>,
    ) -> Self {
        let mut engine = Self::new();
        engine.overflow_policy = overflow_policy;
        engine.on_overflow = on_overflow;

        let (sender, receiver) = bounded(buffer_size.max(1));
        let appenders = Arc::clone(&engine.appenders);
        let metrics = Arc::clone(&engine.metrics);
        let pending = Arc::clone(&engine.pending);
        let worker_receiver = receiver.clone();

        let spawned = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || Self::run_worker(worker_receiver, appenders, metrics, pending));

        match spawned {
            Ok(handle) => {
                if engine.overflow_policy == OverflowPolicy::DropOldest {
                    engine.evictor = Some(receiver);
                }
                *engine.sender.get_mut() = Some(sender);
                *engine.async_handle.get_mut() = Some(handle);
            }
            Err(e) => {
                eprintln!(
                    "[LOGGER ERROR] Failed to spawn async worker thread: {}. \
                     Falling back to synchronous writes.",
                    e
                );
            }
        }

        engine
    }

    fn run_worker(
        receiver: Receiver<LogEntry>,
        appenders: SharedAppenders,
        metrics: Arc<LoggerMetrics>,
        pending: Arc<AtomicUsize>,
    ) {
        let mut batch = Vec::with_capacity(BATCH_SIZE);

        loop {
            match receiver.recv() {
                Ok(entry) => batch.push(entry),
                // Channel closed and drained
                Err(_) => break,
            }

            while batch.len() < BATCH_SIZE {
                match receiver.try_recv() {
                    Ok(entry) => batch.push(entry),
                    Err(_) => break,
                }
            }

            if batch.len() < BATCH_SIZE {
                // Small batch - wait a bit for more entries
                thread::sleep(Duration::from_millis(BATCH_TIMEOUT_MS));
                while batch.len() < BATCH_SIZE {
                    match receiver.try_recv() {
                        Ok(entry) => batch.push(entry),
                        Err(_) => break,
                    }
                }
            }

            Self::process_batch(&appenders, &batch, &metrics);
            pending.fetch_sub(batch.len(), Ordering::AcqRel);
            batch.clear();
        }
    }

    /// Write a batch, then flush once.
    ///
    /// Each appender call is isolated with `catch_unwind`, so one panicking
    /// appender never keeps the others from receiving the record.
    fn process_batch(appenders: &SharedAppenders, batch: &[LogEntry], metrics: &LoggerMetrics) {
        let mut appenders_guard = appenders.write();
        for entry in batch {
            Self::process_entry(&mut appenders_guard, entry, metrics);
        }
        Self::flush_isolated(&mut appenders_guard);
    }

    /// Returns true if any appender failed
    fn process_entry(
        appenders: &mut [Box<dyn Appender>],
        entry: &LogEntry,
        metrics: &LoggerMetrics,
    ) -> bool {
        let mut has_error = false;

        for (idx, appender) in appenders.iter_mut().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| appender.append(entry))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Appender #{} ({}) failed: {}", idx, appender.name(), e);
                    has_error = true;
                }
                Err(payload) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Appender #{} panicked: {}. \
                         Other appenders continue to function.",
                        idx,
                        panic_message(payload.as_ref())
                    );
                    has_error = true;
                }
            }
        }

        if has_error {
            metrics.record_dropped();
        } else {
            metrics.record_logged();
        }

        has_error
    }

    fn flush_isolated(appenders: &mut [Box<dyn Appender>]) {
        for (idx, appender) in appenders.iter_mut().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| appender.flush())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Appender #{} flush failed: {}", idx, e);
                }
                Err(payload) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Appender #{} panicked during flush: {}. \
                         Other appenders continue to function.",
                        idx,
                        panic_message(payload.as_ref())
                    );
                }
            }
        }
    }

    pub fn add_appender(&mut self, appender: Box<dyn Appender>) {
        self.appenders.write().push(appender);
    }

    pub fn set_min_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn is_async(&self) -> bool {
        self.sender.read().is_some()
    }

    pub fn appender_names(&self) -> Vec<String> {
        self.appenders.read().iter().map(|a| a.name().to_string()).collect()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    fn write_sync(&self, entry: &LogEntry) {
        let mut appenders = self.appenders.write();
        Self::process_entry(&mut appenders, entry, &self.metrics);
    }

    fn send_entry(&self, entry: LogEntry) {
        let guard = self.sender.read();
        let Some(sender) = guard.as_ref() else {
            drop(guard);
            self.write_sync(&entry);
            return;
        };

        let priority = entry.level.priority();
        match self.try_enqueue(sender, entry) {
            Ok(()) => {}
            Err(TrySendError::Full(entry)) => self.handle_overflow(sender, entry, priority),
            Err(TrySendError::Disconnected(entry)) => {
                // Worker is gone; keep the record
                self.write_sync(&entry);
            }
        }
    }

    fn try_enqueue(
        &self,
        sender: &Sender<LogEntry>,
        entry: LogEntry,
    ) -> std::result::Result<(), TrySendError<LogEntry>> {
        self.pending.fetch_add(1, Ordering::AcqRel);
        sender.try_send(entry).inspect_err(|_| {
            self.pending.fetch_sub(1, Ordering::AcqRel);
        })
    }

    /// Handle queue overflow based on configured policy and record priority
    fn handle_overflow(&self, sender: &Sender<LogEntry>, entry: LogEntry, priority: LogPriority) {
        self.metrics.record_queue_full();

        if priority == LogPriority::Critical {
            self.force_write_critical(entry);
            return;
        }

        match &self.overflow_policy {
            OverflowPolicy::DropNewest => {
                self.metrics.record_dropped();
            }

            OverflowPolicy::DropOldest => {
                self.evict_oldest();
                match self.try_enqueue(sender, entry) {
                    Ok(()) => {}
                    Err(TrySendError::Full(entry)) => self.alert_and_drop(entry),
                    Err(TrySendError::Disconnected(entry)) => self.write_sync(&entry),
                }
            }

            OverflowPolicy::Block => {
                self.metrics.record_block();
                self.pending.fetch_add(1, Ordering::AcqRel);
                if let Err(e) = sender.send(entry) {
                    self.pending.fetch_sub(1, Ordering::AcqRel);
                    self.write_sync(&e.into_inner());
                }
            }

            OverflowPolicy::BlockWithTimeout(timeout) => {
                self.metrics.record_block();
                self.pending.fetch_add(1, Ordering::AcqRel);
                match sender.send_timeout(entry, *timeout) {
                    Ok(()) => {}
                    Err(SendTimeoutError::Timeout(entry)) => {
                        self.pending.fetch_sub(1, Ordering::AcqRel);
                        self.alert_and_drop(entry);
                    }
                    Err(SendTimeoutError::Disconnected(entry)) => {
                        self.pending.fetch_sub(1, Ordering::AcqRel);
                        self.write_sync(&entry);
                    }
                }
            }

            OverflowPolicy::AlertAndDrop => {
                self.alert_and_drop(entry);
            }
        }
    }

    /// Remove the oldest queued record; a critical one is written instead
    fn evict_oldest(&self) {
        let Some(ref evictor) = self.evictor else {
            return;
        };

        if let Ok(oldest) = evictor.try_recv() {
            self.pending.fetch_sub(1, Ordering::AcqRel);
            if oldest.level.priority() == LogPriority::Critical {
                self.force_write_critical(oldest);
            } else {
                self.metrics.record_dropped();
            }
        }
    }

    fn force_write_critical(&self, entry: LogEntry) {
        self.metrics.record_critical_preserved();
        self.write_sync(&entry);
    }

    fn alert_and_drop(&self, _entry: LogEntry) {
        let dropped_count = self.metrics.record_dropped() + 1;

        // Alert on first drop and periodically thereafter
        if dropped_count == 1 || dropped_count % 1000 == 0 {
            eprintln!(
                "[LOGGER WARNING] Queue full, {} logs dropped. \
                 Consider increasing buffer size or using a different overflow policy.",
                dropped_count
            );

            if let Some(ref callback) = self.on_overflow {
                callback(dropped_count);
            }
        }
    }

    /// Wait until the worker has written every queued record
    fn wait_for_pending(&self, timeout: Duration) -> bool {
        let start = Instant::now();
        while self.pending.load(Ordering::Acquire) > 0 {
            if start.elapsed() >= timeout {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
        true
    }

    fn flush_appenders(&self) -> Result<()> {
        let mut appenders = self.appenders.write();
        for appender in appenders.iter_mut() {
            appender.flush()?;
        }
        Ok(())
    }

    /// Gracefully shut down with a custom timeout
    ///
    /// Closes the queue, waits for the worker to drain it and flushes every
    /// appender. Records logged afterwards are written synchronously.
    /// Returns `false` if the worker did not finish in time or a flush failed.
    ///
    /// ```
    /// use structured_logger::core::{Backend, Engine, LogEntry, LogLevel};
    /// use std::time::Duration;
    ///
    /// let engine = Engine::with_async(1000);
    /// engine.write(LogEntry::new(LogLevel::Info, "Important message"));
    /// assert!(engine.shutdown(Duration::from_secs(10)));
    /// ```
    pub fn shutdown(&self, timeout: Duration) -> bool {
        // Closing the channel signals the worker
        drop(self.sender.write().take());

        if let Some(handle) = self.async_handle.lock().take() {
            let start = Instant::now();

            loop {
                if handle.is_finished() {
                    if let Err(e) = handle.join() {
                        eprintln!(
                            "[LOGGER ERROR] Async worker thread panicked during shutdown: {:?}",
                            e
                        );
                        return false;
                    }
                    break;
                }

                if start.elapsed() >= timeout {
                    eprintln!(
                        "[LOGGER WARNING] Async worker thread did not finish within {:?} timeout. \
                         Some logs may be lost.",
                        timeout
                    );
                    return false;
                }

                thread::sleep(Duration::from_millis(10));
            }
        }

        if let Err(e) = self.flush_appenders() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
            return false;
        }

        true
    }
}

impl Backend for Engine {
    #[inline]
    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn write(&self, entry: LogEntry) {
        if entry.level.escalates() {
            self.metrics.record_escalation();
            if !self.wait_for_pending(DEFAULT_SHUTDOWN_TIMEOUT) {
                eprintln!("[LOGGER WARNING] Queued logs not drained before {} record", entry.level);
            }
            self.write_sync(&entry);
            let mut appenders = self.appenders.write();
            Self::flush_isolated(&mut appenders);
            return;
        }

        self.send_entry(entry);
    }

    fn flush(&self) -> Result<()> {
        if !self.wait_for_pending(DEFAULT_SHUTDOWN_TIMEOUT) {
            eprintln!("[LOGGER WARNING] Flush timed out with queued logs still pending");
        }
        self.flush_appenders()
    }

    fn metrics(&self) -> Option<&LoggerMetrics> {
        Some(&self.metrics)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} dropped logs (drop rate: {:.2}%)",
                dropped,
                self.metrics.drop_rate()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemoryAppender;
    use crate::core::LoggerError;
    use std::sync::atomic::AtomicU64;

    fn engine_with(memory: &MemoryAppender, mut engine: Engine) -> Engine {
        engine.add_appender(Box::new(memory.clone()));
        engine
    }

    fn entry(level: LogLevel, message: &str) -> LogEntry {
        LogEntry::new(level, message)
    }

    #[test]
    fn test_sync_write() {
        let memory = MemoryAppender::new();
        let engine = engine_with(&memory, Engine::new());

        engine.write(entry(LogLevel::Info, "hello"));

        assert_eq!(memory.messages(), vec!["hello"]);
        assert_eq!(engine.metrics().total_logged(), 1);
        assert!(!engine.is_async());
    }

    #[test]
    fn test_enabled_follows_min_level() {
        let mut engine = Engine::new();
        engine.set_min_level(LogLevel::Warn);

        assert!(!engine.enabled(LogLevel::Debug));
        assert!(!engine.enabled(LogLevel::Info));
        assert!(engine.enabled(LogLevel::Warn));
        assert!(engine.enabled(LogLevel::Fatal));
    }

    #[test]
    fn test_async_flush_drains_queue() {
        let memory = MemoryAppender::new();
        let engine = engine_with(&memory, Engine::with_async(1000));

        for i in 0..100 {
            engine.write(entry(LogLevel::Info, &format!("m{}", i)));
        }
        engine.flush().unwrap();

        let messages = memory.messages();
        assert_eq!(messages.len(), 100);
        assert_eq!(messages[0], "m0");
        assert_eq!(messages[99], "m99");
    }

    #[test]
    fn test_escalating_record_comes_after_queued_records() {
        let memory = MemoryAppender::new();
        let engine = engine_with(&memory, Engine::with_async(1000));

        engine.write(entry(LogLevel::Info, "queued"));
        engine.write(entry(LogLevel::Fatal, "last words"));

        assert_eq!(memory.messages(), vec!["queued", "last words"]);
        assert_eq!(engine.metrics().escalations(), 1);
    }

    #[test]
    fn test_shutdown_then_write_falls_back_to_sync() {
        let memory = MemoryAppender::new();
        let engine = engine_with(&memory, Engine::with_async(10));

        engine.write(entry(LogLevel::Info, "before"));
        assert!(engine.shutdown(Duration::from_secs(5)));
        engine.write(entry(LogLevel::Info, "after"));

        assert_eq!(memory.messages(), vec!["before", "after"]);
    }

    #[test]
    fn test_overflow_callback() {
        let callback_count = Arc::new(AtomicU64::new(0));
        let callback_count_clone = Arc::clone(&callback_count);

        let engine = Engine::with_async_config(
            1,
            OverflowPolicy::AlertAndDrop,
            Some(Arc::new(move |_count| {
                callback_count_clone.fetch_add(1, Ordering::Relaxed);
            })),
        );

        for i in 0..100 {
            engine.write(entry(LogLevel::Debug, &format!("Message {}", i)));
        }
        engine.flush().unwrap();

        let metrics = engine.metrics();
        assert_eq!(metrics.total_logged() + metrics.dropped_count(), 100);
        if metrics.dropped_count() > 0 {
            assert!(callback_count.load(Ordering::Relaxed) >= 1);
        }
    }

    #[test]
    fn test_critical_records_are_never_dropped() {
        let memory = MemoryAppender::new();
        let engine = engine_with(
            &memory,
            Engine::with_async_config(1, OverflowPolicy::DropNewest, None),
        );

        for _ in 0..50 {
            engine.write(entry(LogLevel::Debug, "low priority"));
        }
        for _ in 0..10 {
            engine.write(entry(LogLevel::Error, "critical"));
        }
        engine.flush().unwrap();

        let critical = memory.messages().iter().filter(|m| *m == "critical").count();
        assert_eq!(critical, 10);
    }

    #[test]
    fn test_drop_oldest_keeps_newest() {
        let memory = MemoryAppender::new();
        let engine = engine_with(
            &memory,
            Engine::with_async_config(4, OverflowPolicy::DropOldest, None),
        );

        for i in 0..200 {
            engine.write(entry(LogLevel::Info, &format!("m{}", i)));
        }
        engine.flush().unwrap();

        let messages = memory.messages();
        assert_eq!(messages.last().map(String::as_str), Some("m199"));
        assert_eq!(
            engine.metrics().total_logged() + engine.metrics().dropped_count(),
            200
        );
    }

    #[test]
    fn test_block_policy_loses_nothing() {
        let memory = MemoryAppender::new();
        let engine = engine_with(
            &memory,
            Engine::with_async_config(2, OverflowPolicy::Block, None),
        );

        for i in 0..100 {
            engine.write(entry(LogLevel::Info, &format!("m{}", i)));
        }
        engine.flush().unwrap();

        assert_eq!(memory.len(), 100);
        assert_eq!(engine.metrics().dropped_count(), 0);
    }

    struct PanickingAppender;

    impl Appender for PanickingAppender {
        fn append(&mut self, _entry: &LogEntry) -> Result<()> {
            panic!("appender exploded");
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    struct FailingAppender;

    impl Appender for FailingAppender {
        fn append(&mut self, _entry: &LogEntry) -> Result<()> {
            Err(LoggerError::writer("sink closed"))
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_appender_failures_are_isolated() {
        let memory = MemoryAppender::new();
        let mut engine = Engine::new();
        engine.add_appender(Box::new(PanickingAppender));
        engine.add_appender(Box::new(FailingAppender));
        engine.add_appender(Box::new(memory.clone()));

        engine.write(entry(LogLevel::Info, "survives"));

        assert_eq!(memory.messages(), vec!["survives"]);
        assert_eq!(engine.metrics().dropped_count(), 1);
        assert_eq!(engine.appender_names(), vec!["panicking", "failing", "memory"]);
    }
}
