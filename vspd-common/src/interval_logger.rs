use coarsetime::{Duration as CDuration, Instant as CInstant};
use log::Level;
use std::{collections::HashMap, fmt::Display, hash::Hash, sync::Mutex};

/// Folds repeated reports of the same failure into one log line per
/// interval: `"<failure> [N times]"`.
#[derive(Debug)]
pub struct IntervalLogger<E> {
    reports: HashMap<E, u64>,
    interval: CDuration,
    last_flush: CInstant,
    level: Level,
}

impl<E: Hash + Eq + Display> IntervalLogger<E> {
    pub fn new(interval_ms: u64, level: Level) -> Self {
        let interval = CDuration::from_millis(interval_ms);
        Self {
            reports: HashMap::new(),
            interval,
            // first report is logged right away
            last_flush: CInstant::now() - interval - CDuration::from_millis(1),
            level,
        }
    }

    /// Counts `failure` and logs everything pending if the interval passed.
    /// Returns the number of distinct failures written to the log.
    pub fn report(&mut self, failure: E) -> usize {
        *self.reports.entry(failure).or_insert(0) += 1;
        if self.last_flush.elapsed() > self.interval {
            self.flush()
        } else {
            0
        }
    }

    /// Logs all pending failures regardless of the interval.
    pub fn flush(&mut self) -> usize {
        let mut written = 0;
        for (failure, count) in self.reports.iter_mut().filter(|(_, count)| **count > 0) {
            log!(self.level, "{} [{} times]", failure, count);
            *count = 0;
            written += 1;
        }
        self.last_flush = CInstant::now();
        written
    }

    pub fn pending(&self) -> u64 {
        self.reports.values().sum()
    }
}

/// [`IntervalLogger`] shareable between tasks.
#[derive(Debug)]
pub struct IntervalLoggerSafe<E> {
    inner: Mutex<IntervalLogger<E>>,
}

impl<E: Hash + Eq + Display> IntervalLoggerSafe<E> {
    pub fn new(interval_ms: u64, level: Level) -> Self {
        Self {
            inner: Mutex::new(IntervalLogger::new(interval_ms, level)),
        }
    }

    pub fn report(&self, failure: E) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .report(failure)
    }
}
