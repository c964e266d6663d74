use std::{
    mem,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use super::{Generation, StableCollector};
use crate::metrics::{
    descriptor::{MetricDescriptor, DESCRIPTORS},
    sample::MetricSample,
};

#[derive(Debug, Default)]
struct Generations {
    current: Generation,
    stale: Generation,
    report_stale: bool,
}

impl Generations {
    fn served(&self) -> &Generation {
        if self.report_stale {
            &self.stale
        } else {
            &self.current
        }
    }
}

/// Holds samples of the check cycle in flight next to the last completed
/// one, so a scrape never sees families disappear just because a new cycle
/// has started.
///
/// Generations are handed over between `current` and `stale` without
/// copying. Recording into a generation that is still shared (with `stale`
/// or with a scrape in progress) clones it first, so anything returned by
/// [`StagingBuffer::collect`] never changes afterwards.
///
/// Cycle discipline is the caller's contract: [`StagingBuffer::end_cycle`]
/// without a preceding [`StagingBuffer::begin_cycle`], or samples recorded
/// after `end_cycle`, are accepted and simply land in the served generation.
#[derive(Debug, Default)]
pub struct StagingBuffer {
    inner: RwLock<Generations>,
}

impl StagingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `sample` to the generation being built.
    pub fn record_sample(&self, sample: MetricSample) {
        let mut inner = self.write();
        Arc::make_mut(&mut inner.current).push(sample);
    }

    /// Starts a new cycle. The last completed generation keeps being served
    /// until [`StagingBuffer::end_cycle`]. If the previous cycle never
    /// finished, its partial samples are dropped and the generation served
    /// before it stays in place.
    pub fn begin_cycle(&self) {
        let mut inner = self.write();
        if inner.report_stale {
            debug!("previous check cycle did not finish, keep reporting stale metrics");
            inner.current = Generation::default();
        } else {
            inner.stale = mem::take(&mut inner.current);
            inner.report_stale = true;
        }
    }

    /// Marks the generation being built as complete and starts serving it.
    pub fn end_cycle(&self) {
        let mut inner = self.write();
        inner.stale = inner.current.clone();
        inner.report_stale = false;
    }

    /// Snapshot of the generation currently authoritative for scraping.
    pub fn collect(&self) -> Generation {
        self.read().served().clone()
    }

    /// Whether the stale generation is served, together with the served
    /// generation, read under one lock.
    pub fn snapshot(&self) -> (bool, Generation) {
        let inner = self.read();
        (inner.report_stale, inner.served().clone())
    }

    pub fn describe(&self) -> &'static [&'static MetricDescriptor] {
        &DESCRIPTORS
    }

    pub fn is_reporting_stale(&self) -> bool {
        self.read().report_stale
    }

    // Every write leaves `Generations` consistent, so a panic in another
    // thread holding the lock doesn't invalidate the data.
    fn read(&self) -> RwLockReadGuard<'_, Generations> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Generations> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StableCollector for StagingBuffer {
    fn describe(&self) -> &'static [&'static MetricDescriptor] {
        StagingBuffer::describe(self)
    }

    fn collect(&self) -> Generation {
        StagingBuffer::collect(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::descriptor::{CBT_MISMATCH, ESXI_VERSION, HW_VERSION};
    use std::thread;

    fn sample(n: u32) -> MetricSample {
        MetricSample::hw_version(format!("vmx-{}", n), 1.0)
    }

    fn collected(buffer: &StagingBuffer) -> Vec<MetricSample> {
        buffer.collect().as_ref().clone()
    }

    #[test]
    fn test_empty_buffer_collects_nothing() {
        let buffer = StagingBuffer::new();
        assert!(buffer.collect().is_empty());
        assert!(!buffer.is_reporting_stale());
    }

    #[test]
    fn test_record_without_cycle_is_served() {
        let buffer = StagingBuffer::new();
        buffer.record_sample(sample(1));
        assert_eq!(collected(&buffer), vec![sample(1)]);
    }

    #[test]
    fn test_unfinished_cycle_restart_keeps_previous_generation() {
        let buffer = StagingBuffer::new();
        buffer.begin_cycle();
        buffer.record_sample(sample(1));
        buffer.begin_cycle();
        assert!(buffer.collect().is_empty());
        assert!(buffer.is_reporting_stale());
    }

    #[test]
    fn test_second_cycle_replaces_first() {
        let buffer = StagingBuffer::new();
        buffer.record_sample(sample(1));
        buffer.end_cycle();
        buffer.begin_cycle();
        buffer.record_sample(sample(2));
        buffer.end_cycle();
        assert_eq!(collected(&buffer), vec![sample(2)]);
    }

    #[test]
    fn test_stacked_begin_cycle_does_not_change_scrape() {
        let buffer = StagingBuffer::new();
        buffer.begin_cycle();
        buffer.record_sample(sample(1));
        buffer.record_sample(sample(2));
        buffer.end_cycle();

        buffer.begin_cycle();
        let after_first = collected(&buffer);
        buffer.record_sample(sample(3));
        buffer.begin_cycle();
        assert_eq!(collected(&buffer), after_first);
        assert_eq!(after_first, vec![sample(1), sample(2)]);
    }

    #[test]
    fn test_fresh_generation_keeps_order_and_drops_stale() {
        let buffer = StagingBuffer::new();
        buffer.record_sample(sample(9));
        buffer.end_cycle();

        buffer.begin_cycle();
        buffer.record_sample(sample(1));
        buffer.record_sample(sample(2));
        buffer.end_cycle();
        assert_eq!(collected(&buffer), vec![sample(1), sample(2)]);
    }

    #[test]
    fn test_no_gap_while_cycle_in_progress() {
        let buffer = StagingBuffer::new();
        buffer.begin_cycle();
        buffer.record_sample(sample(1));
        buffer.end_cycle();

        for cycle in 2..6 {
            buffer.begin_cycle();
            assert!(!buffer.collect().is_empty());
            buffer.record_sample(sample(cycle));
            assert!(!buffer.collect().is_empty());
            buffer.end_cycle();
            assert_eq!(collected(&buffer), vec![sample(cycle)]);
        }
    }

    #[test]
    fn test_end_cycle_without_begin() {
        let buffer = StagingBuffer::new();
        buffer.end_cycle();
        assert!(buffer.collect().is_empty());
        buffer.record_sample(sample(1));
        buffer.end_cycle();
        assert_eq!(collected(&buffer), vec![sample(1)]);
    }

    #[test]
    fn test_late_samples_join_served_generation() {
        let buffer = StagingBuffer::new();
        buffer.begin_cycle();
        buffer.record_sample(sample(1));
        buffer.end_cycle();
        buffer.record_sample(sample(2));
        assert_eq!(collected(&buffer), vec![sample(1), sample(2)]);
    }

    #[test]
    fn test_collected_generation_is_not_mutated_later() {
        let buffer = StagingBuffer::new();
        buffer.record_sample(sample(1));
        let scraped = buffer.collect();
        buffer.record_sample(sample(2));
        assert_eq!(scraped.as_ref(), &vec![sample(1)]);

        buffer.end_cycle();
        let scraped = buffer.collect();
        buffer.begin_cycle();
        buffer.record_sample(sample(3));
        assert_eq!(scraped.as_ref(), &vec![sample(1), sample(2)]);
    }

    #[test]
    fn test_describe_is_state_independent() {
        let buffer = StagingBuffer::new();
        let expected = [&ESXI_VERSION, &HW_VERSION, &CBT_MISMATCH];
        assert_eq!(buffer.describe(), &expected);
        buffer.begin_cycle();
        buffer.record_sample(sample(1));
        assert_eq!(buffer.describe(), &expected);
        buffer.end_cycle();
        assert_eq!(StableCollector::describe(&buffer), &expected);
    }

    #[test]
    fn test_concurrent_collect_never_sees_torn_generation() {
        const SAMPLES: u32 = 2_000;
        let buffer = Arc::new(StagingBuffer::new());

        let writer = {
            let buffer = buffer.clone();
            thread::spawn(move || {
                for n in 0..SAMPLES {
                    buffer.record_sample(sample(n));
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let buffer = buffer.clone();
                thread::spawn(move || {
                    let mut last_len = 0;
                    for _ in 0..500 {
                        let generation = buffer.collect();
                        assert!(generation.len() >= last_len);
                        for (n, s) in generation.iter().enumerate() {
                            assert_eq!(s, &sample(n as u32));
                        }
                        last_len = generation.len();
                    }
                })
            })
            .collect();

        writer.join().expect("writer thread");
        for reader in readers {
            reader.join().expect("reader thread");
        }
        assert_eq!(buffer.collect().len(), SAMPLES as usize);
    }

    #[test]
    fn test_concurrent_cycles_serve_whole_generations() {
        const CYCLES: u32 = 300;
        const PER_CYCLE: usize = 8;

        fn cycle_sample(cycle: u32, n: usize) -> MetricSample {
            MetricSample::esxi_version(format!("cycle-{}", cycle), n.to_string(), 1.0)
        }

        fn cycle_of(sample: &MetricSample) -> String {
            sample.label_values()[0].to_owned()
        }

        let buffer = Arc::new(StagingBuffer::new());
        buffer.begin_cycle();
        for n in 0..PER_CYCLE {
            buffer.record_sample(cycle_sample(0, n));
        }
        buffer.end_cycle();

        let writer = {
            let buffer = buffer.clone();
            thread::spawn(move || {
                for cycle in 1..=CYCLES {
                    buffer.begin_cycle();
                    for n in 0..PER_CYCLE {
                        buffer.record_sample(cycle_sample(cycle, n));
                    }
                    buffer.end_cycle();
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let buffer = buffer.clone();
                thread::spawn(move || {
                    for _ in 0..1_000 {
                        let generation = buffer.collect();
                        assert_eq!(generation.len(), PER_CYCLE);
                        let cycle = cycle_of(&generation[0]);
                        for (n, s) in generation.iter().enumerate() {
                            assert_eq!(cycle_of(s), cycle);
                            assert_eq!(s.label_values()[1], n.to_string());
                        }

                        let (_, generation) = buffer.snapshot();
                        assert_eq!(generation.len(), PER_CYCLE);
                    }
                })
            })
            .collect();

        writer.join().expect("writer thread");
        for reader in readers {
            reader.join().expect("reader thread");
        }
        let (reporting_stale, generation) = buffer.snapshot();
        assert!(!reporting_stale);
        assert_eq!(cycle_of(&generation[0]), format!("cycle-{}", CYCLES));
    }

    #[test]
    fn test_snapshot_pairs_flag_with_served_generation() {
        let buffer = StagingBuffer::new();
        buffer.record_sample(sample(1));
        buffer.end_cycle();
        buffer.begin_cycle();
        buffer.record_sample(sample(2));

        let (reporting_stale, generation) = buffer.snapshot();
        assert!(reporting_stale);
        assert_eq!(generation.as_ref(), &vec![sample(1)]);

        buffer.end_cycle();
        let (reporting_stale, generation) = buffer.snapshot();
        assert!(!reporting_stale);
        assert_eq!(generation.as_ref(), &vec![sample(2)]);
    }
}
