use crate::{checks::Check, inventory::InventorySource, prelude::*};
use log::Level;
use std::fmt::Display;

const FAILURE_LOG_INTERVAL_MS: u64 = 60_000;

#[derive(Debug, PartialEq, Eq, Hash)]
struct CycleFailure(String);

impl Display for CycleFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "check cycle not finished: {}", self.0)
    }
}

/// Periodically runs all checks against a fresh inventory and stages their
/// samples in the shared buffer.
///
/// A cycle is closed only if the inventory was fetched and every check
/// succeeded. Otherwise the buffer keeps serving the last complete
/// generation until a later cycle finishes.
pub struct CheckRunner {
    buffer: Arc<StagingBuffer>,
    source: Arc<dyn InventorySource>,
    checks: Vec<Box<dyn Check>>,
    interval: Duration,
    failure_logger: IntervalLoggerSafe<CycleFailure>,
}

impl Debug for CheckRunner {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CheckRunner")
            .field("checks", &self.checks)
            .field("interval", &self.interval)
            .finish()
    }
}

impl CheckRunner {
    pub fn new(
        buffer: Arc<StagingBuffer>,
        source: Arc<dyn InventorySource>,
        checks: Vec<Box<dyn Check>>,
        interval: Duration,
    ) -> Self {
        Self {
            buffer,
            source,
            checks,
            interval,
            failure_logger: IntervalLoggerSafe::new(FAILURE_LOG_INTERVAL_MS, Level::Warn),
        }
    }

    /// Runs a single cycle.
    /// # Errors
    /// Returns error if the inventory couldn't be fetched or any check
    /// failed; the cycle is left open in that case.
    pub async fn run_cycle(&self) -> Result<(), Error> {
        self.buffer.begin_cycle();
        let inventory = self.source.fetch().await?;

        let mut failed = 0;
        for check in &self.checks {
            match check.run(&inventory) {
                Ok(samples) => {
                    trace!("check {} produced {} samples", check.name(), samples.len());
                    for sample in samples {
                        self.buffer.record_sample(sample);
                    }
                }
                Err(e) => {
                    debug!("check {} failed: {}", check.name(), e);
                    failed += 1;
                }
            }
        }

        if failed == 0 {
            self.buffer.end_cycle();
            Ok(())
        } else {
            Err(Error::cycle_incomplete(failed))
        }
    }

    /// Runs cycles forever with the configured period, first one right away.
    pub fn spawn(self) -> JoinHandle<()> {
        info!(
            "check runner started with {} checks, interval: {:?}",
            self.checks.len(),
            self.interval
        );
        tokio::spawn(async move {
            let mut interval = interval(self.interval);
            loop {
                interval.tick().await;
                match self.run_cycle().await {
                    Ok(()) => debug!("check cycle finished"),
                    Err(e) => {
                        self.failure_logger.report(CycleFailure(e.to_string()));
                    }
                }
            }
        })
    }
}
