use std::sync::Arc;

use super::{descriptor::MetricDescriptor, sample::MetricSample};

mod staging;

pub use self::staging::StagingBuffer;

/// One complete set of samples, shared read-only between the buffer and
/// whoever scraped it.
pub type Generation = Arc<Vec<MetricSample>>;

/// Pull interface consumed by a scrape transport.
pub trait StableCollector: Send + Sync {
    /// Families this collector may emit. Called once at registration.
    fn describe(&self) -> &'static [&'static MetricDescriptor];

    /// Samples to report for a single scrape.
    fn collect(&self) -> Generation;
}
