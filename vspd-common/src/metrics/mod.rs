//! Metric families reported by the detector and the staging buffer that
//! holds their samples between check cycles.

pub mod collector;
pub mod descriptor;
pub mod sample;

pub use collector::{Generation, StableCollector, StagingBuffer};
pub use descriptor::{
    MetricDescriptor, StabilityLevel, CBT_MISMATCH, DESCRIPTORS, ESXI_VERSION, HW_VERSION,
};
pub use sample::MetricSample;
