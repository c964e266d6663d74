//! Bridge from the staging buffer to the `prometheus` text encoder.

use crate::prelude::*;
use prometheus::{
    core::{Collector, Desc},
    proto::{Gauge, LabelPair, Metric, MetricFamily, MetricType},
    Encoder, Registry, TextEncoder,
};
use std::collections::HashMap;
use vspd_common::metrics::StableCollector;

const BUFFER_CAP: usize = 16 * 1024;

/// Exposes a [`StableCollector`] as a scrape-time `prometheus` collector:
/// every gather reads one generation and turns it into gauge families.
pub struct StagedCollector {
    source: Arc<dyn StableCollector>,
    descs: Vec<Desc>,
}

impl Debug for StagedCollector {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("StagedCollector")
            .field("descs", &self.descs)
            .finish()
    }
}

impl StagedCollector {
    /// # Errors
    /// Returns error if a descriptor is not a valid prometheus family.
    pub fn new(source: Arc<dyn StableCollector>) -> Result<Self, Error> {
        let descs = source
            .describe()
            .iter()
            .map(|descriptor| {
                Desc::new(
                    descriptor.name().to_owned(),
                    help_text(descriptor),
                    descriptor.labels().iter().map(|l| (*l).to_owned()).collect(),
                    HashMap::new(),
                )
                .map_err(|e| Error::failed(format!("bad descriptor {}: {}", descriptor.name(), e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { source, descs })
    }
}

impl Collector for StagedCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.descs.iter().collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let generation = self.source.collect();
        self.source
            .describe()
            .iter()
            .map(|descriptor| {
                let mut family = MetricFamily::default();
                family.set_name(descriptor.name().to_owned());
                family.set_help(help_text(descriptor));
                family.set_field_type(MetricType::GAUGE);
                for sample in generation
                    .iter()
                    .filter(|s| std::ptr::eq(s.descriptor(), *descriptor))
                {
                    family.mut_metric().push(gauge(descriptor, sample));
                }
                family
            })
            .collect()
    }
}

/// Registry holding a single [`StagedCollector`] over `source`.
/// # Errors
/// Returns error if the collector can't be registered.
pub fn registry(source: Arc<dyn StableCollector>) -> Result<Registry, Error> {
    let registry = Registry::new();
    registry
        .register(Box::new(StagedCollector::new(source)?))
        .map_err(|e| Error::failed(format!("can't register staged collector: {}", e)))?;
    Ok(registry)
}

/// Gathers `registry` and encodes it in the text exposition format.
/// # Errors
/// Returns error if encoding fails.
pub fn render(registry: &Registry) -> Result<String, Error> {
    let families = registry.gather();
    let mut buffer = Vec::with_capacity(BUFFER_CAP);
    TextEncoder::new()
        .encode(&families, &mut buffer)
        .map_err(|e| Error::failed(format!("can't encode metrics: {}", e)))?;
    String::from_utf8(buffer).map_err(|e| Error::failed(format!("metrics are not utf-8: {}", e)))
}

pub fn content_type() -> String {
    TextEncoder::new().format_type().to_owned()
}

fn help_text(descriptor: &MetricDescriptor) -> String {
    format!("[{}] {}", descriptor.stability(), descriptor.help())
}

fn gauge(descriptor: &MetricDescriptor, sample: &MetricSample) -> Metric {
    let mut metric = Metric::default();
    for (name, value) in descriptor.labels().iter().zip(sample.label_values()) {
        let mut pair = LabelPair::default();
        pair.set_name((*name).to_owned());
        pair.set_value(value.to_owned());
        metric.mut_label().push(pair);
    }
    let mut gauge = Gauge::default();
    gauge.set_value(sample.value());
    metric.set_gauge(gauge);
    metric
}
