use std::fmt::{Display, Formatter, Result as FmtResult};

pub const VERSION_LABEL: &str = "version";
pub const API_VERSION_LABEL: &str = "api_version";
pub const HW_VERSION_LABEL: &str = "hw_version";
pub const CBT_MISMATCH_LABEL: &str = "cbt_mismatch_flag";

/// Stability guarantee of a metric family, shown to scrape consumers
/// as a prefix of the help text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StabilityLevel {
    Alpha,
    Stable,
}

impl Display for StabilityLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Alpha => f.write_str("ALPHA"),
            Self::Stable => f.write_str("STABLE"),
        }
    }
}

/// Static identity of a metric family.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct MetricDescriptor {
    name: &'static str,
    help: &'static str,
    labels: &'static [&'static str],
    stability: StabilityLevel,
}

impl MetricDescriptor {
    const fn new(
        name: &'static str,
        help: &'static str,
        labels: &'static [&'static str],
        stability: StabilityLevel,
    ) -> Self {
        Self {
            name,
            help,
            labels,
            stability,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn help(&self) -> &'static str {
        self.help
    }

    /// Label names, in the order sample label values are reported.
    pub fn labels(&self) -> &'static [&'static str] {
        self.labels
    }

    pub fn stability(&self) -> StabilityLevel {
        self.stability
    }
}

/// Number of ESXi hosts per (version, api_version)
pub static ESXI_VERSION: MetricDescriptor = MetricDescriptor::new(
    "vsphere_esxi_version_total",
    "Number of ESXi hosts with given version.",
    &[VERSION_LABEL, API_VERSION_LABEL],
    StabilityLevel::Alpha,
);

/// Number of cluster nodes per virtual hardware version
pub static HW_VERSION: MetricDescriptor = MetricDescriptor::new(
    "vsphere_node_hw_version_total",
    "Number of vSphere nodes with given HW version.",
    &[HW_VERSION_LABEL],
    StabilityLevel::Alpha,
);

/// Whether changed block tracking is configured the same way on every node
pub static CBT_MISMATCH: MetricDescriptor = MetricDescriptor::new(
    "vsphere_vm_cbt_checks",
    "Boolean metric based on whether ctkEnabled is consistent or not across all nodes in the cluster.",
    &[CBT_MISMATCH_LABEL],
    StabilityLevel::Alpha,
);

/// Every family the staging buffer can emit, in registration order.
pub static DESCRIPTORS: [&MetricDescriptor; 3] = [&ESXI_VERSION, &HW_VERSION, &CBT_MISMATCH];
