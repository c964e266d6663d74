use super::descriptor::{MetricDescriptor, CBT_MISMATCH, ESXI_VERSION, HW_VERSION};

/// One observation, shaped after the family it belongs to.
///
/// Label values are kept in the order of [`MetricDescriptor::labels`] of the
/// matching descriptor, so a sample can't be built with a missing or extra
/// label.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricSample {
    EsxiVersion {
        version: String,
        api_version: String,
        value: f64,
    },
    HwVersion {
        hw_version: String,
        value: f64,
    },
    CbtMismatch {
        cbt_mismatch_flag: String,
        value: f64,
    },
}

impl MetricSample {
    pub fn esxi_version(version: impl Into<String>, api_version: impl Into<String>, value: f64) -> Self {
        Self::EsxiVersion {
            version: version.into(),
            api_version: api_version.into(),
            value,
        }
    }

    pub fn hw_version(hw_version: impl Into<String>, value: f64) -> Self {
        Self::HwVersion {
            hw_version: hw_version.into(),
            value,
        }
    }

    pub fn cbt_mismatch(mismatch: bool, value: f64) -> Self {
        Self::CbtMismatch {
            cbt_mismatch_flag: mismatch.to_string(),
            value,
        }
    }

    pub fn descriptor(&self) -> &'static MetricDescriptor {
        match self {
            Self::EsxiVersion { .. } => &ESXI_VERSION,
            Self::HwVersion { .. } => &HW_VERSION,
            Self::CbtMismatch { .. } => &CBT_MISMATCH,
        }
    }

    pub fn label_values(&self) -> Vec<&str> {
        match self {
            Self::EsxiVersion {
                version,
                api_version,
                ..
            } => vec![version.as_str(), api_version.as_str()],
            Self::HwVersion { hw_version, .. } => vec![hw_version.as_str()],
            Self::CbtMismatch {
                cbt_mismatch_flag, ..
            } => vec![cbt_mismatch_flag.as_str()],
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            Self::EsxiVersion { value, .. }
            | Self::HwVersion { value, .. }
            | Self::CbtMismatch { value, .. } => *value,
        }
    }
}
