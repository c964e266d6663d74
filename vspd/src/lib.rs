#![warn(missing_debug_implementations)]

//! Library requires tokio runtime.

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate async_trait;

pub mod api;
pub mod checks;
pub mod inventory;
pub mod runner;
pub mod server;

pub use crate::{
    checks::{default_checks, CbtMismatchCheck, Check, EsxiVersionCheck, HwVersionCheck},
    inventory::{FileInventory, Inventory, InventorySource},
    runner::CheckRunner,
    server::Server as DetectorServer,
};
pub use vspd_common::{
    configs::{detector::Detector as DetectorConfig, YamlConfig},
    metrics::{StableCollector, StagingBuffer},
};

mod prelude {
    pub use std::{
        fmt::{Debug, Formatter, Result as FmtResult},
        sync::Arc,
        time::Duration,
    };
    pub use tokio::{task::JoinHandle, time::interval};
    pub use vspd_common::{
        error::Error,
        interval_logger::IntervalLoggerSafe,
        metrics::{Generation, MetricDescriptor, MetricSample, StagingBuffer},
    };
}
