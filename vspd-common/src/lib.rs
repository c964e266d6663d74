pub mod configs;
pub mod error;
pub mod interval_logger;
pub mod metrics;

#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;
