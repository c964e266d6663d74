/// Detector configuration.
pub mod detector;
mod reader;

pub use reader::{Validatable, YamlConfig};
