use serde::Deserialize;
use std::{fs::read_to_string, path::Path};

use crate::error::Error;

pub trait Validatable {
    fn validate(&self) -> Result<(), String>;
}

pub struct YamlConfig {}

impl YamlConfig {
    pub fn read(filename: impl AsRef<Path>) -> Result<String, Error> {
        read_to_string(filename.as_ref()).map_err(|e| {
            debug!("error on file opening: {}", e);
            Error::config(format!(
                "error on file opening {}: {}",
                filename.as_ref().display(),
                e
            ))
        })
    }

    pub fn parse<T>(config: &str) -> Result<T, Error>
    where
        T: for<'de> Deserialize<'de>,
    {
        serde_yaml::from_str(config).map_err(|e| {
            debug!("error on yaml parsing: {}", e);
            Error::config(format!("error on yaml parsing: {}", e))
        })
    }

    pub fn get<T>(filename: impl AsRef<Path>) -> Result<T, Error>
    where
        T: for<'de> Deserialize<'de> + Validatable,
    {
        let file = Self::read(filename)?;
        let config: T = Self::parse(&file)?;
        config.validate().map_err(|e| {
            debug!("config is not valid: {}", e);
            Error::config(format!("config is not valid: {}", e))
        })?;
        Ok(config)
    }
}
