use super::reader::Validatable;
use humantime::Duration as HumanDuration;
use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
use std::{
    net::{IpAddr, Ipv4Addr},
    time::Duration,
};

const MIN_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Settings of the detector daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detector {
    #[serde(default = "Detector::default_log_config")]
    log_config: String,
    #[serde(
        default = "Detector::default_check_interval",
        deserialize_with = "deserialize_interval",
        serialize_with = "serialize_interval"
    )]
    check_interval: Duration,
    #[serde(default = "Detector::default_http_api_address")]
    http_api_address: IpAddr,
    #[serde(default = "Detector::default_http_api_port")]
    http_api_port: u16,
    inventory: String,
}

impl Detector {
    fn default_log_config() -> String {
        "logger.yaml".to_owned()
    }

    fn default_check_interval() -> Duration {
        Duration::from_secs(60)
    }

    fn default_http_api_address() -> IpAddr {
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    }

    fn default_http_api_port() -> u16 {
        8444
    }

    pub fn log_config(&self) -> &str {
        &self.log_config
    }

    /// Period between two check cycles, parsed from humantime format.
    pub fn check_interval(&self) -> Duration {
        self.check_interval
    }

    pub fn http_api_address(&self) -> IpAddr {
        self.http_api_address
    }

    pub fn http_api_port(&self) -> u16 {
        self.http_api_port
    }

    pub fn inventory(&self) -> &str {
        &self.inventory
    }
}

impl Validatable for Detector {
    fn validate(&self) -> Result<(), String> {
        if self.log_config.is_empty() {
            let msg = "field 'log_config' for 'detector config' is empty".to_string();
            error!("{}", msg);
            return Err(msg);
        }

        if self.check_interval < MIN_CHECK_INTERVAL {
            let msg = format!(
                "field 'check_interval' for 'detector config' is less than {:?}",
                MIN_CHECK_INTERVAL
            );
            error!("{}", msg);
            return Err(msg);
        }

        if self.http_api_port == 0 {
            let msg = "field 'http_api_port' for 'detector config' is zero".to_string();
            error!("{}", msg);
            return Err(msg);
        }

        if self.inventory.is_empty() {
            let msg = "field 'inventory' for 'detector config' is empty".to_string();
            error!("{}", msg);
            Err(msg)
        } else {
            Ok(())
        }
    }
}

fn deserialize_interval<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    s.parse::<HumanDuration>().map(Into::into).map_err(|e| {
        D::Error::custom(format!(
            "field 'check_interval' for 'detector config' is not valid: {}",
            e
        ))
    })
}

fn serialize_interval<S>(interval: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&humantime::format_duration(*interval).to_string())
}
