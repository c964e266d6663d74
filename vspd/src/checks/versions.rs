use super::{count_ordered, Check};
use crate::{inventory::Inventory, prelude::*};

/// Reports how many ESXi hosts run each (version, api_version) pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct EsxiVersionCheck;

impl Check for EsxiVersionCheck {
    fn name(&self) -> &'static str {
        "esxi_version"
    }

    fn run(&self, inventory: &Inventory) -> Result<Vec<MetricSample>, Error> {
        let versions = inventory
            .hosts
            .iter()
            .map(|host| match (&host.version, &host.api_version) {
                (Some(version), Some(api_version)) => Ok((version.as_str(), api_version.as_str())),
                _ => Err(Error::check_failed(
                    self.name(),
                    format!("host {} reports no version", host.name),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(count_ordered(versions)
            .into_iter()
            .map(|((version, api_version), count)| {
                MetricSample::esxi_version(version, api_version, count as f64)
            })
            .collect())
    }
}

/// Reports how many nodes run each virtual hardware version.
#[derive(Debug, Clone, Copy, Default)]
pub struct HwVersionCheck;

impl Check for HwVersionCheck {
    fn name(&self) -> &'static str {
        "hw_version"
    }

    fn run(&self, inventory: &Inventory) -> Result<Vec<MetricSample>, Error> {
        let versions = inventory
            .nodes
            .iter()
            .map(|node| {
                node.hw_version.as_deref().ok_or_else(|| {
                    Error::check_failed(
                        self.name(),
                        format!("node {} reports no hw version", node.name),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(count_ordered(versions)
            .into_iter()
            .map(|(hw_version, count)| MetricSample::hw_version(hw_version, count as f64))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{Host, Node};

    fn host(name: &str, version: Option<&str>) -> Host {
        Host {
            name: name.to_owned(),
            version: version.map(str::to_owned),
            api_version: version.map(|v| format!("{}.0", v)),
        }
    }

    fn node(name: &str, hw_version: Option<&str>) -> Node {
        Node {
            name: name.to_owned(),
            hw_version: hw_version.map(str::to_owned),
            ctk_enabled: None,
        }
    }

    #[test]
    fn test_esxi_versions_are_counted() {
        let inventory = Inventory {
            hosts: vec![
                host("h1", Some("7.0.3")),
                host("h2", Some("6.7.0")),
                host("h3", Some("7.0.3")),
            ],
            nodes: vec![],
        };
        let samples = EsxiVersionCheck.run(&inventory).unwrap();
        assert_eq!(
            samples,
            vec![
                MetricSample::esxi_version("7.0.3", "7.0.3.0", 2.0),
                MetricSample::esxi_version("6.7.0", "6.7.0.0", 1.0),
            ]
        );
    }

    #[test]
    fn test_esxi_host_without_version_fails() {
        let inventory = Inventory {
            hosts: vec![host("h1", Some("7.0.3")), host("h2", None)],
            nodes: vec![],
        };
        let err = EsxiVersionCheck.run(&inventory).unwrap_err();
        assert!(err.is_check_failed());
    }

    #[test]
    fn test_hw_versions_are_counted() {
        let inventory = Inventory {
            hosts: vec![],
            nodes: vec![
                node("n1", Some("vmx-15")),
                node("n2", Some("vmx-15")),
                node("n3", Some("vmx-13")),
            ],
        };
        let samples = HwVersionCheck.run(&inventory).unwrap();
        assert_eq!(
            samples,
            vec![
                MetricSample::hw_version("vmx-15", 2.0),
                MetricSample::hw_version("vmx-13", 1.0),
            ]
        );
    }

    #[test]
    fn test_hw_version_missing_fails() {
        let inventory = Inventory {
            hosts: vec![],
            nodes: vec![node("n1", None)],
        };
        assert!(HwVersionCheck.run(&inventory).is_err());
    }

    #[test]
    fn test_empty_inventory_reports_nothing() {
        let inventory = Inventory::default();
        assert!(EsxiVersionCheck.run(&inventory).unwrap().is_empty());
        assert!(HwVersionCheck.run(&inventory).unwrap().is_empty());
    }
}
