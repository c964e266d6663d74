use crate::prelude::*;
use std::path::PathBuf;

/// Snapshot of the vSphere objects the checks look at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub hosts: Vec<Host>,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

/// ESXi host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Host {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Cluster node backed by a vSphere VM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    #[serde(default)]
    pub hw_version: Option<String>,
    #[serde(default)]
    pub ctk_enabled: Option<bool>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventorySource: Send + Sync {
    async fn fetch(&self) -> Result<Inventory, Error>;
}

/// Reads the inventory from a YAML file on every fetch, so the file can be
/// replaced while the detector runs.
#[derive(Debug, Clone)]
pub struct FileInventory {
    path: PathBuf,
}

impl FileInventory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn parse(content: &str) -> Result<Inventory, Error> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::inventory(format!("error on yaml parsing: {}", e)))
    }
}

#[async_trait]
impl InventorySource for FileInventory {
    async fn fetch(&self) -> Result<Inventory, Error> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            Error::inventory(format!("can't read {}: {}", self.path.display(), e))
        })?;
        let inventory = Self::parse(&content)?;
        trace!(
            "inventory fetched: {} hosts, {} nodes",
            inventory.hosts.len(),
            inventory.nodes.len()
        );
        Ok(inventory)
    }
}
