use std::net::IpAddr;

use crate::{
    api::exposition, checks::Check, inventory::InventorySource, prelude::*, runner::CheckRunner,
};
use prometheus::Registry;

/// Shared handle to the staging buffer and its scrape registry.
#[derive(Clone)]
pub struct Server {
    buffer: Arc<StagingBuffer>,
    registry: Registry,
}

impl Debug for Server {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Server").field("buffer", &self.buffer).finish()
    }
}

impl Server {
    /// Creates a server scraping `buffer` through its own registry.
    /// # Errors
    /// Returns error if the buffer's families can't be registered.
    pub fn new(buffer: Arc<StagingBuffer>) -> Result<Self, Error> {
        let registry = exposition::registry(buffer.clone())?;
        Ok(Self { buffer, registry })
    }

    pub(crate) fn buffer(&self) -> &StagingBuffer {
        self.buffer.as_ref()
    }

    pub(crate) fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Starts the HTTP scrape endpoint.
    /// # Errors
    /// Returns error if the address can't be bound.
    pub fn run_api_server(&self, address: IpAddr, port: u16) -> Result<(), Error> {
        crate::api::spawn(self.clone(), address, port)
    }

    /// Spawns the periodic check cycles, feeding the buffer this server
    /// scrapes.
    pub fn run_periodic_tasks(
        &self,
        source: Arc<dyn InventorySource>,
        checks: Vec<Box<dyn Check>>,
        interval: Duration,
    ) -> JoinHandle<()> {
        CheckRunner::new(self.buffer.clone(), source, checks, interval).spawn()
    }
}
