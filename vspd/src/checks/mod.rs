//! Checks turning an inventory snapshot into metric samples.

use crate::{inventory::Inventory, prelude::*};

mod cbt;
mod versions;

pub use self::{
    cbt::CbtMismatchCheck,
    versions::{EsxiVersionCheck, HwVersionCheck},
};

pub trait Check: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    /// Computes this check's samples. Any error marks the whole cycle as
    /// incomplete.
    fn run(&self, inventory: &Inventory) -> Result<Vec<MetricSample>, Error>;
}

/// Every check the detector ships with.
pub fn default_checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(EsxiVersionCheck),
        Box::new(HwVersionCheck),
        Box::new(CbtMismatchCheck),
    ]
}

/// Counts occurrences of each key, keeping first-seen order.
fn count_ordered<K: PartialEq>(keys: impl IntoIterator<Item = K>) -> Vec<(K, u64)> {
    let mut counts: Vec<(K, u64)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += 1,
            None => counts.push((key, 1)),
        }
    }
    counts
}
