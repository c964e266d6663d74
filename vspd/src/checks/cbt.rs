use super::Check;
use crate::{inventory::Inventory, prelude::*};

/// Flags clusters where changed block tracking (`ctkEnabled`) is set
/// differently across nodes. Nodes that don't report the setting are
/// ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct CbtMismatchCheck;

impl Check for CbtMismatchCheck {
    fn name(&self) -> &'static str {
        "cbt_mismatch"
    }

    fn run(&self, inventory: &Inventory) -> Result<Vec<MetricSample>, Error> {
        let (enabled, disabled) = inventory
            .nodes
            .iter()
            .filter_map(|node| node.ctk_enabled)
            .fold((0_usize, 0_usize), |(enabled, disabled), ctk| {
                if ctk {
                    (enabled + 1, disabled)
                } else {
                    (enabled, disabled + 1)
                }
            });
        if enabled + disabled == 0 {
            return Ok(vec![]);
        }
        let mismatch = enabled > 0 && disabled > 0;
        if mismatch {
            debug!(
                "ctkEnabled mismatch: {} nodes enabled, {} disabled",
                enabled, disabled
            );
        }
        Ok(vec![MetricSample::cbt_mismatch(mismatch, 1.0)])
    }
}
