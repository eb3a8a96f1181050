//! Cloud environment.

use log::warn;

use crate::network::Network;
use crate::vm::Vm;

/// Describes an environment as a VM pool and the bandwidths between VMs.
#[derive(Clone, Copy)]
pub struct System<'a> {
    pub vms: &'a [Vm],
    pub network: &'a Network,
}

impl System<'_> {
    /// Resolves the processing capacity of every VM through the named capability.
    ///
    /// A VM without the capability gets capacity 0 (its execution times become
    /// infinite and the matcher de-preferences it).
    pub fn capacities(&self, capability: &str) -> Vec<f64> {
        self.vms
            .iter()
            .map(|vm| match vm.capability(capability) {
                Some(value) => value,
                None => {
                    warn!("VM {} has no capability {}, treating as unschedulable", vm.name, capability);
                    0.
                }
            })
            .collect()
    }

    /// Returns the id of the fastest VM (ties resolved towards the smallest id).
    pub fn fastest_vm(&self, capacities: &[f64]) -> usize {
        let mut best = 0;
        for (id, &capacity) in capacities.iter().enumerate() {
            if capacity > capacities[best] {
                best = id;
            }
        }
        best
    }
}
