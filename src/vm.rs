//! Virtual machine model.

use indexmap::IndexMap;

/// Name of the capability holding the default VM processing capacity.
pub const PROCESSING_CAPACITY: &str = "processingCapacity";

/// Represents a virtual machine that can execute workflow tasks.
///
/// A VM carries a set of named numeric capabilities; which one is consulted as
/// the processing capacity is selected by [`Config::capability`](crate::config::Config).
/// VMs are identified by their index in the pool, the same index is used by the
/// [bandwidth matrix](crate::network::Network).
#[derive(Clone, Debug)]
pub struct Vm {
    pub name: String,
    capabilities: IndexMap<String, f64>,
}

impl Vm {
    /// Creates new VM with the given processing capacity.
    pub fn new(name: &str, processing_capacity: f64) -> Self {
        let mut capabilities = IndexMap::new();
        capabilities.insert(PROCESSING_CAPACITY.to_string(), processing_capacity);
        Self {
            name: name.to_string(),
            capabilities,
        }
    }

    /// Adds or replaces a named capability.
    pub fn with_capability(mut self, name: &str, value: f64) -> Self {
        self.capabilities.insert(name.to_string(), value);
        self
    }

    /// Returns the value of a named capability, if present.
    pub fn capability(&self, name: &str) -> Option<f64> {
        self.capabilities.get(name).copied()
    }
}
