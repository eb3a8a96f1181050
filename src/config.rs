//! Scheduling configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SchedulingError;
use crate::vm::PROCESSING_CAPACITY;

fn default_ccr() -> f64 {
    0.4
}

fn default_seed() -> u64 {
    123
}

fn default_fixed_seed() -> bool {
    true
}

fn default_capability() -> String {
    PROCESSING_CAPACITY.to_string()
}

/// Represents a scheduling configuration.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Communication-to-Computation Ratio, scales data transfer cost relative to task size.
    #[serde(default = "default_ccr")]
    pub ccr: f64,
    /// Seed for the synthetic dataset generator. The scheduler itself consults no RNG.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// When true, all generator invocations share [`seed`](Config::seed).
    #[serde(default = "default_fixed_seed")]
    pub fixed_seed: bool,
    /// Name of the VM capability used as the processing capacity.
    #[serde(default = "default_capability")]
    pub capability: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ccr: default_ccr(),
            seed: default_seed(),
            fixed_seed: default_fixed_seed(),
            capability: default_capability(),
        }
    }
}

impl Config {
    /// Reads configuration from YAML file.
    pub fn from_yaml<P: AsRef<Path>>(file: P) -> Result<Self, SchedulingError> {
        let data = std::fs::read_to_string(&file)
            .map_err(|e| SchedulingError::InvalidInput(format!("can't read file {}: {}", file.as_ref().display(), e)))?;
        serde_yaml::from_str(&data)
            .map_err(|e| SchedulingError::InvalidInput(format!("can't parse YAML from file {}: {}", file.as_ref().display(), e)))
    }
}
