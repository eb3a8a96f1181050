//! Error taxonomy.

use thiserror::Error;

/// Errors surfaced by the scheduler entry point and the dataset loaders.
///
/// Structural errors are fatal and nothing is partially scheduled. Numerical
/// degeneracies (zero capacity, missing bandwidth) are absorbed locally as
/// infinite execution or transfer times and only escalate to
/// [`InfeasibleSchedule`](SchedulingError::InfeasibleSchedule) when a critical
/// task cannot run anywhere.
#[derive(Debug, Error)]
pub enum SchedulingError {
    #[error("invalid DAG: {0}")]
    InvalidDag(String),
    #[error("VM pool is empty")]
    EmptyVmPool,
    #[error("infeasible schedule: {0}")]
    InfeasibleSchedule(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
