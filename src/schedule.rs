//! Produced schedule.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SchedulingError;

/// Duplicated copy of an entry task placed into an idle slot on some VM.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DuplicateTask {
    pub task: usize,
    pub start: f64,
    pub finish: f64,
}

/// Complete output of the scheduler: primary assignment, duplicated copies,
/// per-task times, the critical path and the makespan.
///
/// Task and VM ids index the DAG task vector and the VM pool the schedule was
/// produced for. The makespan is the latest finish time over primary copies;
/// duplicates never extend it since they must not delay any scheduled task.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Schedule {
    /// Primary task ids per VM, in acceptance order.
    pub assignment: Vec<Vec<usize>>,
    /// Duplicated entry tasks per VM, ordered by start time.
    pub duplicates: Vec<Vec<DuplicateTask>>,
    /// Actual start time of every task's primary copy.
    pub start_times: Vec<f64>,
    /// Actual finish time of every task's primary copy.
    pub finish_times: Vec<f64>,
    pub critical_path: BTreeSet<usize>,
    pub makespan: f64,
}

impl Schedule {
    /// Returns the VM hosting the primary copy of every task.
    pub fn task_locations(&self) -> Vec<Option<usize>> {
        let mut locations = vec![None; self.start_times.len()];
        for (vm, tasks) in self.assignment.iter().enumerate() {
            for &t in tasks.iter() {
                locations[t] = Some(vm);
            }
        }
        locations
    }

    /// Saves the schedule as pretty-printed JSON.
    pub fn save_to_file<P: AsRef<Path>>(&self, file: P) -> Result<(), SchedulingError> {
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| SchedulingError::InvalidInput(format!("can't serialize schedule: {}", e)))?;
        std::fs::write(&file, data)
            .map_err(|e| SchedulingError::InvalidInput(format!("can't write file {}: {}", file.as_ref().display(), e)))
    }

    /// Loads a schedule saved with [`save_to_file`](Schedule::save_to_file).
    pub fn load_from_file<P: AsRef<Path>>(file: P) -> Result<Self, SchedulingError> {
        let data = std::fs::read_to_string(&file)
            .map_err(|e| SchedulingError::InvalidInput(format!("can't read file {}: {}", file.as_ref().display(), e)))?;
        serde_json::from_str(&data)
            .map_err(|e| SchedulingError::InvalidInput(format!("can't parse schedule from file {}: {}", file.as_ref().display(), e)))
    }
}
