//! Execution, transfer and schedule time computation.

use std::cmp::Ordering;

use crate::dag::DAG;
use crate::network::Network;
use crate::schedule::DuplicateTask;

/// Comparison tolerance for schedule times.
pub const EPSILON: f64 = 1e-9;

/// Execution time of a task on a VM.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ExecTime {
    Finite(f64),
    Infeasible,
}

impl ExecTime {
    /// `size / capacity`, infeasible on a non-positive size or capacity.
    pub fn of(size: f64, capacity: f64) -> Self {
        if size <= 0. || capacity <= 0. {
            ExecTime::Infeasible
        } else {
            ExecTime::Finite(size / capacity)
        }
    }

    /// Collapses to a plain value, mapping `Infeasible` to `+inf` so that it
    /// sorts after every finite time.
    pub fn or_inf(self) -> f64 {
        match self {
            ExecTime::Finite(t) => t,
            ExecTime::Infeasible => f64::INFINITY,
        }
    }

    pub fn is_finite(self) -> bool {
        matches!(self, ExecTime::Finite(_))
    }
}

/// Time to move the output of a task of the given size between two VMs.
pub fn transfer_time(size: f64, ccr: f64, network: &Network, from: usize, to: usize) -> f64 {
    if from == to {
        return 0.;
    }
    let bandwidth = network.bandwidth(from, to);
    if bandwidth <= 0. {
        return f64::INFINITY;
    }
    size * ccr / bandwidth
}

/// An occupied interval on a VM timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledTask {
    pub start_time: f64,
    pub finish_time: f64,
    pub task: usize,
}

impl ScheduledTask {
    pub fn new(start_time: f64, finish_time: f64, task: usize) -> ScheduledTask {
        ScheduledTask {
            start_time,
            finish_time,
            task,
        }
    }
}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(
            self.start_time
                .total_cmp(&other.start_time)
                .then(self.finish_time.total_cmp(&other.finish_time))
                .then(self.task.cmp(&other.task)),
        )
    }
}

impl Ord for ScheduledTask {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap()
    }
}

impl Eq for ScheduledTask {}

/// Arrival time of the output of predecessor `pred` at VM `vm`.
///
/// The primary copy pays the cross-VM transfer; a duplicate hosted on `vm`
/// makes the data available locally at its own finish time, whichever is
/// earlier wins.
fn arrival_time(
    dag: &DAG,
    pred: usize,
    vm: usize,
    task_vm: &[usize],
    network: &Network,
    ccr: f64,
    duplicates: &[Vec<DuplicateTask>],
    finish: &[f64],
) -> f64 {
    let primary = finish[pred] + transfer_time(dag.get_task(pred).size, ccr, network, task_vm[pred], vm);
    match duplicates[vm].iter().find(|d| d.task == pred) {
        Some(dup) => primary.min(dup.finish),
        None => primary,
    }
}

/// Computes start and finish times for tasks newly appended to the waiting
/// lists, continuing from the current per-VM free times.
///
/// `from` holds the per-VM waiting list length before the current level was
/// matched. Newly appended tasks belong to one level, so they only depend on
/// tasks that already have finish times.
#[allow(clippy::too_many_arguments)]
pub fn schedule_new_tasks(
    dag: &DAG,
    waiting: &[Vec<usize>],
    from: &[usize],
    task_vm: &[usize],
    capacities: &[f64],
    network: &Network,
    ccr: f64,
    start: &mut [f64],
    finish: &mut [f64],
    free_time: &mut [f64],
) {
    let no_duplicates = vec![Vec::new(); capacities.len()];
    for (vm, tasks) in waiting.iter().enumerate() {
        for &t in tasks[from[vm]..].iter() {
            let ready = dag
                .get_task(t)
                .predecessors
                .iter()
                .map(|&p| arrival_time(dag, p, vm, task_vm, network, ccr, &no_duplicates, finish))
                .max_by(|a, b| a.total_cmp(b))
                .unwrap_or(0.);
            let exec = ExecTime::of(dag.get_task(t).size, capacities[vm]).or_inf();
            start[t] = ready.max(free_time[vm]);
            finish[t] = start[t] + exec;
            free_time[vm] = finish[t];
        }
    }
}

/// Computes start and finish times for all tasks assigned at levels
/// `0..=max_level`, from scratch.
///
/// Tasks are timed level by level and, within a level, per VM in waiting-list
/// order, so a task is timed only after all its predecessors. Duplicate copies
/// occupy fixed slots on their VM timeline and are stepped over.
#[allow(clippy::too_many_arguments)]
pub fn run_timing(
    dag: &DAG,
    waiting: &[Vec<usize>],
    level_of: &[usize],
    task_vm: &[usize],
    capacities: &[f64],
    network: &Network,
    ccr: f64,
    duplicates: &[Vec<DuplicateTask>],
    max_level: usize,
    start: &mut [f64],
    finish: &mut [f64],
) {
    let mut free_time = vec![0.; capacities.len()];
    for level in 0..=max_level {
        for (vm, tasks) in waiting.iter().enumerate() {
            for &t in tasks.iter().filter(|&&t| level_of[t] == level) {
                let ready = dag
                    .get_task(t)
                    .predecessors
                    .iter()
                    .map(|&p| arrival_time(dag, p, vm, task_vm, network, ccr, duplicates, finish))
                    .max_by(|a, b| a.total_cmp(b))
                    .unwrap_or(0.);
                let exec = ExecTime::of(dag.get_task(t).size, capacities[vm]).or_inf();
                let mut est = ready.max(free_time[vm]);
                for dup in duplicates[vm].iter() {
                    if est < dup.finish && est + exec > dup.start {
                        est = dup.finish;
                    }
                }
                start[t] = est;
                finish[t] = est + exec;
                free_time[vm] = finish[t];
            }
        }
    }
}
