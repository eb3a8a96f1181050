//! Schedule metrics.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::dag::DAG;
use crate::schedule::Schedule;
use crate::scheduler::timing::ExecTime;
use crate::system::System;

/// Contains metrics computed from a produced schedule.
#[derive(Serialize, Deserialize, Clone, Default, Debug)]
pub struct ScheduleStats {
    /// Latest finish time over primary copies.
    pub makespan: f64,
    /// Schedule Length Ratio: makespan over the sum of minimal execution times
    /// of the critical tasks.
    pub slr: f64,
    /// Busy time share of every VM, duplicates included.
    pub vm_utilization: Vec<f64>,
    /// Average utilization over the VMs that executed at least one copy.
    pub avg_utilization: f64,
    /// The number of VMs that executed at least one copy.
    pub used_vm_count: usize,
}

impl ScheduleStats {
    pub fn collect(dag: &DAG, system: System, config: &Config, schedule: &Schedule) -> Self {
        let capacities = system.capacities(&config.capability);

        for (t, location) in schedule.task_locations().iter().enumerate() {
            if location.is_none() {
                warn!("task {} has no assignment, metrics ignore it", dag.get_task(t).name);
            }
        }

        let mut busy = vec![0.; system.vms.len()];
        for (vm, tasks) in schedule.assignment.iter().enumerate() {
            for &t in tasks.iter() {
                busy[vm] += schedule.finish_times[t] - schedule.start_times[t];
            }
        }
        for (vm, copies) in schedule.duplicates.iter().enumerate() {
            for copy in copies.iter() {
                busy[vm] += copy.finish - copy.start;
            }
        }

        let makespan = schedule.makespan;
        let vm_utilization: Vec<f64> = busy
            .iter()
            .map(|&b| if makespan > 0. { b / makespan } else { 0. })
            .collect();
        let used: Vec<f64> = vm_utilization.iter().copied().filter(|&u| u > 0.).collect();
        let used_vm_count = used.len();
        let avg_utilization = if used.is_empty() {
            0.
        } else {
            used.iter().sum::<f64>() / used.len() as f64
        };

        // the denominator is the makespan floor of running the critical path on
        // the best VM with no communication at all
        let cp_floor: f64 = schedule
            .critical_path
            .iter()
            .map(|&t| {
                capacities
                    .iter()
                    .map(|&c| ExecTime::of(dag.get_task(t).size, c).or_inf())
                    .min_by(|a, b| a.total_cmp(b))
                    .unwrap_or(f64::INFINITY)
            })
            .sum();
        let slr = makespan / cp_floor;

        Self {
            makespan,
            slr,
            vm_utilization,
            avg_utilization,
            used_vm_count,
        }
    }
}
