//! Three-phase workflow scheduler.

pub mod duplication;
pub mod levels;
pub mod matching;
pub mod ranks;
pub mod thresholds;
pub mod timing;

use log::debug;

use crate::config::Config;
use crate::dag::DAG;
use crate::error::SchedulingError;
use crate::schedule::Schedule;
use crate::scheduler::timing::ExecTime;
use crate::system::System;

/// Static scheduler combining critical path extraction, level-wise stable
/// matching and entry-task duplication (SM-CPTD).
///
/// The scheduler is deterministic: identical inputs always yield an identical
/// [`Schedule`]. All tie-breaks fall back to the smallest task or VM id.
pub struct SmCptdScheduler {}

impl SmCptdScheduler {
    pub fn new() -> Self {
        SmCptdScheduler {}
    }

    /// Produces a complete schedule for the DAG on the given system.
    pub fn schedule(&self, dag: &DAG, system: System, config: &Config) -> Result<Schedule, SchedulingError> {
        if system.vms.is_empty() {
            return Err(SchedulingError::EmptyVmPool);
        }
        let capacities = system.capacities(&config.capability);
        let vm_count = capacities.len();
        let task_count = dag.task_count();

        let levels = levels::build_levels(dag)?;
        let edge_cost_factor = config.ccr * system.network.avg_inv_bandwidth();
        let task_ranks = ranks::calc_ranks(dag, &capacities, edge_cost_factor);
        let critical_path = ranks::select_critical_path(&levels, &task_ranks);

        for &t in critical_path.iter() {
            let task = dag.get_task(t);
            if !capacities.iter().any(|&c| ExecTime::of(task.size, c).is_finite()) {
                return Err(SchedulingError::InfeasibleSchedule(format!(
                    "critical task {} cannot run on any VM",
                    task.name
                )));
            }
        }

        let fastest = system.fastest_vm(&capacities);
        let mut level_of = vec![0usize; task_count];
        for (level, tasks) in levels.iter().enumerate() {
            for &t in tasks.iter() {
                level_of[t] = level;
            }
        }

        let mut waiting: Vec<Vec<usize>> = vec![Vec::new(); vm_count];
        let mut task_vm = vec![usize::MAX; task_count];
        let mut start = vec![0.; task_count];
        let mut finish = vec![0.; task_count];
        let mut free_time = vec![0.; vm_count];

        let mut cumulative_tasks = 0;
        for level_tasks in levels.iter() {
            cumulative_tasks += level_tasks.len();
            let vm_thresholds = thresholds::compute_thresholds(cumulative_tasks, &capacities);

            let prev_len: Vec<usize> = waiting.iter().map(|tasks| tasks.len()).collect();
            matching::match_level(
                dag,
                level_tasks,
                &critical_path,
                &capacities,
                &vm_thresholds,
                fastest,
                &free_time,
                &mut waiting,
            );
            for (vm, tasks) in waiting.iter().enumerate() {
                for &t in tasks[prev_len[vm]..].iter() {
                    task_vm[t] = vm;
                    debug!("assigned task {} to VM {}", dag.get_task(t).name, system.vms[vm].name);
                }
            }

            timing::schedule_new_tasks(
                dag,
                &waiting,
                &prev_len,
                &task_vm,
                &capacities,
                system.network,
                config.ccr,
                &mut start,
                &mut finish,
                &mut free_time,
            );
        }

        let mut duplicates = vec![Vec::new(); vm_count];
        duplication::duplicate_entry_tasks(
            dag,
            &levels[0],
            &capacities,
            system.network,
            config.ccr,
            &waiting,
            &level_of,
            &task_vm,
            levels.len() - 1,
            &mut duplicates,
            &mut start,
            &mut finish,
        );

        let makespan = finish.iter().copied().max_by(|a, b| a.total_cmp(b)).unwrap_or(0.);
        Ok(Schedule {
            assignment: waiting,
            duplicates,
            start_times: start,
            finish_times: finish,
            critical_path,
            makespan,
        })
    }
}
