//! Duplication of entry tasks into idle VM timeline slots.

use std::collections::BTreeSet;

use log::debug;

use crate::dag::DAG;
use crate::network::Network;
use crate::schedule::DuplicateTask;
use crate::scheduler::timing::{run_timing, ExecTime, ScheduledTask, EPSILON};

/// Copies entry tasks onto VMs hosting their successors whenever the copy fits
/// into an idle timeline slot ending before the earliest such successor starts.
///
/// A copy makes the entry task's output locally available, so the successors on
/// that VM no longer wait for the cross-VM transfer. Every accepted copy must
/// leave the finish time of all previously scheduled tasks intact; candidates
/// violating that are rolled back. Duplication is best-effort: a candidate
/// without a fitting slot is skipped silently and the schedule stands as is.
#[allow(clippy::too_many_arguments)]
pub fn duplicate_entry_tasks(
    dag: &DAG,
    entry_tasks: &[usize],
    capacities: &[f64],
    network: &Network,
    ccr: f64,
    waiting: &[Vec<usize>],
    level_of: &[usize],
    task_vm: &[usize],
    max_level: usize,
    duplicates: &mut Vec<Vec<DuplicateTask>>,
    start: &mut Vec<f64>,
    finish: &mut Vec<f64>,
) {
    for &t in entry_tasks {
        let home = task_vm[t];
        let candidate_vms: BTreeSet<usize> = dag
            .get_task(t)
            .successors
            .iter()
            .map(|&succ| task_vm[succ])
            .filter(|&vm| vm != home)
            .collect();

        for vm in candidate_vms {
            // the copy must complete before the earliest successor hosted here
            let limit = dag
                .get_task(t)
                .successors
                .iter()
                .filter(|&&succ| task_vm[succ] == vm)
                .map(|&succ| start[succ])
                .min_by(|a, b| a.total_cmp(b))
                .unwrap();

            let copy_time = match ExecTime::of(dag.get_task(t).size, capacities[vm]) {
                ExecTime::Finite(time) => time,
                ExecTime::Infeasible => {
                    debug!("task {} cannot run on VM {}, skipping duplication", dag.get_task(t).name, vm);
                    continue;
                }
            };

            let slot = find_idle_slot(vm, limit, copy_time, waiting, duplicates, start, finish);
            let slot_start = match slot {
                Some(time) => time,
                None => {
                    debug!(
                        "no idle slot for a copy of task {} on VM {}, skipping duplication",
                        dag.get_task(t).name,
                        vm
                    );
                    continue;
                }
            };

            let copy = DuplicateTask {
                task: t,
                start: slot_start,
                finish: slot_start + copy_time,
            };
            let pos = duplicates[vm]
                .iter()
                .position(|d| d.start > copy.start)
                .unwrap_or(duplicates[vm].len());
            duplicates[vm].insert(pos, copy);

            let mut new_start = start.clone();
            let mut new_finish = finish.clone();
            run_timing(
                dag,
                waiting,
                level_of,
                task_vm,
                capacities,
                network,
                ccr,
                duplicates,
                max_level,
                &mut new_start,
                &mut new_finish,
            );

            // no previously scheduled task may finish later than before
            let delays = finish
                .iter()
                .zip(new_finish.iter())
                .any(|(old, new)| *new > *old + EPSILON);
            if delays {
                duplicates[vm].remove(pos);
            } else {
                *start = new_start;
                *finish = new_finish;
            }
        }
    }
}

/// Finds the earliest idle interval on the VM timeline that ends at or before
/// `limit` and is long enough for the copy. Returns the interval start.
fn find_idle_slot(
    vm: usize,
    limit: f64,
    copy_time: f64,
    waiting: &[Vec<usize>],
    duplicates: &[Vec<DuplicateTask>],
    start: &[f64],
    finish: &[f64],
) -> Option<f64> {
    let mut timeline: BTreeSet<ScheduledTask> = waiting[vm]
        .iter()
        .map(|&t| ScheduledTask::new(start[t], finish[t], t))
        .collect();
    for dup in duplicates[vm].iter() {
        timeline.insert(ScheduledTask::new(dup.start, dup.finish, dup.task));
    }

    let mut slot_start = 0.;
    for occupied in timeline.iter() {
        let slot_end = occupied.start_time.min(limit);
        if slot_end - slot_start >= copy_time {
            return Some(slot_start);
        }
        slot_start = slot_start.max(occupied.finish_time);
        if slot_start >= limit {
            return None;
        }
    }
    if limit - slot_start >= copy_time {
        Some(slot_start)
    } else {
        None
    }
}
