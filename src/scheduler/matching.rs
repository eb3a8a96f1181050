//! Level-wise stable matching of tasks to VMs.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use itertools::Itertools;
use log::warn;

use crate::dag::DAG;
use crate::scheduler::timing::ExecTime;

/// Matching state of a task during deferred acceptance.
#[derive(Clone, Copy, Debug, PartialEq)]
enum MatchState {
    Unmatched,
    Accepted(usize),
    ForceAssigned(usize),
}

impl MatchState {
    fn is_terminal(self) -> bool {
        !matches!(self, MatchState::Unmatched)
    }
}

/// Assigns the tasks of one level to VMs.
///
/// Critical tasks are pinned to the fastest VM up front and are never
/// displaced. The remaining tasks run deferred acceptance: every task proposes
/// to VMs in ascending order of its execution time there; a saturated VM keeps
/// the proposer only if it displaces a strictly worse occupant accepted at this
/// level. A task rejected everywhere falls back to the VM with the earliest
/// free time that still has a slot, or onto the fastest VM as the last resort.
///
/// Accepted tasks are appended to the per-VM waiting lists, which hold the
/// tasks of all levels matched so far.
#[allow(clippy::too_many_arguments)]
pub fn match_level(
    dag: &DAG,
    level_tasks: &[usize],
    critical_path: &BTreeSet<usize>,
    capacities: &[f64],
    thresholds: &[usize],
    fastest: usize,
    vm_free: &[f64],
    waiting: &mut [Vec<usize>],
) {
    for &t in level_tasks.iter().filter(|t| critical_path.contains(*t)) {
        waiting[fastest].push(t);
    }

    let non_cp: Vec<usize> = level_tasks
        .iter()
        .copied()
        .filter(|t| !critical_path.contains(t))
        .collect();
    let in_level: HashSet<usize> = non_cp.iter().copied().collect();
    let index_of: HashMap<usize, usize> = non_cp.iter().enumerate().map(|(idx, &t)| (t, idx)).collect();
    let vm_count = capacities.len();

    let exec_time = |task: usize, vm: usize| ExecTime::of(dag.get_task(task).size, capacities[vm]).or_inf();

    // VMs in ascending order of execution time; a rejection permanently drops
    // the head of the list
    let preferences: Vec<Vec<usize>> = non_cp
        .iter()
        .map(|&t| {
            (0..vm_count)
                .sorted_by(|&a, &b| exec_time(t, a).total_cmp(&exec_time(t, b)).then(a.cmp(&b)))
                .collect()
        })
        .collect();
    let mut next_choice = vec![0usize; non_cp.len()];
    let mut state = vec![MatchState::Unmatched; non_cp.len()];

    let mut queue: VecDeque<usize> = (0..non_cp.len()).collect();
    while let Some(idx) = queue.pop_front() {
        let t = non_cp[idx];

        if next_choice[idx] == preferences[idx].len() {
            // rejected everywhere
            let slot = (0..vm_count)
                .filter(|&vm| waiting[vm].len() < thresholds[vm])
                .min_by(|&a, &b| vm_free[a].total_cmp(&vm_free[b]).then(a.cmp(&b)));
            match slot {
                Some(vm) => {
                    waiting[vm].push(t);
                    state[idx] = MatchState::Accepted(vm);
                }
                None => {
                    warn!(
                        "no VM has a free slot for task {}, forcing it onto the fastest VM",
                        dag.get_task(t).name
                    );
                    waiting[fastest].push(t);
                    state[idx] = MatchState::ForceAssigned(fastest);
                }
            }
            continue;
        }

        let vm = preferences[idx][next_choice[idx]];
        if waiting[vm].len() < thresholds[vm] {
            waiting[vm].push(t);
            state[idx] = MatchState::Accepted(vm);
            continue;
        }

        // saturated: displace the worst occupant accepted at this level, if the
        // proposer beats it (critical tasks and earlier levels are immovable)
        let worst = waiting[vm]
            .iter()
            .enumerate()
            .filter(|(_, occupant)| in_level.contains(*occupant))
            .max_by(|a, b| exec_time(*a.1, vm).total_cmp(&exec_time(*b.1, vm)).then(a.1.cmp(b.1)))
            .map(|(pos, &occupant)| (pos, occupant));
        if let Some((pos, occupant)) = worst {
            if exec_time(t, vm) < exec_time(occupant, vm) {
                waiting[vm].remove(pos);
                waiting[vm].push(t);
                state[idx] = MatchState::Accepted(vm);
                let evicted = index_of[&occupant];
                state[evicted] = MatchState::Unmatched;
                // an occupant placed through the fallback branch has an
                // exhausted preference list; it must re-enter that branch, so
                // the cursor never moves past the list end
                if next_choice[evicted] < preferences[evicted].len() {
                    next_choice[evicted] += 1;
                }
                queue.push_back(evicted);
                continue;
            }
        }

        next_choice[idx] += 1;
        queue.push_back(idx);
    }

    debug_assert!(state.iter().all(|s| s.is_terminal()));
}
