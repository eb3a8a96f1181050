//! Bottom-up task ranks and critical path selection.

use std::collections::BTreeSet;

use crate::dag::DAG;

/// Average execution time of every task over the VMs with a positive capacity.
///
/// With no usable VM the weight falls back to the raw task size, so ranks stay
/// finite and comparable even for degenerate pools.
pub fn task_weights(dag: &DAG, capacities: &[f64]) -> Vec<f64> {
    let usable: Vec<f64> = capacities.iter().copied().filter(|&c| c > 0.).collect();
    dag.get_tasks()
        .iter()
        .map(|task| {
            if usable.is_empty() {
                task.size
            } else {
                usable.iter().map(|&c| task.size / c).sum::<f64>() / usable.len() as f64
            }
        })
        .collect()
}

/// Computes upward ranks: the task weight plus the heaviest path (communication
/// included) to any exit task.
///
/// The edge cost of `i -> j` is `size(i) * edge_cost_factor`, where the factor
/// folds the CCR and the averaged inverse bandwidth and is VM-agnostic.
/// The traversal is an explicit-stack post-order, DAGs with chains of thousands
/// of tasks must not overflow the call stack.
pub fn calc_ranks(dag: &DAG, capacities: &[f64], edge_cost_factor: f64) -> Vec<f64> {
    let task_count = dag.task_count();
    let weights = task_weights(dag, capacities);
    let mut ranks = vec![0.; task_count];
    let mut computed = vec![false; task_count];

    for root in 0..task_count {
        if computed[root] {
            continue;
        }
        let mut stack = vec![(root, false)];
        while let Some((v, expanded)) = stack.pop() {
            if computed[v] {
                continue;
            }
            if expanded {
                let task = dag.get_task(v);
                let downstream = task
                    .successors
                    .iter()
                    .map(|&succ| task.size * edge_cost_factor + ranks[succ])
                    .max_by(|a, b| a.total_cmp(b))
                    .unwrap_or(0.);
                ranks[v] = weights[v] + downstream;
                computed[v] = true;
            } else {
                stack.push((v, true));
                for &succ in dag.get_task(v).successors.iter() {
                    if !computed[succ] {
                        stack.push((succ, false));
                    }
                }
            }
        }
    }

    ranks
}

/// Selects the critical path: the maximum-rank task of every level, ties
/// resolved towards the smallest task id.
pub fn select_critical_path(levels: &[Vec<usize>], ranks: &[f64]) -> BTreeSet<usize> {
    let mut critical_path = BTreeSet::new();
    for level_tasks in levels.iter().filter(|tasks| !tasks.is_empty()) {
        let mut best = level_tasks[0];
        for &t in level_tasks.iter().skip(1) {
            if ranks[t] > ranks[best] || (ranks[t] == ranks[best] && t < best) {
                best = t;
            }
        }
        critical_path.insert(best);
    }
    critical_path
}
