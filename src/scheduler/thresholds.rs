//! Per-VM capacity thresholds.

use itertools::Itertools;

/// Computes the per-VM task count thresholds for one level.
///
/// `task_count` is the cumulative number of tasks up to and including the level
/// being scheduled; every VM gets the ceiling of its proportional share of it.
/// The ceiling keeps the sum at or above `task_count`, the round-robin top-up
/// below only fires for degenerate pools with no positive capacity.
pub fn compute_thresholds(task_count: usize, capacities: &[f64]) -> Vec<usize> {
    if capacities.is_empty() {
        return Vec::new();
    }
    let total: f64 = capacities.iter().filter(|&&c| c > 0.).sum();
    let mut thresholds: Vec<usize> = capacities
        .iter()
        .map(|&c| {
            if c > 0. && total > 0. {
                (task_count as f64 / total * c).ceil() as usize
            } else {
                0
            }
        })
        .collect();

    let mut sum: usize = thresholds.iter().sum();
    if sum < task_count {
        let order: Vec<usize> = (0..capacities.len())
            .sorted_by(|&a, &b| capacities[b].total_cmp(&capacities[a]).then(a.cmp(&b)))
            .collect();
        'distribute: loop {
            for &vm in order.iter() {
                thresholds[vm] += 1;
                sum += 1;
                if sum == task_count {
                    break 'distribute;
                }
            }
        }
    }
    thresholds
}
