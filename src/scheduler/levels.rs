//! Topological level partition.

use std::collections::VecDeque;

use crate::dag::DAG;
use crate::error::SchedulingError;

/// Partitions the DAG into topological levels with a BFS over in-degrees.
///
/// Level 0 holds the entry tasks; every other task lands one level below its
/// deepest predecessor, so `level(i) < level(j)` for every edge `i -> j`.
/// Fails if the graph has no entry tasks or contains a dependency cycle.
pub fn build_levels(dag: &DAG) -> Result<Vec<Vec<usize>>, SchedulingError> {
    let task_count = dag.task_count();
    let mut in_degree: Vec<usize> = dag.get_tasks().iter().map(|t| t.predecessors.len()).collect();
    let mut level = vec![0usize; task_count];

    let mut queue: VecDeque<usize> = (0..task_count).filter(|&t| in_degree[t] == 0).collect();
    if queue.is_empty() {
        return Err(SchedulingError::InvalidDag("no entry tasks".to_string()));
    }

    let mut levels: Vec<Vec<usize>> = Vec::new();
    let mut processed = 0;
    while let Some(t) = queue.pop_front() {
        processed += 1;
        while level[t] >= levels.len() {
            levels.push(Vec::new());
        }
        levels[level[t]].push(t);
        for &succ in dag.get_task(t).successors.iter() {
            level[succ] = level[succ].max(level[t] + 1);
            in_degree[succ] -= 1;
            if in_degree[succ] == 0 {
                queue.push_back(succ);
            }
        }
    }

    if processed != task_count {
        return Err(SchedulingError::InvalidDag("dependency cycle detected".to_string()));
    }
    Ok(levels)
}
