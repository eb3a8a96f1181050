//! DAG model of a workflow.

use crate::task::Task;

/// Represents a workflow as a directed acyclic graph of tasks.
///
/// Each edge `i -> j` is a precedence constraint: task `j` cannot start before
/// task `i` completes and its output is transferred to the VM executing `j`.
/// Entry tasks (no predecessors) form level 0 of the topological partition,
/// acyclicity is verified when the partition is built.
#[derive(Clone, Debug, Default)]
pub struct DAG {
    tasks: Vec<Task>,
}

impl DAG {
    /// Creates empty DAG.
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Adds new [task](crate::task::Task) with provided parameters and returns its id.
    pub fn add_task(&mut self, name: &str, size: f64) -> usize {
        let task_id = self.tasks.len();
        self.tasks.push(Task::new(name, size));
        task_id
    }

    /// Adds a precedence edge `from -> to`, keeping both adjacency lists in sync.
    ///
    /// Duplicate edges are ignored.
    pub fn add_dependency(&mut self, from: usize, to: usize) {
        assert!(from < self.tasks.len() && to < self.tasks.len(), "unknown task id");
        assert_ne!(from, to, "self-dependency");
        if self.tasks[from].successors.contains(&to) {
            return;
        }
        self.tasks[from].successors.push(to);
        self.tasks[to].predecessors.push(from);
    }

    /// Returns task by id.
    pub fn get_task(&self, task_id: usize) -> &Task {
        &self.tasks[task_id]
    }

    /// Returns all tasks.
    pub fn get_tasks(&self) -> &Vec<Task> {
        &self.tasks
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}
