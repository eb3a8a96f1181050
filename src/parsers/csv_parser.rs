use std::collections::HashMap;
use std::path::Path;

use rand::Rng;

use crate::dag::DAG;
use crate::error::SchedulingError;
use crate::network::Network;
use crate::vm::Vm;

fn read_lines<P: AsRef<Path>>(file: P) -> Result<Vec<String>, SchedulingError> {
    let data = std::fs::read_to_string(&file)
        .map_err(|e| SchedulingError::InvalidInput(format!("can't read file {}: {}", file.as_ref().display(), e)))?;
    Ok(data
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect())
}

impl DAG {
    /// Reads a DAG from a task list file and an edge list file.
    ///
    /// Task rows are `t<id> [<size>]`; a missing size is regenerated from the
    /// provided RNG in the 500-700 range. Edge rows are `t<from> t<to>` and may
    /// only reference tasks from the task file. Only the DAG structure is
    /// authoritative, sizes are allowed to differ between loader runs.
    pub fn from_csv<P: AsRef<Path>, Q: AsRef<Path>>(
        tasks_file: P,
        edges_file: Q,
        rng: &mut impl Rng,
    ) -> Result<DAG, SchedulingError> {
        let mut dag = DAG::new();
        let mut task_ids: HashMap<String, usize> = HashMap::new();

        for line in read_lines(&tasks_file)? {
            let mut tokens = line.split_whitespace();
            let name = tokens.next().unwrap();
            if task_ids.contains_key(name) {
                return Err(SchedulingError::InvalidInput(format!("duplicate task {} in {}", name, line)));
            }
            let size = match tokens.next() {
                Some(token) => token
                    .parse::<f64>()
                    .map_err(|_| SchedulingError::InvalidInput(format!("bad task size in row '{}'", line)))?,
                None => rng.gen_range(500.0..700.0),
            };
            task_ids.insert(name.to_string(), dag.add_task(name, size));
        }

        for line in read_lines(&edges_file)? {
            let mut tokens = line.split_whitespace();
            let from = tokens.next().unwrap();
            let to = tokens
                .next()
                .ok_or_else(|| SchedulingError::InvalidInput(format!("bad edge row '{}'", line)))?;
            let &from_id = task_ids
                .get(from)
                .ok_or_else(|| SchedulingError::InvalidInput(format!("edge references unknown task {}", from)))?;
            let &to_id = task_ids
                .get(to)
                .ok_or_else(|| SchedulingError::InvalidInput(format!("edge references unknown task {}", to)))?;
            dag.add_dependency(from_id, to_id);
        }

        Ok(dag)
    }
}

/// Reads the VM pool from rows of `vm<id> <capacity>`.
pub fn read_vms<P: AsRef<Path>>(file: P) -> Result<Vec<Vm>, SchedulingError> {
    let mut vms = Vec::new();
    for line in read_lines(&file)? {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().unwrap();
        let capacity = tokens
            .next()
            .and_then(|token| token.parse::<f64>().ok())
            .ok_or_else(|| SchedulingError::InvalidInput(format!("bad VM capacity in row '{}'", line)))?;
        vms.push(Vm::new(name, capacity));
    }
    Ok(vms)
}

/// Reads the symmetric VM-to-VM bandwidth matrix. Rows may carry a leading
/// `vm<id>` label, which is skipped.
pub fn read_bandwidths<P: AsRef<Path>>(file: P) -> Result<Network, SchedulingError> {
    let mut matrix: Vec<Vec<f64>> = Vec::new();
    for line in read_lines(&file)? {
        let mut tokens = line.split_whitespace().peekable();
        if tokens.peek().is_some_and(|token| token.parse::<f64>().is_err()) {
            tokens.next();
        }
        let row = tokens
            .map(|token| {
                token
                    .parse::<f64>()
                    .map_err(|_| SchedulingError::InvalidInput(format!("bad bandwidth in row '{}'", line)))
            })
            .collect::<Result<Vec<f64>, _>>()?;
        matrix.push(row);
    }
    if matrix.iter().any(|row| row.len() != matrix.len()) {
        return Err(SchedulingError::InvalidInput(format!(
            "bandwidth matrix in {} is not square",
            file.as_ref().display()
        )));
    }
    Ok(Network::new(matrix))
}
