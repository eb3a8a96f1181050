//! Seeded synthetic dataset generator.
//!
//! All randomness of the crate lives here; the scheduler itself never consults
//! an RNG. Identical seeds always produce identical datasets.

use rand::prelude::*;
use rand_pcg::Pcg64;

use crate::dag::DAG;
use crate::network::Network;
use crate::vm::Vm;

/// Generates a layered random DAG with task sizes in the 500-700 range.
///
/// Layer widths vary between 1 and 4 tasks; every task of a non-first layer
/// draws up to 3 predecessors from the previous layer, so the layer structure
/// matches the topological levels.
pub fn generate_dag(rng: &mut Pcg64, num_tasks: usize) -> DAG {
    let mut dag = DAG::new();
    for i in 0..num_tasks {
        dag.add_task(&format!("t{}", i), rng.gen_range(500.0..700.0));
    }

    let mut layers: Vec<Vec<usize>> = Vec::new();
    let mut next = 0;
    while next < num_tasks {
        let width = rng.gen_range(1..=4).min(num_tasks - next);
        layers.push((next..next + width).collect());
        next += width;
    }

    for layer in 1..layers.len() {
        for &task in layers[layer].iter() {
            let num_predecessors = rng.gen_range(1..=layers[layer - 1].len().min(3));
            let mut predecessors: Vec<usize> = layers[layer - 1]
                .choose_multiple(rng, num_predecessors)
                .copied()
                .collect();
            predecessors.sort_unstable();
            for predecessor in predecessors {
                dag.add_dependency(predecessor, task);
            }
        }
    }

    dag
}

/// Generates a VM pool with processing capacities in the 10-20 range.
pub fn generate_vms(rng: &mut Pcg64, num_vms: usize) -> Vec<Vm> {
    (0..num_vms)
        .map(|i| Vm::new(&format!("vm{}", i), rng.gen_range(10.0..20.0)))
        .collect()
}

/// Generates a symmetric bandwidth matrix with bandwidths in the 20-30 range.
pub fn generate_network(rng: &mut Pcg64, num_vms: usize) -> Network {
    let mut matrix = vec![vec![0.; num_vms]; num_vms];
    for from in 0..num_vms {
        for to in from + 1..num_vms {
            let bandwidth = rng.gen_range(20.0..30.0);
            matrix[from][to] = bandwidth;
            matrix[to][from] = bandwidth;
        }
    }
    Network::new(matrix)
}

/// Generates a complete dataset from a single seed.
pub fn generate(seed: u64, num_tasks: usize, num_vms: usize) -> (DAG, Vec<Vm>, Network) {
    let mut rng = Pcg64::seed_from_u64(seed);
    let dag = generate_dag(&mut rng, num_tasks);
    let vms = generate_vms(&mut rng, num_vms);
    let network = generate_network(&mut rng, num_vms);
    (dag, vms, network)
}
