//! Tool for running experiments across many (dataset, ccr) combinations.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use itertools::Itertools;
use log::{error, info};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use threadpool::ThreadPool;

use crate::config::Config;
use crate::dag::DAG;
use crate::error::SchedulingError;
use crate::network::Network;
use crate::parsers::{read_bandwidths, read_vms};
use crate::run_stats::ScheduleStats;
use crate::scheduler::SmCptdScheduler;
use crate::system::System;
use crate::vm::Vm;

/// Contains result of a single scheduling run.
#[derive(Serialize, Debug, Clone)]
pub struct RunResult {
    pub dataset: String,
    pub ccr: f64,
    pub makespan: f64,
    pub slr: f64,
    pub avg_utilization: f64,
}

#[derive(Deserialize)]
struct ExperimentConfig {
    /// Dataset directories with task.csv, dag.csv, processing_capacity.csv and
    /// bandwidth.csv files.
    datasets: Vec<PathBuf>,
    ccrs: Vec<f64>,
    #[serde(default)]
    scheduling: Config,
}

struct Run {
    dataset: String,
    dag: DAG,
    vms: Vec<Vm>,
    network: Network,
    config: Config,
}

/// Represents an experiment consisting of multiple scheduling runs, one per
/// unique (dataset, ccr) combination.
pub struct Experiment {
    runs: Vec<Run>,
}

impl Experiment {
    /// Loads experiment from YAML config file.
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self, SchedulingError> {
        let data = std::fs::read_to_string(&config_path).map_err(|e| {
            SchedulingError::InvalidInput(format!("can't read file {}: {}", config_path.as_ref().display(), e))
        })?;
        let config: ExperimentConfig = serde_yaml::from_str(&data).map_err(|e| {
            SchedulingError::InvalidInput(format!(
                "can't parse YAML from file {}: {}",
                config_path.as_ref().display(),
                e
            ))
        })?;

        let mut datasets = Vec::new();
        for (index, dir) in config.datasets.iter().enumerate() {
            let seed = if config.scheduling.fixed_seed {
                config.scheduling.seed
            } else {
                config.scheduling.seed + index as u64
            };
            let mut rng = Pcg64::seed_from_u64(seed);
            let dag = DAG::from_csv(dir.join("task.csv"), dir.join("dag.csv"), &mut rng)?;
            let vms = read_vms(dir.join("processing_capacity.csv"))?;
            let network = read_bandwidths(dir.join("bandwidth.csv"))?;
            let name = dir
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| dir.display().to_string());
            datasets.push((name, dag, vms, network));
        }

        let runs = datasets
            .into_iter()
            .cartesian_product(config.ccrs.iter().copied())
            .map(|((dataset, dag, vms, network), ccr)| Run {
                dataset,
                dag,
                vms,
                network,
                config: Config {
                    ccr,
                    ..config.scheduling.clone()
                },
            })
            .collect();

        Ok(Self { runs })
    }

    /// Runs experiment on a thread pool and returns its results sorted by
    /// (dataset, ccr).
    pub fn run(self, num_threads: usize) -> Vec<RunResult> {
        let results = Arc::new(Mutex::new(Vec::new()));

        let pool = ThreadPool::new(num_threads);
        for run in self.runs.into_iter() {
            let results = results.clone();
            pool.execute(move || {
                let system = System {
                    vms: &run.vms,
                    network: &run.network,
                };
                match SmCptdScheduler::new().schedule(&run.dag, system, &run.config) {
                    Ok(schedule) => {
                        let stats = ScheduleStats::collect(&run.dag, system, &run.config, &schedule);
                        info!(
                            "dataset {} with ccr {}: makespan {:.3}",
                            run.dataset, run.config.ccr, stats.makespan
                        );
                        results.lock().unwrap().push(RunResult {
                            dataset: run.dataset,
                            ccr: run.config.ccr,
                            makespan: stats.makespan,
                            slr: stats.slr,
                            avg_utilization: stats.avg_utilization,
                        });
                    }
                    Err(e) => {
                        error!("dataset {} with ccr {}: {}", run.dataset, run.config.ccr, e);
                    }
                }
            });
        }
        pool.join();

        let mut results = Arc::try_unwrap(results).unwrap().into_inner().unwrap();
        results.sort_by(|a, b| a.dataset.cmp(&b.dataset).then(a.ccr.total_cmp(&b.ccr)));
        results
    }
}

/// Saves run results as pretty-printed JSON.
pub fn save_results<P: AsRef<Path>>(results: &[RunResult], file: P) -> Result<(), SchedulingError> {
    let data = serde_json::to_string_pretty(results)
        .map_err(|e| SchedulingError::InvalidInput(format!("can't serialize results: {}", e)))?;
    std::fs::write(&file, data)
        .map_err(|e| SchedulingError::InvalidInput(format!("can't write file {}: {}", file.as_ref().display(), e)))
}
