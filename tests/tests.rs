use std::fs;
use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand_pcg::Pcg64;

use matchsched::config::Config;
use matchsched::dag::DAG;
use matchsched::error::SchedulingError;
use matchsched::experiment::Experiment;
use matchsched::parsers::{read_bandwidths, read_vms};
use matchsched::schedule::Schedule;
use matchsched::scheduler::SmCptdScheduler;
use matchsched::system::System;

fn assert_float_eq(x: f64, y: f64) {
    assert!((x - y).abs() < 1e-9, "values do not match: {:.15} vs {:.15}", x, y);
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("matchsched-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_diamond_dataset(dir: &Path) {
    fs::write(dir.join("task.csv"), "t0 100\nt1 50\nt2 50\nt3 100\n").unwrap();
    fs::write(dir.join("dag.csv"), "t0 t1\nt0 t2\nt1 t3\nt2 t3\n").unwrap();
    fs::write(dir.join("processing_capacity.csv"), "vm0 10\nvm1 20\n").unwrap();
    fs::write(dir.join("bandwidth.csv"), "vm0 0 25\nvm1 25 0\n").unwrap();
}

#[test]
fn loads_dataset_and_schedules_it() {
    let dir = temp_dir("load");
    write_diamond_dataset(&dir);

    let mut rng = Pcg64::seed_from_u64(123);
    let dag = DAG::from_csv(dir.join("task.csv"), dir.join("dag.csv"), &mut rng).unwrap();
    let vms = read_vms(dir.join("processing_capacity.csv")).unwrap();
    let network = read_bandwidths(dir.join("bandwidth.csv")).unwrap();

    assert_eq!(dag.task_count(), 4);
    assert_eq!(dag.get_task(3).predecessors, vec![1, 2]);
    assert_eq!(dag.get_task(0).successors, vec![1, 2]);
    assert_eq!(vms.len(), 2);
    assert_float_eq(network.bandwidth(0, 1), 25.);

    let system = System {
        vms: &vms,
        network: &network,
    };
    let schedule = SmCptdScheduler::new().schedule(&dag, system, &Config::default()).unwrap();
    assert_float_eq(schedule.makespan, 17.4);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn regenerates_missing_sizes_deterministically() {
    let dir = temp_dir("sizes");
    fs::write(dir.join("task.csv"), "t0\nt1\nt2\n").unwrap();
    fs::write(dir.join("dag.csv"), "t0 t1\nt1 t2\n").unwrap();

    let mut rng = Pcg64::seed_from_u64(7);
    let first = DAG::from_csv(dir.join("task.csv"), dir.join("dag.csv"), &mut rng).unwrap();
    let mut rng = Pcg64::seed_from_u64(7);
    let second = DAG::from_csv(dir.join("task.csv"), dir.join("dag.csv"), &mut rng).unwrap();

    for (a, b) in first.get_tasks().iter().zip(second.get_tasks().iter()) {
        assert_eq!(a.size, b.size);
        assert!((500.0..700.0).contains(&a.size));
    }

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn rejects_malformed_datasets() {
    let dir = temp_dir("malformed");

    fs::write(dir.join("task.csv"), "t0 abc\n").unwrap();
    fs::write(dir.join("dag.csv"), "").unwrap();
    let mut rng = Pcg64::seed_from_u64(1);
    let result = DAG::from_csv(dir.join("task.csv"), dir.join("dag.csv"), &mut rng);
    assert!(matches!(result, Err(SchedulingError::InvalidInput(_))));

    fs::write(dir.join("task.csv"), "t0 100\n").unwrap();
    fs::write(dir.join("dag.csv"), "t0 t9\n").unwrap();
    let mut rng = Pcg64::seed_from_u64(1);
    let result = DAG::from_csv(dir.join("task.csv"), dir.join("dag.csv"), &mut rng);
    assert!(matches!(result, Err(SchedulingError::InvalidInput(_))));

    fs::write(dir.join("bandwidth.csv"), "vm0 0 25 30\nvm1 25 0\n").unwrap();
    let result = read_bandwidths(dir.join("bandwidth.csv"));
    assert!(matches!(result, Err(SchedulingError::InvalidInput(_))));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn schedule_survives_file_round_trip() {
    let dir = temp_dir("roundtrip");
    write_diamond_dataset(&dir);

    let mut rng = Pcg64::seed_from_u64(123);
    let dag = DAG::from_csv(dir.join("task.csv"), dir.join("dag.csv"), &mut rng).unwrap();
    let vms = read_vms(dir.join("processing_capacity.csv")).unwrap();
    let network = read_bandwidths(dir.join("bandwidth.csv")).unwrap();
    let system = System {
        vms: &vms,
        network: &network,
    };
    let schedule = SmCptdScheduler::new().schedule(&dag, system, &Config::default()).unwrap();

    let file = dir.join("schedule.json");
    schedule.save_to_file(&file).unwrap();
    let loaded = Schedule::load_from_file(&file).unwrap();
    assert_eq!(schedule, loaded);
    assert_float_eq(schedule.makespan, loaded.makespan);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn experiment_covers_all_combinations() {
    let dir = temp_dir("experiment");
    let dataset_dir = dir.join("diamond");
    fs::create_dir_all(&dataset_dir).unwrap();
    write_diamond_dataset(&dataset_dir);

    let config_path = dir.join("experiment.yaml");
    fs::write(
        &config_path,
        format!("datasets:\n  - {}\nccrs: [0.4, 0.8]\n", dataset_dir.display()),
    )
    .unwrap();

    let results = Experiment::load(&config_path).unwrap().run(2);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].dataset, "diamond");
    assert_float_eq(results[0].ccr, 0.4);
    assert_float_eq(results[1].ccr, 0.8);
    assert_float_eq(results[0].makespan, 17.4);
    assert!(results.iter().all(|r| r.makespan > 0. && r.slr >= 1.));

    fs::remove_dir_all(&dir).unwrap();
}
