// lio_example/tests/run_synthetic.rs

use lio_example::datasets::{IMU_CHANNEL, LIDAR_CHANNEL, NUM_IMU, NUM_LIDAR};
use lio_example::prelude::*;
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> ExampleConfig {
    ExampleConfig {
        data_dir: dir.path().join("data"),
        output_dir: dir.path().join("results"),
        seed: Some(2024),
        ..Default::default()
    }
}

#[test]
fn test_raw_dataset_run_writes_tum_trajectory() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let mut pipeline = build_pipeline("MyPipeline").unwrap();
    let dataset = build_dataset("my_raw_dataset/first_trajectory", &config).unwrap();
    let summary = run_pipeline(&mut *pipeline, &*dataset, &config.params).unwrap();
    assert_eq!(summary.imu_count, NUM_IMU);
    assert_eq!(summary.lidar_count, NUM_LIDAR);

    let path = config.output_dir.join("out.txt");
    std::fs::create_dir_all(&config.output_dir).unwrap();
    summary.trajectory.to_tum(&path).unwrap();

    let loaded = Trajectory::from_tum(&path).unwrap();
    assert_eq!(loaded.stamps, summary.trajectory.stamps);
    assert!(loaded.poses.iter().all(|p| *p == SE3::identity()));
}

#[test]
fn test_synthetic_bag_replays_through_bag_dataset() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let source = MyRawDataset::new(ExampleSequence::SecondTrajectory, &config.data_dir, config.seed);
    let target = MyBagDataset::new(ExampleSequence::SecondTrajectory, &config.data_dir);
    let written = export_to_bag(&source, &target.bag_path(), IMU_CHANNEL, LIDAR_CHANNEL).unwrap();
    assert_eq!(written.message_count as usize, NUM_IMU + NUM_LIDAR);

    let replayed: Vec<Measurement> = target
        .data_iter()
        .unwrap()
        .map(|mm| mm.unwrap())
        .collect();
    let original: Vec<Measurement> = source
        .data_iter()
        .unwrap()
        .map(|mm| mm.unwrap())
        .collect();
    assert_eq!(replayed, original);

    let mut pipeline = MyPipeline::new();
    let summary = run_pipeline(&mut pipeline, &target, &ParamMap::new()).unwrap();
    assert_eq!(summary.trajectory.len(), NUM_LIDAR);
    assert!(summary.trajectory.poses.iter().all(|p| *p == SE3::identity()));
}

#[test]
fn test_bag_dataset_without_recording_fails_to_run() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let mut pipeline = MyPipeline::new();
    let dataset = build_dataset("my_bag_dataset/first_trajectory", &config).unwrap();
    assert!(run_pipeline(&mut pipeline, &*dataset, &ParamMap::new()).is_err());
}
