// lio_example/examples/01_synthetic_run.rs

//! An end-to-end run of the template pipeline over synthetic data.
//!
//! This example demonstrates how to:
//! 1. Build a pipeline and a dataset through the registries.
//! 2. Override a pipeline parameter.
//! 3. Run the pipeline and save the estimated trajectory in TUM format.
//!
//! To run this example:
//! `cargo run --example 01_synthetic_run`

use lio_example::logging::init_logging;
use lio_example::prelude::*;

fn main() -> Result<()> {
    init_logging("info,lio_core=debug,lio_example=debug");

    // --- 1. Configuration ---
    let config = ExampleConfig {
        seed: Some(7),
        ..Default::default()
    };

    // --- 2. Pipeline & Dataset ---
    let mut pipeline = build_pipeline(MyPipeline::NAME)?;
    let dataset = build_dataset("my_raw_dataset/first_trajectory", &config)?;
    let overrides = ParamMap::from([("param2".to_string(), Param::Int(10))]);

    // --- 3. Run & Save ---
    let summary = run_pipeline(&mut *pipeline, &*dataset, &overrides)?;
    std::fs::create_dir_all(&config.output_dir)?;
    let output = config.output_dir.join("example_first_trajectory.txt");
    summary.trajectory.to_tum(&output)?;

    println!(
        "{} poses from {} IMU samples and {} scans written to {}",
        summary.trajectory.len(),
        summary.imu_count,
        summary.lidar_count,
        output.display()
    );
    Ok(())
}
