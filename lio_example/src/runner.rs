// lio_example/src/runner.rs

//! Drives a pipeline over a dataset and turns its output into a trajectory.

use lio_core::loaders::BagSummary;
use lio_core::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// One pose per LiDAR scan, stamped with the scan time.
    pub trajectory: Trajectory,
    pub imu_count: usize,
    pub lidar_count: usize,
}

/// Runs `pipeline` over every measurement in `dataset`.
///
/// The pipeline is configured from the dataset's sensor setup, then its
/// defaults are merged with `overrides` and handed to `set_params` before
/// `initialize`. The first failing measurement aborts the run.
pub fn run_pipeline(
    pipeline: &mut dyn Pipeline,
    dataset: &dyn Dataset,
    overrides: &ParamMap,
) -> Result<RunSummary> {
    info!(
        "Running {} on {}",
        pipeline.name(),
        dataset.full_name()
    );

    pipeline.set_imu_params(dataset.imu_params());
    pipeline.set_lidar_params(dataset.lidar_params());
    pipeline.set_imu_t_lidar(dataset.imu_t_lidar());

    let params = merge_params(&pipeline.default_params(), overrides);
    pipeline.set_params(&params)?;
    pipeline.initialize();

    let iter = dataset.data_iter()?;
    if let Some(n) = iter.num_lidar() {
        debug!("Dataset reports {} scans", n);
    }

    let mut summary = RunSummary {
        trajectory: Trajectory::new(),
        imu_count: 0,
        lidar_count: 0,
    };

    for mm in iter {
        match mm? {
            Measurement::Imu(imu) => {
                pipeline.add_imu(&imu);
                summary.imu_count += 1;
            }
            Measurement::Lidar(scan) => {
                let used = pipeline.add_lidar(&scan);
                summary.trajectory.push(scan.stamp, pipeline.pose());
                summary.lidar_count += 1;
                debug!(
                    "Scan {} at {}: {} of {} points used",
                    summary.lidar_count,
                    scan.stamp,
                    used.len(),
                    scan.points.len()
                );
            }
        }
    }

    info!(
        "Finished {} on {}: {} IMU samples, {} scans",
        pipeline.name(),
        dataset.full_name(),
        summary.imu_count,
        summary.lidar_count
    );
    Ok(summary)
}

/// Records every measurement of `dataset` into a bag at `path`.
pub fn export_to_bag(
    dataset: &dyn Dataset,
    path: &Path,
    imu_channel: &str,
    lidar_channel: &str,
) -> Result<BagSummary> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = BagWriter::create(path)?;
    for mm in dataset.data_iter()? {
        writer.write_measurement(imu_channel, lidar_channel, &mm?)?;
    }
    let summary = writer.finish()?;

    info!(
        "Wrote {} messages on {} channels from {} to {}",
        summary.message_count,
        summary.channel_count,
        dataset.full_name(),
        summary.path.display()
    );
    Ok(summary)
}
