// lio_example/src/datasets/mod.rs

//! The example datasets and the pieces they share: sequence names, sensor
//! setup, file listing, and the ground-truth location.

use lio_core::prelude::*;
use nalgebra::Vector3;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::config::ExampleConfig;

mod bag;
mod raw;

pub use bag::{MyBagDataset, BAG_FILE, IMU_CHANNEL, LIDAR_CHANNEL};
pub use raw::{MyRawDataset, NUM_IMU, NUM_LIDAR};

pub const DATASET_URL: &str = "https://github.com/contagon/evalio-example";

/// Name of the ground-truth file inside a sequence folder.
pub const GROUND_TRUTH_FILE: &str = "ground_truth.txt";

/// The sequences both example datasets provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExampleSequence {
    FirstTrajectory,
    SecondTrajectory,
}

impl ExampleSequence {
    pub const ALL: [ExampleSequence; 2] = [
        ExampleSequence::FirstTrajectory,
        ExampleSequence::SecondTrajectory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExampleSequence::FirstTrajectory => "first_trajectory",
            ExampleSequence::SecondTrajectory => "second_trajectory",
        }
    }
}

impl fmt::Display for ExampleSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExampleSequence {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|seq| seq.as_str() == s)
            .ok_or_else(|| format!("unknown sequence '{}'", s))
    }
}

// =========================================================================
// == Shared Sensor Setup ==
// =========================================================================

pub(crate) fn example_imu_params() -> ImuParams {
    ImuParams {
        gyro: 0.01,
        accel: 0.01,
        accel_bias: 0.01,
        gyro_bias: 0.01,
        bias_init: 1e-8,
        integration: 1e-8,
        gravity: Vector3::new(0.0, 0.0, 9.81),
        ..Default::default()
    }
}

pub(crate) fn example_lidar_params() -> LidarParams {
    LidarParams {
        num_rows: 64, // aka rings/channels/scanlines
        num_columns: 1024,
        min_range: 0.1,
        max_range: 100.0,
        ..Default::default()
    }
}

/// Files that must be present in a sequence folder for it to count as downloaded.
pub(crate) fn example_files() -> Vec<String> {
    vec![
        "first_trajectory.bag".to_string(),
        "second_trajectory.bag".to_string(),
    ]
}

pub(crate) fn read_ground_truth(folder: &Path) -> Result<Trajectory> {
    Trajectory::from_tum(folder.join(GROUND_TRUTH_FILE))
}

pub(crate) fn download_not_implemented() -> Result<()> {
    // An automatic downloader would fetch the sequence archive into `folder()` here.
    Err(LioError::NotImplemented("Download not implemented".to_string()))
}

// =========================================================================
// == Registry ==
// =========================================================================

/// Names accepted by `build_dataset`, without the sequence part.
pub const DATASET_NAMES: [&str; 2] = [MyRawDataset::NAME, MyBagDataset::NAME];

/// Builds a dataset from `dataset/sequence`, e.g. `my_raw_dataset/first_trajectory`.
pub fn build_dataset(full_name: &str, config: &ExampleConfig) -> Result<Box<dyn Dataset>> {
    let (name, sequence) = full_name
        .split_once('/')
        .ok_or_else(|| LioError::UnknownDataset(full_name.to_string()))?;

    let sequence: ExampleSequence =
        sequence
            .parse()
            .map_err(|_| LioError::UnknownSequence {
                dataset: name.to_string(),
                sequence: sequence.to_string(),
            })?;

    match name {
        MyRawDataset::NAME => Ok(Box::new(MyRawDataset::new(
            sequence,
            &config.data_dir,
            config.seed,
        ))),
        MyBagDataset::NAME => Ok(Box::new(MyBagDataset::new(sequence, &config.data_dir))),
        other => Err(LioError::UnknownDataset(other.to_string())),
    }
}

/// Every sequence of every dataset.
pub fn all_datasets(config: &ExampleConfig) -> Vec<Box<dyn Dataset>> {
    let mut datasets: Vec<Box<dyn Dataset>> = Vec::new();
    for sequence in ExampleSequence::ALL {
        datasets.push(Box::new(MyRawDataset::new(
            sequence,
            &config.data_dir,
            config.seed,
        )));
    }
    for sequence in ExampleSequence::ALL {
        datasets.push(Box::new(MyBagDataset::new(sequence, &config.data_dir)));
    }
    datasets
}
