// lio_example/src/datasets/bag.rs

use lio_core::prelude::*;
use std::path::{Path, PathBuf};

use super::{
    download_not_implemented, example_files, example_imu_params, example_lidar_params,
    read_ground_truth, ExampleSequence, DATASET_URL,
};

/// Bag file inside the sequence folder holding the recording.
pub const BAG_FILE: &str = "temp.bag";
pub const IMU_CHANNEL: &str = "/imu";
pub const LIDAR_CHANNEL: &str = "/lidar";

/// A dataset whose measurements are replayed from a recorded bag.
#[derive(Debug, Clone)]
pub struct MyBagDataset {
    sequence: ExampleSequence,
    root: PathBuf,
}

impl MyBagDataset {
    pub const NAME: &'static str = "my_bag_dataset";

    pub fn new(sequence: ExampleSequence, root: &Path) -> Self {
        Self {
            sequence,
            root: root.to_path_buf(),
        }
    }

    pub fn bag_path(&self) -> PathBuf {
        self.folder().join(BAG_FILE)
    }

    /// How scans in this recording are laid out. Anything left as a guess is
    /// decided per scan from the data.
    pub fn lidar_format(&self) -> LidarFormatParams {
        LidarFormatParams {
            major: LidarMajor::Row,
            point_stamp: LidarPointStamp::Guess,
            density: LidarDensity::Guess,
            stamp: LidarStamp::Start,
        }
    }
}

impl Dataset for MyBagDataset {
    fn dataset_name(&self) -> &'static str {
        Self::NAME
    }

    fn sequence_name(&self) -> &str {
        self.sequence.as_str()
    }

    fn data_root(&self) -> &Path {
        &self.root
    }

    fn url(&self) -> &'static str {
        DATASET_URL
    }

    fn data_iter(&self) -> Result<Box<dyn DatasetIterator>> {
        let iter = BagIter::open(
            self.bag_path(),
            IMU_CHANNEL,
            LIDAR_CHANNEL,
            self.lidar_params(),
            self.lidar_format(),
        )?;
        Ok(Box::new(iter))
    }

    fn ground_truth_raw(&self) -> Result<Trajectory> {
        read_ground_truth(&self.folder())
    }

    fn imu_t_lidar(&self) -> SE3 {
        SE3::identity()
    }

    fn imu_t_gt(&self) -> SE3 {
        SE3::identity()
    }

    fn imu_params(&self) -> ImuParams {
        example_imu_params()
    }

    fn lidar_params(&self) -> LidarParams {
        example_lidar_params()
    }

    fn files(&self) -> Vec<String> {
        example_files()
    }

    fn download(&self) -> Result<()> {
        download_not_implemented()
    }
}
