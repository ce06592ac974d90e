// lio_example/src/datasets/raw.rs

use lio_core::prelude::*;
use nalgebra::Vector3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{
    download_not_implemented, example_files, example_imu_params, example_lidar_params,
    read_ground_truth, ExampleSequence, DATASET_URL,
};

/// IMU samples generated per run, at `IMU_RATE_HZ`.
pub const NUM_IMU: usize = 100;
pub const IMU_RATE_HZ: f64 = 100.0;

/// LiDAR scans generated per run, at `LIDAR_RATE_HZ`.
pub const NUM_LIDAR: usize = 10;
pub const LIDAR_RATE_HZ: f64 = 10.0;

/// A dataset whose measurements are synthesised on the fly.
///
/// IMU readings are uniform random in `[0, 1)` per axis; LiDAR scans carry only
/// a stamp. Useful for exercising a pipeline without any data on disk.
#[derive(Debug, Clone)]
pub struct MyRawDataset {
    sequence: ExampleSequence,
    root: PathBuf,
    seed: Option<u64>,
}

impl MyRawDataset {
    pub const NAME: &'static str = "my_raw_dataset";

    pub fn new(sequence: ExampleSequence, root: &Path, seed: Option<u64>) -> Self {
        Self {
            sequence,
            root: root.to_path_buf(),
            seed,
        }
    }

    pub fn sequence(&self) -> ExampleSequence {
        self.sequence
    }

    fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

impl Dataset for MyRawDataset {
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
        let mut rng = self.rng();

        // Rows of [gx, gy, gz, ax, ay, az].
        let imu: Vec<ImuMeasurement> = (0..NUM_IMU)
            .map(|i| {
                let row: [f64; 6] = rng.gen();
                ImuMeasurement::new(
                    Stamp::from_sec(i as f64 / IMU_RATE_HZ),
                    Vector3::new(row[0], row[1], row[2]),
                    Vector3::new(row[3], row[4], row[5]),
                )
            })
            .collect();

        // Scans are produced lazily; a real loader would read one file per scan here.
        let lidar =
            (0..NUM_LIDAR).map(|i| LidarMeasurement::new(Stamp::from_sec(i as f64 / LIDAR_RATE_HZ)));

        debug!(
            "Synthesised {} IMU samples and {} scans for {}",
            NUM_IMU,
            NUM_LIDAR,
            self.full_name()
        );
        Ok(Box::new(RawDataIter::new(lidar, imu.into_iter(), NUM_LIDAR)))
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tempfile::TempDir;

    fn collect(dataset: &MyRawDataset) -> (Vec<ImuMeasurement>, Vec<LidarMeasurement>) {
        let mut imu = Vec::new();
        let mut lidar = Vec::new();
        for mm in dataset.data_iter().unwrap() {
            match mm.unwrap() {
                Measurement::Imu(m) => imu.push(m),
                Measurement::Lidar(m) => lidar.push(m),
            }
        }
        (imu, lidar)
    }

    #[test]
    fn test_counts_and_cadence() {
        let dataset = MyRawDataset::new(ExampleSequence::FirstTrajectory, Path::new("."), Some(1));
        assert_eq!(dataset.data_iter().unwrap().num_lidar(), Some(NUM_LIDAR));

        let (imu, lidar) = collect(&dataset);
        assert_eq!(imu.len(), 100);
        assert_eq!(lidar.len(), 10);

        for (i, mm) in imu.iter().enumerate() {
            assert_abs_diff_eq!(mm.stamp.to_sec(), i as f64 / 100.0, epsilon = 1e-9);
        }
        for (i, mm) in lidar.iter().enumerate() {
            assert_abs_diff_eq!(mm.stamp.to_sec(), i as f64 / 10.0, epsilon = 1e-9);
            assert!(mm.points.is_empty());
        }
    }

    #[test]
    fn test_stream_is_time_ordered() {
        let dataset = MyRawDataset::new(ExampleSequence::SecondTrajectory, Path::new("."), None);
        let stamps: Vec<Stamp> = dataset
            .data_iter()
            .unwrap()
            .map(|mm| mm.unwrap().stamp())
            .collect();
        assert_eq!(stamps.len(), 110);
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_imu_values_in_unit_range_and_seeded() {
        let dataset = MyRawDataset::new(ExampleSequence::FirstTrajectory, Path::new("."), Some(42));
        let (first, _) = collect(&dataset);
        let (second, _) = collect(&dataset);
        assert_eq!(first, second);

        for mm in &first {
            for v in mm.gyro.iter().chain(mm.accel.iter()) {
                assert!((0.0..1.0).contains(v));
            }
        }
    }

    #[test]
    fn test_ground_truth_read_from_sequence_folder() {
        let dir = TempDir::new().unwrap();
        let dataset = MyRawDataset::new(ExampleSequence::FirstTrajectory, dir.path(), None);
        std::fs::create_dir_all(dataset.folder()).unwrap();
        std::fs::write(
            dataset.folder().join("ground_truth.txt"),
            "0.0 0 0 0 0 0 0 1\n0.1 1 0 0 0 0 0 1\n",
        )
        .unwrap();

        let gt = dataset.ground_truth().unwrap();
        assert_eq!(gt.len(), 2);
        assert_abs_diff_eq!(gt.poses[1].translation.vector.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_ground_truth_is_an_error() {
        let dir = TempDir::new().unwrap();
        let dataset = MyRawDataset::new(ExampleSequence::FirstTrajectory, dir.path(), None);
        assert!(dataset.ground_truth_raw().is_err());
    }
}
