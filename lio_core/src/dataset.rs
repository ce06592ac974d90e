// lio_core/src/dataset.rs

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::loaders::DatasetIterator;
use crate::trajectory::Trajectory;
use crate::types::{ImuParams, LidarParams, SE3};

/// The contract for any source of measurements and ground truth the host can
/// evaluate a pipeline against.
///
/// One value of an implementing type stands for one sequence of the dataset.
/// Its files live under `<data_root>/<dataset_name>/<sequence_name>`.
pub trait Dataset: Send + Sync {
    // ------------------------- Identity ------------------------- //
    fn dataset_name(&self) -> &'static str;

    fn sequence_name(&self) -> &str;

    /// Root directory all datasets are stored under.
    fn data_root(&self) -> &Path;

    /// Where to find information about the dataset.
    fn url(&self) -> &'static str;

    // ------------------------- Data ------------------------- //
    /// Time-ordered IMU and LiDAR measurements of this sequence.
    fn data_iter(&self) -> Result<Box<dyn DatasetIterator>>;

    /// Ground truth as stored, expressed in the ground-truth sensor's frame.
    fn ground_truth_raw(&self) -> Result<Trajectory>;

    // ------------------------- Sensors ------------------------- //
    fn imu_t_lidar(&self) -> SE3;

    fn imu_t_gt(&self) -> SE3;

    fn imu_params(&self) -> ImuParams;

    fn lidar_params(&self) -> LidarParams;

    // ------------------------- Storage ------------------------- //
    /// Files that must exist in `folder()` for the sequence to count as downloaded.
    fn files(&self) -> Vec<String>;

    /// Fetches the sequence into `folder()`.
    fn download(&self) -> Result<()>;

    // ------------------------- Provided ------------------------- //
    fn folder(&self) -> PathBuf {
        self.data_root()
            .join(self.dataset_name())
            .join(self.sequence_name())
    }

    fn is_downloaded(&self) -> bool {
        let folder = self.folder();
        self.files().iter().all(|f| folder.join(f).exists())
    }

    /// Ground truth re-expressed as poses of the IMU frame.
    fn ground_truth(&self) -> Result<Trajectory> {
        let mut trajectory = self.ground_truth_raw()?;
        trajectory.right_multiply(&self.imu_t_gt().inverse());
        Ok(trajectory)
    }

    /// `dataset/sequence`, the form used to select a sequence by name.
    fn full_name(&self) -> String {
        format!("{}/{}", self.dataset_name(), self.sequence_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LioError;
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;
    use tempfile::TempDir;

    struct FixedDataset {
        root: PathBuf,
        imu_t_gt: SE3,
    }

    impl Dataset for FixedDataset {
        fn dataset_name(&self) -> &'static str {
            "fixed"
        }

        fn sequence_name(&self) -> &str {
            "only"
        }

        fn data_root(&self) -> &Path {
            &self.root
        }

        fn url(&self) -> &'static str {
            "-"
        }

        fn data_iter(&self) -> Result<Box<dyn DatasetIterator>> {
            Err(LioError::NotImplemented("no data".into()))
        }

        fn ground_truth_raw(&self) -> Result<Trajectory> {
            Trajectory::from_tum(self.folder().join("ground_truth.txt"))
        }

        fn imu_t_lidar(&self) -> SE3 {
            SE3::identity()
        }

        fn imu_t_gt(&self) -> SE3 {
            self.imu_t_gt
        }

        fn imu_params(&self) -> ImuParams {
            ImuParams::default()
        }

        fn lidar_params(&self) -> LidarParams {
            LidarParams::default()
        }

        fn files(&self) -> Vec<String> {
            vec!["ground_truth.txt".to_string()]
        }

        fn download(&self) -> Result<()> {
            Err(LioError::NotImplemented("Download not implemented".into()))
        }
    }

    #[test]
    fn test_folder_and_download_status() {
        let dir = TempDir::new().unwrap();
        let dataset = FixedDataset {
            root: dir.path().to_path_buf(),
            imu_t_gt: SE3::identity(),
        };
        assert_eq!(dataset.folder(), dir.path().join("fixed").join("only"));
        assert_eq!(dataset.full_name(), "fixed/only");
        assert!(!dataset.is_downloaded());

        std::fs::create_dir_all(dataset.folder()).unwrap();
        std::fs::write(
            dataset.folder().join("ground_truth.txt"),
            "0.0 1 0 0 0 0 0 1\n",
        )
        .unwrap();
        assert!(dataset.is_downloaded());
    }

    #[test]
    fn test_ground_truth_is_expressed_in_imu_frame() {
        let dir = TempDir::new().unwrap();
        let dataset = FixedDataset {
            root: dir.path().to_path_buf(),
            imu_t_gt: SE3::translation(0.0, 0.0, 0.5),
        };
        std::fs::create_dir_all(dataset.folder()).unwrap();
        std::fs::write(
            dataset.folder().join("ground_truth.txt"),
            "0.0 1 0 0 0 0 0 1\n",
        )
        .unwrap();

        let gt = dataset.ground_truth().unwrap();
        assert_abs_diff_eq!(
            gt.poses[0].translation.vector,
            Vector3::new(1.0, 0.0, -0.5),
            epsilon = 1e-12
        );
    }
}
