// lio_core/src/pipeline.rs

use dyn_clone::DynClone;
use std::any::Any;

use crate::error::Result;
use crate::params::ParamMap;
use crate::types::{ImuMeasurement, ImuParams, LidarMeasurement, LidarParams, Point, SE3};

/// The contract for any lidar-inertial odometry algorithm the host can evaluate.
///
/// The host drives an implementation through a fixed lifecycle:
/// 1. the sensor setters (`set_imu_params`, `set_lidar_params`, `set_imu_t_lidar`)
///    and `set_params` with the merged parameter set,
/// 2. `initialize`,
/// 3. `add_imu` / `add_lidar` for every measurement in time order,
///    reading `pose` and `map` whenever it wants a snapshot.
pub trait Pipeline: DynClone + Send {
    // ------------------------- Info ------------------------- //
    /// Unique name used to select this pipeline.
    fn name(&self) -> &'static str;

    /// Where to find the implementation's documentation.
    fn url(&self) -> &'static str;

    /// Every parameter the pipeline accepts, with its default value.
    /// Must not depend on instance state.
    fn default_params(&self) -> ParamMap;

    // ------------------------- Getters ------------------------- //
    /// Most recent pose estimate of the IMU in the world frame.
    fn pose(&self) -> SE3;

    /// Current submap of the environment, in the world frame.
    fn map(&self) -> Vec<Point>;

    // ------------------------- Setters ------------------------- //
    fn set_imu_params(&mut self, params: ImuParams);

    fn set_lidar_params(&mut self, params: LidarParams);

    /// Fixed extrinsic taking points from the LiDAR frame into the IMU frame.
    fn set_imu_t_lidar(&mut self, t: SE3);

    /// Merges `params` into the pipeline's settings.
    /// Keys outside `default_params()` are rejected.
    fn set_params(&mut self, params: &ParamMap) -> Result<()>;

    // ------------------------- Doers ------------------------- //
    fn initialize(&mut self);

    fn add_imu(&mut self, mm: &ImuMeasurement);

    /// Consumes a scan and returns the points the pipeline used from it.
    fn add_lidar(&mut self, mm: &LidarMeasurement) -> Vec<Point>;

    /// Allows for dynamic downcasting to access algorithm-specific methods if needed.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// This macro automatically generates the implementation of `Clone` for `Box<dyn Pipeline>`.
dyn_clone::clone_trait_object!(Pipeline);
