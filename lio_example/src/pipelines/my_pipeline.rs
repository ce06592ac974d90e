// lio_example/src/pipelines/my_pipeline.rs

use lio_core::prelude::*;
use std::any::Any;

/// A template pipeline showing every hook the host calls.
///
/// Generally you would wrap an existing estimator here and forward each call
/// to it. This one only records the configuration it is given.
#[derive(Debug, Clone)]
pub struct MyPipeline {
    // custom params
    pub param1: bool,
    pub param2: i64,
    pub param3: f64,
    pub param4: String,

    // sensor params
    pub scanlines: usize,
    pub columns: usize,
    pub imu_gyro_std: f64,
    pub imu_t_lidar: SE3,

    current_pose: SE3,
}

impl MyPipeline {
    pub const NAME: &'static str = "MyPipeline";

    pub fn new() -> Self {
        Self {
            param1: true,
            param2: 2,
            param3: 3.0,
            param4: "four".to_string(),
            scanlines: 0,
            columns: 0,
            imu_gyro_std: 0.0,
            imu_t_lidar: SE3::identity(),
            current_pose: SE3::identity(),
        }
    }
}

impl Default for MyPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline for MyPipeline {
    // ------------------------- Info ------------------------- //
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn url(&self) -> &'static str {
        "https://github.com/contagon/evalio-example"
    }

    fn default_params(&self) -> ParamMap {
        ParamMap::from([
            ("param1".to_string(), Param::Bool(true)),
            ("param2".to_string(), Param::Int(2)),
            ("param3".to_string(), Param::Float(3.0)),
            ("param4".to_string(), Param::Str("four".to_string())),
        ])
    }

    // ------------------------- Getters ------------------------- //
    fn pose(&self) -> SE3 {
        self.current_pose
    }

    fn map(&self) -> Vec<Point> {
        Vec::new()
    }

    // ------------------------- Setters ------------------------- //
    fn set_imu_params(&mut self, params: ImuParams) {
        self.imu_gyro_std = params.gyro;
    }

    fn set_lidar_params(&mut self, params: LidarParams) {
        self.scanlines = params.num_rows;
        self.columns = params.num_columns;
    }

    fn set_imu_t_lidar(&mut self, t: SE3) {
        self.imu_t_lidar = t;
    }

    /// All-or-nothing: a rejected key leaves every field untouched.
    fn set_params(&mut self, params: &ParamMap) -> Result<()> {
        let mut staged = self.clone();
        for (key, value) in params {
            match key.as_str() {
                "param1" => staged.param1 = value.expect_bool(key)?,
                "param2" => staged.param2 = value.expect_int(key)?,
                "param3" => staged.param3 = value.expect_float(key)?,
                "param4" => staged.param4 = value.expect_str(key)?,
                _ => return Err(LioError::UnknownParam(key.clone())),
            }
        }
        *self = staged;
        Ok(())
    }

    // ------------------------- Doers ------------------------- //
    fn initialize(&mut self) {
        self.current_pose = SE3::identity();
    }

    fn add_imu(&mut self, _mm: &ImuMeasurement) {
        // No-op
    }

    fn add_lidar(&mut self, _mm: &LidarMeasurement) -> Vec<Point> {
        Vec::new()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_default_params_are_all_accepted() {
        let mut pipeline = MyPipeline::new();
        let defaults = pipeline.default_params();
        assert_eq!(
            defaults.keys().cloned().collect::<Vec<_>>(),
            vec!["param1", "param2", "param3", "param4"]
        );
        pipeline.set_params(&defaults).unwrap();

        // Each key is accepted on its own too.
        for (key, value) in &defaults {
            let single = ParamMap::from([(key.clone(), value.clone())]);
            pipeline.set_params(&single).unwrap();
        }
    }

    #[test]
    fn test_set_params_merges_into_fields() {
        let mut pipeline = MyPipeline::new();
        let params = ParamMap::from([
            ("param1".to_string(), Param::Bool(false)),
            ("param3".to_string(), Param::Int(7)),
            ("param4".to_string(), Param::from("seven")),
        ]);
        pipeline.set_params(&params).unwrap();

        assert!(!pipeline.param1);
        assert_eq!(pipeline.param2, 2);
        assert_eq!(pipeline.param3, 7.0);
        assert_eq!(pipeline.param4, "seven");
    }

    #[test]
    fn test_set_params_rejects_unknown_key() {
        let mut pipeline = MyPipeline::new();
        let params = ParamMap::from([("param5".to_string(), Param::Int(5))]);
        assert!(matches!(
            pipeline.set_params(&params),
            Err(LioError::UnknownParam(key)) if key == "param5"
        ));
    }

    #[test]
    fn test_set_params_rejects_wrong_type() {
        let mut pipeline = MyPipeline::new();
        let params = ParamMap::from([("param2".to_string(), Param::Float(2.5))]);
        assert!(matches!(
            pipeline.set_params(&params),
            Err(LioError::ParamType { .. })
        ));
        assert_eq!(pipeline.param2, 2);
    }

    #[test]
    fn test_failed_set_params_leaves_fields_unchanged() {
        let mut pipeline = MyPipeline::new();
        let params = ParamMap::from([
            ("param1".to_string(), Param::Bool(false)),
            ("param2".to_string(), Param::Float(2.5)),
        ]);
        assert!(pipeline.set_params(&params).is_err());
        assert!(pipeline.param1);
        assert_eq!(pipeline.param2, 2);

        let params = ParamMap::from([
            ("param4".to_string(), Param::from("five")),
            ("param9".to_string(), Param::Int(9)),
        ]);
        assert!(pipeline.set_params(&params).is_err());
        assert_eq!(pipeline.param4, "four");
    }

    #[test]
    fn test_initialize_resets_pose_to_identity() {
        let mut pipeline = MyPipeline::new();
        pipeline.current_pose = SE3::translation(1.0, 2.0, 3.0);
        pipeline.initialize();
        assert_eq!(pipeline.pose(), SE3::identity());
    }

    #[test]
    fn test_sensor_setters_store_values() {
        let mut pipeline = MyPipeline::new();
        pipeline.set_imu_params(ImuParams {
            gyro: 0.02,
            ..Default::default()
        });
        pipeline.set_lidar_params(LidarParams {
            num_rows: 64,
            num_columns: 1024,
            ..Default::default()
        });
        let extrinsic = SE3::translation(0.1, 0.0, 0.2);
        pipeline.set_imu_t_lidar(extrinsic);

        assert_eq!(pipeline.imu_gyro_std, 0.02);
        assert_eq!(pipeline.scanlines, 64);
        assert_eq!(pipeline.columns, 1024);
        assert_eq!(pipeline.imu_t_lidar, extrinsic);
    }

    #[test]
    fn test_measurements_produce_no_points() {
        let mut pipeline = MyPipeline::new();
        pipeline.initialize();
        pipeline.add_imu(&ImuMeasurement::new(
            Stamp::from_sec(0.0),
            Vector3::zeros(),
            Vector3::new(0.0, 0.0, 9.81),
        ));
        let scan = LidarMeasurement::with_points(
            Stamp::from_sec(0.1),
            vec![Point {
                x: 1.0,
                ..Default::default()
            }],
        );
        assert!(pipeline.add_lidar(&scan).is_empty());
        assert!(pipeline.map().is_empty());
        assert_eq!(pipeline.pose(), SE3::identity());
    }
}
