// lio_core/src/types.rs

use nalgebra::{Isometry3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::time::Duration;

// --- Core Type Aliases ---
/// A rigid 3D transform (rotation + translation).
pub type SE3 = Isometry3<f64>;

const NSEC_PER_SEC: u64 = 1_000_000_000;

// =========================================================================
// == Time ==
// =========================================================================

/// A timestamp split into whole seconds and nanoseconds, the way sensor logs
/// store them. Field order makes the derived ordering chronological.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Stamp {
    pub sec: u32,
    pub nsec: u32,
}

impl Stamp {
    /// Latest representable stamp.
    pub const MAX: Stamp = Stamp {
        sec: u32::MAX,
        nsec: (NSEC_PER_SEC - 1) as u32,
    };

    pub fn new(sec: u32, nsec: u32) -> Self {
        Self::from_nsec(sec as u64 * NSEC_PER_SEC + nsec as u64)
    }

    /// Builds a stamp from floating point seconds. Negative input saturates at zero.
    pub fn from_sec(sec: f64) -> Self {
        if sec <= 0.0 || sec.is_nan() {
            return Self::default();
        }
        if sec >= u32::MAX as f64 + 1.0 {
            return Self::MAX;
        }
        let whole = sec.floor();
        let nsec = ((sec - whole) * 1e9).round() as u64;
        Self::from_nsec(whole as u64 * NSEC_PER_SEC + nsec)
    }

    /// Builds a stamp from nanoseconds, saturating at `Stamp::MAX`.
    pub fn from_nsec(nsec: u64) -> Self {
        match u32::try_from(nsec / NSEC_PER_SEC) {
            Ok(sec) => Self {
                sec,
                nsec: (nsec % NSEC_PER_SEC) as u32,
            },
            Err(_) => Self::MAX,
        }
    }

    pub fn to_sec(&self) -> f64 {
        self.sec as f64 + self.nsec as f64 * 1e-9
    }

    pub fn to_nsec(&self) -> u64 {
        self.sec as u64 * NSEC_PER_SEC + self.nsec as u64
    }

    /// Signed difference `self - earlier` in seconds.
    pub fn seconds_since(&self, earlier: &Stamp) -> f64 {
        (self.to_nsec() as i128 - earlier.to_nsec() as i128) as f64 * 1e-9
    }

    /// Returns a stamp shifted by `secs` (may be negative), clamped at zero.
    pub fn shifted(&self, secs: f64) -> Stamp {
        let shifted = self.to_nsec() as i128 + (secs * 1e9).round() as i128;
        Stamp::from_nsec(shifted.clamp(0, u64::MAX as i128) as u64)
    }
}

impl Sub for Stamp {
    type Output = f64;

    /// Seconds between two stamps; negative when `rhs` is later.
    fn sub(self, rhs: Stamp) -> f64 {
        self.seconds_since(&rhs)
    }
}

impl Add<Duration> for Stamp {
    type Output = Stamp;

    fn add(self, rhs: Duration) -> Stamp {
        let nanos = u64::try_from(rhs.as_nanos()).unwrap_or(u64::MAX);
        Stamp::from_nsec(self.to_nsec().saturating_add(nanos))
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.sec, self.nsec)
    }
}

// =========================================================================
// == Perception-Specific Data Structures ==
// =========================================================================

/// Represents a single point from a LiDAR scan.
/// An all-zero point marks an invalid return in a dense scan.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Position in the LiDAR's local coordinate frame.
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub intensity: f64,
    /// Offset from the start of the scan, in seconds.
    pub t: f64,
    /// Measured range in millimetres.
    pub range: u32,
    /// Scanline (ring) index.
    pub row: u8,
    /// Column (azimuth) index.
    pub col: u16,
}

impl Point {
    pub fn is_valid(&self) -> bool {
        self.x != 0.0 || self.y != 0.0 || self.z != 0.0
    }
}

// =========================================================================
// == Sensor Parameters ==
// =========================================================================

/// Static IMU noise parameters, set once by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImuParams {
    /// Gyroscope white noise density.
    pub gyro: f64,
    /// Accelerometer white noise density.
    pub accel: f64,
    pub gyro_bias: f64,
    pub accel_bias: f64,
    pub bias_init: f64,
    pub integration: f64,
    /// Gravity vector in the world frame, m/s^2.
    pub gravity: Vector3<f64>,
    pub brand: String,
    pub model: String,
}

impl Default for ImuParams {
    fn default() -> Self {
        Self {
            gyro: 1e-5,
            accel: 1e-5,
            gyro_bias: 1e-6,
            accel_bias: 1e-6,
            bias_init: 1e-7,
            integration: 1e-7,
            gravity: Vector3::new(0.0, 0.0, -9.81),
            brand: "-".to_string(),
            model: "-".to_string(),
        }
    }
}

/// Static LiDAR scan geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LidarParams {
    /// Number of scanlines (rings / channels).
    pub num_rows: usize,
    pub num_columns: usize,
    pub min_range: f64,
    pub max_range: f64,
    /// Scan rate in Hz.
    pub rate: f64,
    pub brand: String,
    pub model: String,
}

impl LidarParams {
    /// Duration of one full sweep, in seconds.
    pub fn scan_period(&self) -> f64 {
        1.0 / self.rate
    }

    pub fn num_points(&self) -> usize {
        self.num_rows * self.num_columns
    }
}

impl Default for LidarParams {
    fn default() -> Self {
        Self {
            num_rows: 0,
            num_columns: 0,
            min_range: 0.0,
            max_range: 0.0,
            rate: 10.0,
            brand: "-".to_string(),
            model: "-".to_string(),
        }
    }
}

// =========================================================================
// == Measurements ==
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImuMeasurement {
    pub stamp: Stamp,
    /// Angular velocity, rad/s.
    pub gyro: Vector3<f64>,
    /// Linear acceleration, m/s^2.
    pub accel: Vector3<f64>,
}

impl ImuMeasurement {
    pub fn new(stamp: Stamp, gyro: Vector3<f64>, accel: Vector3<f64>) -> Self {
        Self { stamp, gyro, accel }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LidarMeasurement {
    /// Stamp of the start of the scan.
    pub stamp: Stamp,
    pub points: Vec<Point>,
}

impl LidarMeasurement {
    pub fn new(stamp: Stamp) -> Self {
        Self {
            stamp,
            points: Vec::new(),
        }
    }

    pub fn with_points(stamp: Stamp, points: Vec<Point>) -> Self {
        Self { stamp, points }
    }
}

/// A timestamped sensor sample handed to a pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Measurement {
    Imu(ImuMeasurement),
    Lidar(LidarMeasurement),
}

impl Measurement {
    pub fn stamp(&self) -> Stamp {
        match self {
            Measurement::Imu(mm) => mm.stamp,
            Measurement::Lidar(mm) => mm.stamp,
        }
    }

    pub fn is_imu(&self) -> bool {
        matches!(self, Measurement::Imu(_))
    }

    pub fn is_lidar(&self) -> bool {
        matches!(self, Measurement::Lidar(_))
    }
}

impl From<ImuMeasurement> for Measurement {
    fn from(mm: ImuMeasurement) -> Self {
        Measurement::Imu(mm)
    }
}

impl From<LidarMeasurement> for Measurement {
    fn from(mm: LidarMeasurement) -> Self {
        Measurement::Lidar(mm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_stamp_saturates_past_u32_seconds() {
        assert_eq!(Stamp::from_sec(5e9), Stamp::MAX);
        assert_eq!(Stamp::from_sec(f64::INFINITY), Stamp::MAX);
        assert_eq!(Stamp::from_nsec(u64::MAX), Stamp::MAX);
        assert_eq!(Stamp::MAX + Duration::from_secs(1), Stamp::MAX);

        let last = Stamp::from_nsec(u32::MAX as u64 * NSEC_PER_SEC);
        assert_eq!(last, Stamp::new(u32::MAX, 0));
    }

    #[test]
    fn test_stamp_arithmetic() {
        let a = Stamp::new(1, 900_000_000);
        let b = a + Duration::from_millis(200);
        assert_eq!(b, Stamp::new(2, 100_000_000));
        assert_abs_diff_eq!(b - a, 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(a - b, -0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_stamp_from_sec_splits_fraction() {
        let stamp = Stamp::from_sec(12.25);
        assert_eq!(stamp.sec, 12);
        assert_eq!(stamp.nsec, 250_000_000);
        assert_abs_diff_eq!(stamp.to_sec(), 12.25, epsilon = 1e-9);
    }

    #[test]
    fn test_stamp_from_sec_carries_rounding() {
        let stamp = Stamp::from_sec(0.999_999_999_9);
        assert_eq!(stamp, Stamp::new(1, 0));
    }

    #[test]
    fn test_stamp_ordering_is_chronological() {
        let a = Stamp::new(1, 900_000_000);
        let b = Stamp::new(2, 0);
        assert!(a < b);
        assert_abs_diff_eq!(b.seconds_since(&a), 0.1, epsilon = 1e-9);
        assert_abs_diff_eq!(a.seconds_since(&b), -0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_stamp_shifted_clamps_at_zero() {
        let stamp = Stamp::from_sec(0.05);
        assert_eq!(stamp.shifted(-0.1), Stamp::default());
        assert_eq!(stamp.shifted(0.95), Stamp::new(1, 0));
    }

    #[test]
    fn test_stamp_display_pads_nanoseconds() {
        assert_eq!(Stamp::new(3, 42).to_string(), "3.000000042");
    }

    #[test]
    fn test_default_point_is_invalid() {
        assert!(!Point::default().is_valid());
        let p = Point {
            x: 1.0,
            ..Default::default()
        };
        assert!(p.is_valid());
    }

    #[test]
    fn test_lidar_params_geometry() {
        let params = LidarParams {
            num_rows: 64,
            num_columns: 1024,
            ..Default::default()
        };
        assert_eq!(params.num_points(), 65_536);
        assert_abs_diff_eq!(params.scan_period(), 0.1, epsilon = 1e-12);
    }
}
