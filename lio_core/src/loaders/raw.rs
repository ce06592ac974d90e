// lio_core/src/loaders/raw.rs

use std::iter::Peekable;

use super::DatasetIterator;
use crate::error::Result;
use crate::types::{ImuMeasurement, LidarMeasurement, Measurement};

/// Merges separately produced LiDAR and IMU streams into one time-ordered stream.
///
/// Both inputs must already be sorted by stamp. They are pulled lazily, so scans
/// can be loaded from disk one at a time. An IMU sample sharing a stamp with a
/// scan is yielded first, so the pipeline has seen all inertial data up to the
/// scan when it arrives.
pub struct RawDataIter<L, I>
where
    L: Iterator<Item = LidarMeasurement>,
    I: Iterator<Item = ImuMeasurement>,
{
    lidar: Peekable<L>,
    imu: Peekable<I>,
    num_lidar: usize,
}

impl<L, I> RawDataIter<L, I>
where
    L: Iterator<Item = LidarMeasurement>,
    I: Iterator<Item = ImuMeasurement>,
{
    /// `num_lidar` is the number of scans `lidar` will produce.
    pub fn new(lidar: L, imu: I, num_lidar: usize) -> Self {
        Self {
            lidar: lidar.peekable(),
            imu: imu.peekable(),
            num_lidar,
        }
    }
}

impl<L, I> Iterator for RawDataIter<L, I>
where
    L: Iterator<Item = LidarMeasurement>,
    I: Iterator<Item = ImuMeasurement>,
{
    type Item = Result<Measurement>;

    fn next(&mut self) -> Option<Self::Item> {
        let take_imu = match (self.imu.peek(), self.lidar.peek()) {
            (Some(imu), Some(lidar)) => imu.stamp <= lidar.stamp,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => return None,
        };

        let mm = if take_imu {
            self.imu.next().map(Measurement::Imu)
        } else {
            self.lidar.next().map(Measurement::Lidar)
        };
        mm.map(Ok)
    }
}

impl<L, I> DatasetIterator for RawDataIter<L, I>
where
    L: Iterator<Item = LidarMeasurement> + Send,
    I: Iterator<Item = ImuMeasurement> + Send,
{
    fn num_lidar(&self) -> Option<usize> {
        Some(self.num_lidar)
    }
}
