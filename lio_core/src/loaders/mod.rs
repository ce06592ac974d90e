// lio_core/src/loaders/mod.rs

//! Measurement sources a `Dataset` can hand back from `data_iter`.

use crate::error::Result;
use crate::types::Measurement;

/// A time-ordered stream of measurements from one dataset sequence.
pub trait DatasetIterator: Iterator<Item = Result<Measurement>> + Send {
    /// Number of LiDAR scans the iterator will yield, when known without reading the data.
    fn num_lidar(&self) -> Option<usize>;
}

mod bag;
mod format;
mod raw;

pub use bag::{BagIter, BagSummary, BagWriter, ChannelKind, BAG_MAGIC, BAG_VERSION};
pub use format::{LidarDensity, LidarFormatParams, LidarMajor, LidarPointStamp, LidarStamp};
pub use raw::RawDataIter;
