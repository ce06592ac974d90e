// lio_core/src/prelude.rs

// --- Core Abstractions (The main contracts of the library) ---
pub use crate::dataset::Dataset;
pub use crate::loaders::DatasetIterator;
pub use crate::pipeline::Pipeline;

// --- Core Data Structures (The "nouns" of the library) ---
pub use crate::error::{LioError, Result};
pub use crate::params::{merge_params, Param, ParamMap};
pub use crate::trajectory::Trajectory;
pub use crate::types::{
    ImuMeasurement, ImuParams, LidarMeasurement, LidarParams, Measurement, Point, Stamp, SE3,
};

// --- Loaders ---
pub use crate::loaders::{
    BagIter, BagWriter, LidarDensity, LidarFormatParams, LidarMajor, LidarPointStamp, LidarStamp,
    RawDataIter,
};
