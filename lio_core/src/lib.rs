// lio_core/src/lib.rs

// This file defines the public modules of the library.
pub mod dataset;
pub mod error;
pub mod loaders;
pub mod params;
pub mod pipeline;
pub mod prelude;
pub mod trajectory;
pub mod types;
