// lio_example/src/prelude.rs

// Re-export the entire lio_core prelude so the core types come along.
pub use lio_core::prelude::*;

pub use crate::config::ExampleConfig;
pub use crate::datasets::{
    all_datasets, build_dataset, ExampleSequence, MyBagDataset, MyRawDataset,
};
pub use crate::pipelines::{all_pipelines, build_pipeline, MyPipeline};
pub use crate::runner::{export_to_bag, run_pipeline, RunSummary};
