// lio_example/src/pipelines/mod.rs

use lio_core::prelude::*;

mod my_pipeline;

pub use my_pipeline::MyPipeline;

/// One fresh instance of every pipeline this crate provides.
pub fn all_pipelines() -> Vec<Box<dyn Pipeline>> {
    vec![Box::new(MyPipeline::new())]
}

/// Looks up a pipeline by its `name()`.
pub fn build_pipeline(name: &str) -> Result<Box<dyn Pipeline>> {
    all_pipelines()
        .into_iter()
        .find(|p| p.name() == name)
        .ok_or_else(|| LioError::UnknownPipeline(name.to_string()))
}
