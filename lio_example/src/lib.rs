// lio_example/src/lib.rs

//! A template pipeline and two example datasets built on `lio_core`, plus the
//! glue the `lio-example` binary uses to run them.

// This prelude is for convenience for other files WITHIN the lio_example crate.
pub mod prelude;

pub mod cli;
pub mod config;
pub mod datasets;
pub mod logging;
pub mod pipelines;
pub mod runner;
