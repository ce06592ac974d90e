// lio_core/src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Every failure the extension contract can report.
#[derive(Debug, Error)]
pub enum LioError {
    /// The operation exists in the contract but this implementation does not provide it.
    #[error("{0}")]
    NotImplemented(String),

    #[error("Invalid parameter: {0}")]
    UnknownParam(String),

    #[error("Parameter '{key}' expects a {expected} value, got {found}")]
    ParamType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{path}:{line}: {reason}")]
    TrajectoryParse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Trajectory layout is missing the '{0}' field")]
    MissingField(&'static str),

    #[error("Unknown sequence '{sequence}' for dataset '{dataset}'")]
    UnknownSequence { dataset: String, sequence: String },

    #[error("Unknown dataset '{0}'")]
    UnknownDataset(String),

    #[error("Unknown pipeline '{0}'")]
    UnknownPipeline(String),

    #[error("Bag error: {0}")]
    Bag(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<postcard::Error> for LioError {
    fn from(e: postcard::Error) -> Self {
        LioError::Bag(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LioError>;
