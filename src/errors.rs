use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for pipeline configuration, IO, decode, and metadata failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("corpus manifest '{path}' is unreadable: {reason}")]
    Manifest { path: PathBuf, reason: String },
    #[error("failed to decode audio '{path}': {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("metadata failure: {0}")]
    Metadata(String),
    #[error("record container failure: {0}")]
    Record(String),
    #[error("inconsistent metadata across splits: {0}")]
    Consistency(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}
