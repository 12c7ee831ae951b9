use reelshelf_model::{CatalogId, ModelError};
use thiserror::Error;

use crate::store::StoreError;

/// Reasons an ingestion job cannot be opened.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JobError {
    #[error("invalid episode range: {0}")]
    InvalidRange(String),

    #[error("episode range holds {requested} episodes; at most {limit} per job")]
    RangeTooLarge { requested: usize, limit: usize },

    #[error("catalog entry {0} not found")]
    TargetNotFound(CatalogId),

    #[error("catalog entry {0} is not a series")]
    NotASeries(CatalogId),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<ModelError> for JobError {
    fn from(err: ModelError) -> Self {
        JobError::InvalidRange(err.to_string())
    }
}

/// Crate-level error for callers that do not care which layer failed.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Job(#[from] JobError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
