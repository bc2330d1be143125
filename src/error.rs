//! Error types shared across the ingestion pipeline.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

use crate::model::RecordId;

/// Failures raised while talking to a remote registry or persisting its records.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: StatusCode },

    #[error("invalid JSON payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("adapter failure: {0}")]
    Adapter(String),
}

/// Failures raised by a [`crate::store::Store`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialisation failed: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("record {0} not found")]
    NotFound(RecordId),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
