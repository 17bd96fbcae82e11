use std::path::PathBuf;

use thiserror::Error;

use crate::id::ObjectId;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("document must be a mapping of records")]
    NotAMapping,
    #[error("invalid object key: {0}")]
    InvalidKey(String),
    #[error("invalid record {key}: {reason}")]
    InvalidRecord { key: String, reason: String },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no identifier left above {0}")]
    IdentifiersExhausted(ObjectId),
    #[error("failed to decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },
}
