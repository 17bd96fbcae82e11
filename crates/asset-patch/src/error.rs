use std::path::PathBuf;

use asset_graph::GraphError;
use asset_ref::ResolveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatchError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("invalid patch: {0}")]
    InvalidPatch(String),
    #[error("malformed patch file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("in patch file {}: {source}", .path.display())]
    PatchFile {
        path: PathBuf,
        #[source]
        source: Box<PatchError>,
    },
    #[error("failed to patch {name}: {source}")]
    Document {
        name: String,
        #[source]
        source: Box<PatchError>,
    },
}

impl PatchError {
    /// The resolver error at the root of this error, if any.
    pub fn resolve_error(&self) -> Option<&ResolveError> {
        match self {
            PatchError::Resolve(err) => Some(err),
            PatchError::PatchFile { source, .. } | PatchError::Document { source, .. } => source.resolve_error(),
            _ => None,
        }
    }
}
