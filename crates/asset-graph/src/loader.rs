//! Loading documents from disk.
//!
//! The on-disk encoding belongs to the surrounding tool; the graph model
//! only asks for a parsed [`Document`] given a path.

use std::fs;
use std::path::Path;

use crate::codec::json::from_json;
use crate::document::Document;
use crate::error::GraphError;

/// Produces a parsed document for a file path.
pub trait DocumentLoader {
    fn load(&self, path: &Path) -> Result<Document, GraphError>;
}

impl<F> DocumentLoader for F
where
    F: Fn(&Path) -> Result<Document, GraphError>,
{
    fn load(&self, path: &Path) -> Result<Document, GraphError> {
        self(path)
    }
}

/// Loads documents stored in the flattened JSON form of [`crate::codec::json`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDocumentLoader;

impl DocumentLoader for JsonDocumentLoader {
    fn load(&self, path: &Path) -> Result<Document, GraphError> {
        let text = fs::read_to_string(path).map_err(|source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|err| GraphError::Decode {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;
        from_json(&value)
    }
}
