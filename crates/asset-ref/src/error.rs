use std::path::PathBuf;

use asset_graph::{GraphError, ObjectId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid reference expression: {0}")]
    InvalidExpression(String),
    #[error("could not find value of {link} in {previous} for {object}")]
    UnresolvedPath {
        link: String,
        previous: String,
        object: ObjectId,
    },
    #[error("index {index} out of range of {previous} array")]
    IndexOutOfRange { index: usize, previous: String },
    #[error("could not find {field} in {object} of template {}", .template.display())]
    TemplateFieldNotFound {
        field: String,
        object: ObjectId,
        template: PathBuf,
    },
    #[error("not implemented: {0}")]
    NotImplemented(String),
    #[error("component alias {0} is not declared")]
    MissingComponentAlias(String),
    #[error("{0} does not exist in the document")]
    UnknownObject(ObjectId),
    #[error("failed to load template {}", .path.display())]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: GraphError,
    },
    #[error("failed to index template {}: {reason}", .path.display())]
    TemplateIndex { path: PathBuf, reason: String },
}
