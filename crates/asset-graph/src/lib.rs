//! Object graph model for serialized scene, prefab and asset documents.
//!
//! A [`Document`] maps integer [`ObjectId`]s to [`ObjectRecord`]s. Each
//! record is tagged with a [`RecordKind`] and holds a mapping of fields;
//! fields that point at other objects hold reference mappings
//! `{fileID: <id>}` (see [`to_reference`] / [`to_identifier`]).
//!
//! # Example
//!
//! ```
//! use asset_graph::{codec::json::from_json, to_identifier, ObjectId};
//! use serde_json::json;
//!
//! let doc = from_json(&json!({
//!     "fileID_1": {"tag": "!u!1", "stripped": "", "GameObject": {
//!         "m_Component": [{"component": {"fileID": 2}}]
//!     }},
//!     "fileID_2": {"tag": "!u!4", "stripped": "", "Transform": {
//!         "m_GameObject": {"fileID": 1}
//!     }}
//! })).unwrap();
//!
//! let transform = doc.get(ObjectId(2)).unwrap();
//! assert_eq!(transform.owner(), Some(ObjectId(1)));
//! assert_eq!(doc.components_of(ObjectId(1)), vec![ObjectId(2)]);
//! assert_eq!(to_identifier(&json!({"fileID": 2})), Some(ObjectId(2)));
//! ```

pub mod codec;
pub mod fields;

mod document;
pub use document::Document;

mod error;
pub use error::GraphError;

mod id;
pub use id::{
    is_null_reference, is_reference, max_identifier, non_null_reference, null_reference,
    to_identifier, to_reference, ObjectId, KEY_PREFIX,
};

mod loader;
pub use loader::{DocumentLoader, JsonDocumentLoader};

mod record;
pub use record::{template_instance, ObjectRecord, RecordKind};
