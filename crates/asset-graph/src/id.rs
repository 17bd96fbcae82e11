//! Object identifiers and the reference codec.
//!
//! Inside a document every object is keyed by an integer identifier. Fields
//! that point at another object hold a reference mapping `{fileID: <id>}`;
//! the identifier `0` is the null reference.

use std::fmt;

use serde_json::{Map, Value};

use crate::document::Document;
use crate::fields;

/// Key prefix used when a document is flattened into a single mapping.
pub const KEY_PREFIX: &str = "fileID_";

/// Identifier of one object within a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub i64);

impl ObjectId {
    /// The null identifier.
    pub const NULL: ObjectId = ObjectId(0);

    pub fn value(self) -> i64 {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Parses a flattened record key (`fileID_<n>`).
    pub fn from_key(key: &str) -> Option<Self> {
        key.strip_prefix(KEY_PREFIX)?.parse().ok().map(ObjectId)
    }

    /// Formats the identifier as a flattened record key.
    pub fn to_key(self) -> String {
        format!("{KEY_PREFIX}{}", self.0)
    }

    /// The identifier that follows this one, or `None` past `i64::MAX`.
    pub fn checked_next(self) -> Option<Self> {
        self.0.checked_add(1).map(ObjectId)
    }
}

impl From<i64> for ObjectId {
    fn from(id: i64) -> Self {
        ObjectId(id)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{KEY_PREFIX}{}", self.0)
    }
}

// ── Reference codec ───────────────────────────────────────────────────────

/// Extracts the identifier from a reference mapping.
///
/// Returns `None` when `reference` is not a mapping carrying an integer
/// `fileID`.
pub fn to_identifier(reference: &Value) -> Option<ObjectId> {
    reference.get(fields::FILE_ID)?.as_i64().map(ObjectId)
}

/// Wraps an identifier as a reference mapping.
pub fn to_reference(id: ObjectId) -> Value {
    let mut map = Map::new();
    map.insert(fields::FILE_ID.to_string(), Value::from(id.0));
    Value::Object(map)
}

/// The canonical null reference `{fileID: 0}`.
pub fn null_reference() -> Value {
    to_reference(ObjectId::NULL)
}

/// Returns true if `value` is a reference mapping.
pub fn is_reference(value: &Value) -> bool {
    to_identifier(value).is_some()
}

/// Returns true if `value` is a reference to the null identifier.
pub fn is_null_reference(value: &Value) -> bool {
    to_identifier(value).is_some_and(ObjectId::is_null)
}

/// Reads a reference field and drops null references.
pub fn non_null_reference(value: Option<&Value>) -> Option<ObjectId> {
    value.and_then(to_identifier).filter(|id| !id.is_null())
}

/// Returns the largest identifier in `doc`, or [`ObjectId::NULL`] if the
/// document is empty.
pub fn max_identifier(doc: &Document) -> ObjectId {
    doc.ids().max().unwrap_or(ObjectId::NULL).max(ObjectId::NULL)
}
