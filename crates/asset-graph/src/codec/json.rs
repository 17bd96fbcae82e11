//! JSON codec for documents.
//!
//! The surrounding decoder turns each `--- !u!<class> &<id> [stripped]`
//! section into one entry of a single mapping:
//!
//! ```text
//! fileID_<id>:
//!   tag: "!u!<class>"
//!   stripped: ""            # or "stripped"
//!   <Kind>: { ...fields }
//! ```
//!
//! This module converts between that mapping and a [`Document`].

use serde_json::{Map, Value};

use crate::document::Document;
use crate::error::GraphError;
use crate::id::ObjectId;
use crate::record::{ObjectRecord, RecordKind};

/// Synthetic key holding the origin tag.
pub const TAG_KEY: &str = "tag";
/// Synthetic key holding the stripped annotation.
pub const STRIPPED_KEY: &str = "stripped";

// ── Decoding ──────────────────────────────────────────────────────────────

/// Decode a flattened document mapping.
pub fn from_json(value: &Value) -> Result<Document, GraphError> {
    let entries = value.as_object().ok_or(GraphError::NotAMapping)?;
    let mut doc = Document::new();
    for (key, entry) in entries {
        let id = ObjectId::from_key(key).ok_or_else(|| GraphError::InvalidKey(key.clone()))?;
        doc.insert(id, decode_record(key, entry)?);
    }
    Ok(doc)
}

fn decode_record(key: &str, entry: &Value) -> Result<ObjectRecord, GraphError> {
    let invalid = |reason: &str| GraphError::InvalidRecord {
        key: key.to_string(),
        reason: reason.to_string(),
    };
    let map = entry.as_object().ok_or_else(|| invalid("record must be a mapping"))?;

    let mut tag = String::new();
    let mut stripped = String::new();
    let mut kind: Option<(&String, &Value)> = None;
    for (name, value) in map {
        match name.as_str() {
            TAG_KEY => tag = decode_annotation(value).ok_or_else(|| invalid("tag must be a string"))?,
            STRIPPED_KEY => {
                stripped = decode_annotation(value).ok_or_else(|| invalid("stripped must be a string"))?
            }
            _ if kind.is_some() => return Err(invalid("record has more than one kind key")),
            _ => kind = Some((name, value)),
        }
    }

    let (name, body) = kind.ok_or_else(|| invalid("record has no kind key"))?;
    let fields = match body {
        Value::Object(fields) => fields.clone(),
        // An empty section decodes as null.
        Value::Null => Map::new(),
        _ => return Err(invalid("kind value must be a mapping")),
    };
    Ok(ObjectRecord::new(RecordKind::from_name(name), fields)
        .with_tag(tag)
        .with_stripped(stripped))
}

fn decode_annotation(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

// ── Encoding ──────────────────────────────────────────────────────────────

/// Encode a document back into its flattened mapping.
pub fn to_json(doc: &Document) -> Value {
    let mut entries = Map::new();
    for (id, record) in doc.iter() {
        let mut entry = Map::new();
        entry.insert(TAG_KEY.to_string(), Value::String(record.tag().to_string()));
        entry.insert(STRIPPED_KEY.to_string(), Value::String(record.stripped().to_string()));
        entry.insert(record.kind().as_str().to_string(), record.body().clone());
        entries.insert(id.to_key(), Value::Object(entry));
    }
    Value::Object(entries)
}
