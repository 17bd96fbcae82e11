//! Object records.
//!
//! A record is keyed at the top level by exactly one kind name
//! (`GameObject`, `MonoBehaviour`, `Transform`, ...) whose value is the
//! mapping of the object's fields.

use std::fmt;

use serde_json::{Map, Value};

use crate::fields;
use crate::id::{non_null_reference, to_identifier, to_reference, ObjectId};

// ── Kind ──────────────────────────────────────────────────────────────────

/// Discriminant of an object record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Container object owning a list of components.
    GameObject,
    /// Scripted component, typed by its `m_Script` guid.
    MonoBehaviour,
    /// Instance of an externally stored template document.
    PrefabInstance,
    /// Any other engine type (`Transform`, `MeshRenderer`, assets, ...).
    Other(String),
}

impl RecordKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "GameObject" => RecordKind::GameObject,
            "MonoBehaviour" => RecordKind::MonoBehaviour,
            "PrefabInstance" => RecordKind::PrefabInstance,
            other => RecordKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RecordKind::GameObject => "GameObject",
            RecordKind::MonoBehaviour => "MonoBehaviour",
            RecordKind::PrefabInstance => "PrefabInstance",
            RecordKind::Other(name) => name,
        }
    }

    pub fn is_game_object(&self) -> bool {
        matches!(self, RecordKind::GameObject)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Record ────────────────────────────────────────────────────────────────

/// One object of a document.
///
/// Besides its kind and fields a record carries the origin tag and the
/// stripped annotation of the surrounding encoding. Neither takes part in
/// resolution; they only travel along so the document can be written back.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRecord {
    kind: RecordKind,
    // Always a `Value::Object`.
    body: Value,
    tag: String,
    stripped: String,
}

impl ObjectRecord {
    pub fn new(kind: RecordKind, fields: Map<String, Value>) -> Self {
        Self {
            kind,
            body: Value::Object(fields),
            tag: String::new(),
            stripped: String::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_stripped(mut self, stripped: impl Into<String>) -> Self {
        self.stripped = stripped.into();
        self
    }

    pub fn kind(&self) -> &RecordKind {
        &self.kind
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn stripped(&self) -> &str {
        &self.stripped
    }

    /// Returns true if `name` is the record's single top-level key.
    pub fn has_field(&self, name: &str) -> bool {
        self.kind.as_str() == name
    }

    /// The field mapping, i.e. the value under the kind key.
    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.body.as_object().into_iter().flatten()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.body.get(field)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.body.get_mut(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Sets a field, returning the previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.body.as_object_mut()?.insert(field.into(), value)
    }

    /// Removes a field, keeping the order of the remaining ones.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.body.as_object_mut()?.shift_remove(field)
    }

    /// The record as it appears in the document: `{<kind>: <fields>}`.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(self.kind.as_str().to_string(), self.body.clone());
        Value::Object(map)
    }

    // ── Engine fields ─────────────────────────────────────────────────────

    /// Owner back-reference of a component (`m_GameObject`).
    pub fn owner(&self) -> Option<ObjectId> {
        self.get(fields::GAME_OBJECT).and_then(to_identifier)
    }

    /// Script-type guid of a scripted component (`m_Script.guid`).
    pub fn script_guid(&self) -> Option<&str> {
        self.get(fields::SCRIPT)?.get(fields::GUID)?.as_str()
    }

    /// Non-null template instance backing this object.
    pub fn template_instance(&self) -> Option<ObjectId> {
        template_instance(&self.body)
    }

    /// Identifiers of the explicit component list, if the record has one.
    pub fn component_ids(&self) -> Option<Vec<ObjectId>> {
        let list = self.get(fields::COMPONENT)?.as_array()?;
        Some(
            list.iter()
                .filter_map(|entry| entry.get(fields::COMPONENT_ENTRY))
                .filter_map(to_identifier)
                .collect(),
        )
    }

    /// Appends a component entry. Returns false if the record has no
    /// component list.
    pub fn push_component(&mut self, id: ObjectId) -> bool {
        let Some(Value::Array(list)) = self.get_mut(fields::COMPONENT) else {
            return false;
        };
        let mut entry = Map::new();
        entry.insert(fields::COMPONENT_ENTRY.to_string(), to_reference(id));
        list.push(Value::Object(entry));
        true
    }

    /// Removes every component entry pointing at `id`.
    pub fn remove_component(&mut self, id: ObjectId) -> bool {
        let Some(Value::Array(list)) = self.get_mut(fields::COMPONENT) else {
            return false;
        };
        let before = list.len();
        list.retain(|entry| {
            entry.get(fields::COMPONENT_ENTRY).and_then(to_identifier) != Some(id)
        });
        list.len() != before
    }
}

/// Reads the non-null template-instance link of a field mapping.
pub fn template_instance(body: &Value) -> Option<ObjectId> {
    non_null_reference(body.get(fields::PREFAB_INSTANCE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(kind: RecordKind, body: Value) -> ObjectRecord {
        match body {
            Value::Object(map) => ObjectRecord::new(kind, map),
            _ => panic!("fixture body must be a mapping"),
        }
    }

    #[test]
    fn kind_names() {
        assert_eq!(RecordKind::from_name("GameObject"), RecordKind::GameObject);
        assert_eq!(RecordKind::from_name("Transform"), RecordKind::Other("Transform".into()));
        assert_eq!(RecordKind::Other("Transform".into()).as_str(), "Transform");
        assert_eq!(RecordKind::MonoBehaviour.to_string(), "MonoBehaviour");
    }

    #[test]
    fn engine_fields() {
        let mb = record(
            RecordKind::MonoBehaviour,
            json!({
                "m_GameObject": {"fileID": 1},
                "m_Script": {"fileID": 11500000, "guid": "G", "type": 3},
                "m_PrefabInstance": {"fileID": 0}
            }),
        );
        assert!(mb.has_field("MonoBehaviour"));
        assert!(!mb.has_field("m_Script"));
        assert_eq!(mb.owner(), Some(ObjectId(1)));
        assert_eq!(mb.script_guid(), Some("G"));
        assert_eq!(mb.template_instance(), None);
        assert_eq!(mb.component_ids(), None);
    }

    #[test]
    fn component_list_edits() {
        let mut go = record(
            RecordKind::GameObject,
            json!({"m_Component": [{"component": {"fileID": 2}}, {"component": {"fileID": 3}}]}),
        );
        assert_eq!(go.component_ids(), Some(vec![ObjectId(2), ObjectId(3)]));
        assert!(go.push_component(ObjectId(7)));
        assert!(go.remove_component(ObjectId(2)));
        assert!(!go.remove_component(ObjectId(2)));
        assert_eq!(go.component_ids(), Some(vec![ObjectId(3), ObjectId(7)]));
    }

    #[test]
    fn field_edits() {
        let mut mb = record(RecordKind::MonoBehaviour, json!({"a": 1}));
        assert_eq!(mb.insert("b", json!(2)), None);
        assert_eq!(mb.insert("a", json!(3)), Some(json!(1)));
        assert_eq!(mb.remove("a"), Some(json!(3)));
        assert_eq!(mb.remove("a"), None);
        assert_eq!(mb.to_value(), json!({"MonoBehaviour": {"b": 2}}));
    }
}
