//! Documents: insertion-ordered mappings from identifier to record.

use indexmap::IndexMap;

use crate::error::GraphError;
use crate::id::ObjectId;
use crate::record::ObjectRecord;

/// A parsed scene, prefab or asset document.
///
/// Besides its records a document remembers the highest identifier it has
/// ever held, so identifiers freed by [`Document::remove`] are not minted
/// again. Clones share that high-water mark; equality ignores it.
#[derive(Debug, Clone, Default)]
pub struct Document {
    records: IndexMap<ObjectId, ObjectRecord>,
    high_water: ObjectId,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&ObjectRecord> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut ObjectRecord> {
        self.records.get_mut(&id)
    }

    /// Inserts a record, keeping the position of an existing one.
    pub fn insert(&mut self, id: ObjectId, record: ObjectRecord) -> Option<ObjectRecord> {
        self.high_water = self.high_water.max(id);
        self.records.insert(id, record)
    }

    /// Removes a record, preserving the order of the remaining ones.
    pub fn remove(&mut self, id: ObjectId) -> Option<ObjectRecord> {
        self.records.shift_remove(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.records.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &ObjectRecord)> {
        self.records.iter().map(|(id, record)| (*id, record))
    }

    /// Highest identifier this document has held, removed records included.
    pub fn high_water(&self) -> ObjectId {
        self.high_water
    }

    /// Returns an identifier one above the high-water mark.
    ///
    /// Freed identifiers are never reused. Fails once the mark sits at
    /// `i64::MAX`.
    pub fn mint_id(&self) -> Result<ObjectId, GraphError> {
        self.high_water
            .checked_next()
            .ok_or(GraphError::IdentifiersExhausted(self.high_water))
    }

    /// Records whose owner back-reference points at `owner`.
    pub fn owned_by(&self, owner: ObjectId) -> impl Iterator<Item = ObjectId> + '_ {
        self.iter()
            .filter(move |(_, record)| record.owner() == Some(owner))
            .map(|(id, _)| id)
    }

    /// Components attached to `owner`.
    ///
    /// Uses the owner's component list when it has one. Stripped template
    /// instances carry no list, in which case every record pointing back
    /// at the owner counts.
    pub fn components_of(&self, owner: ObjectId) -> Vec<ObjectId> {
        match self.get(owner) {
            Some(record) => match record.component_ids() {
                Some(ids) => ids,
                None => self.owned_by(owner).collect(),
            },
            None => Vec::new(),
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl FromIterator<(ObjectId, ObjectRecord)> for Document {
    fn from_iter<I: IntoIterator<Item = (ObjectId, ObjectRecord)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (id, record) in iter {
            doc.insert(id, record);
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordKind;
    use serde_json::{json, Value};

    fn record(kind: &str, body: Value) -> ObjectRecord {
        match body {
            Value::Object(map) => ObjectRecord::new(RecordKind::from_name(kind), map),
            _ => panic!("fixture body must be a mapping"),
        }
    }

    #[test]
    fn components_from_list() {
        let doc: Document = [
            (ObjectId(1), record("GameObject", json!({"m_Component": [{"component": {"fileID": 2}}]}))),
            (ObjectId(2), record("Transform", json!({"m_GameObject": {"fileID": 1}}))),
            (ObjectId(3), record("MonoBehaviour", json!({"m_GameObject": {"fileID": 1}}))),
        ]
        .into_iter()
        .collect();
        assert_eq!(doc.components_of(ObjectId(1)), vec![ObjectId(2)]);
    }

    #[test]
    fn components_from_back_references() {
        let doc: Document = [
            (ObjectId(1), record("GameObject", json!({"m_PrefabInstance": {"fileID": 9}}))),
            (ObjectId(2), record("MonoBehaviour", json!({"m_GameObject": {"fileID": 1}}))),
            (ObjectId(3), record("MonoBehaviour", json!({"m_GameObject": {"fileID": 4}}))),
        ]
        .into_iter()
        .collect();
        assert_eq!(doc.components_of(ObjectId(1)), vec![ObjectId(2)]);
        assert!(doc.components_of(ObjectId(99)).is_empty());
    }

    #[test]
    fn mint_and_remove() {
        let mut doc = Document::new();
        assert_eq!(doc.mint_id().unwrap(), ObjectId(1));
        doc.insert(ObjectId(5), record("GameObject", json!({})));
        doc.insert(ObjectId(3), record("GameObject", json!({})));
        assert_eq!(doc.mint_id().unwrap(), ObjectId(6));
        assert!(doc.remove(ObjectId(5)).is_some());
        assert_eq!(doc.ids().collect::<Vec<_>>(), vec![ObjectId(3)]);
    }

    #[test]
    fn freed_identifiers_are_not_minted_again() {
        let mut doc: Document = [
            (ObjectId(1), record("GameObject", json!({}))),
            (ObjectId(2), record("MonoBehaviour", json!({}))),
        ]
        .into_iter()
        .collect();
        doc.remove(ObjectId(2));
        assert_eq!(doc.mint_id().unwrap(), ObjectId(3));

        let copy = doc.clone();
        assert_eq!(copy.mint_id().unwrap(), ObjectId(3));
        assert_eq!(copy.high_water(), ObjectId(2));
    }

    #[test]
    fn equality_ignores_the_high_water_mark() {
        let mut doc: Document = [(ObjectId(1), record("GameObject", json!({})))].into_iter().collect();
        let before = doc.clone();
        doc.insert(ObjectId(9), record("GameObject", json!({})));
        doc.remove(ObjectId(9));
        assert_eq!(doc, before);
        assert_ne!(doc.high_water(), before.high_water());
    }

    #[test]
    fn minting_past_the_largest_identifier_fails() {
        let doc: Document = [(ObjectId(i64::MAX), record("GameObject", json!({})))].into_iter().collect();
        assert!(matches!(
            doc.mint_id(),
            Err(GraphError::IdentifiersExhausted(ObjectId(i64::MAX)))
        ));
    }
}
