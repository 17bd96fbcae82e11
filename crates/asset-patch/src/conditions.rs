//! Action guards.

use std::collections::BTreeSet;

use asset_graph::{Document, ObjectId, RecordKind};
use asset_ref::{AliasTable, ResolveError};
use serde_json::Value;

use crate::types::Conditions;

/// Conditions of one action with every alias already resolved to its
/// script guid.
#[derive(Debug, Clone)]
pub struct Guard<'a> {
    has: Vec<&'a str>,
    does_not_have: Vec<&'a str>,
    equals: Option<&'a Value>,
    not_equals: Option<&'a Value>,
}

impl<'a> Guard<'a> {
    /// Fails with [`ResolveError::MissingComponentAlias`] if a condition
    /// names an undeclared alias, whether or not any record matches.
    pub fn new(conditions: &'a Conditions, aliases: &'a AliasTable) -> Result<Self, ResolveError> {
        let resolve = |names: &'a [String]| -> Result<Vec<&'a str>, ResolveError> {
            names.iter().map(|alias| aliases.resolve(alias)).collect()
        };
        Ok(Self {
            has: resolve(conditions.has.as_slice())?,
            does_not_have: resolve(conditions.does_not_have.as_slice())?,
            equals: conditions.equals.as_ref(),
            not_equals: conditions.not_equals.as_ref(),
        })
    }

    /// Checks `has` / `doesNotHave` against the scripted components of
    /// `owner`.
    pub fn components_hold(&self, doc: &Document, owner: ObjectId) -> bool {
        if self.has.is_empty() && self.does_not_have.is_empty() {
            return true;
        }
        let scripts = script_guids(doc, owner);
        self.has.iter().all(|guid| scripts.contains(guid))
            && !self.does_not_have.iter().any(|guid| scripts.contains(guid))
    }

    /// Checks `equals` / `notEquals` against the field's current value.
    /// A missing field equals nothing.
    pub fn value_holds(&self, current: Option<&Value>) -> bool {
        if let Some(expected) = self.equals {
            if current != Some(expected) {
                return false;
            }
        }
        if let Some(unexpected) = self.not_equals {
            if current == Some(unexpected) {
                return false;
            }
        }
        true
    }
}

fn script_guids(doc: &Document, owner: ObjectId) -> BTreeSet<&str> {
    doc.components_of(owner)
        .into_iter()
        .filter_map(|id| doc.get(id))
        .filter(|record| record.kind() == &RecordKind::MonoBehaviour)
        .filter_map(|record| record.script_guid())
        .collect()
}
